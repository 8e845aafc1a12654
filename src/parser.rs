use std::collections::HashMap;

use crate::ast::{Expr, Function, Item, Prototype};
use crate::lexer::{Lexer, Token};

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum SyntaxErrorKind {
    #[error("expected an expression, found {0}")]
    ExpectedExpression(Token),
    #[error("expected ')'")]
    UnclosedParen,
    #[error("expected ')' or ',' in argument list")]
    BadArgumentList,
    #[error("expected function name in prototype")]
    MissingFunctionName,
    #[error("expected '(' in prototype")]
    MissingParamList,
    #[error("expected ')' in prototype")]
    UnclosedParamList,
}

/// A syntax error and the position of the token that caused it.
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
#[error("{kind}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub line: u32,
    pub col: u32,
}

pub type ParseResult<T> = Result<T, SyntaxError>;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    precedence: HashMap<char, i32>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut precedence = HashMap::new();
        precedence.insert('<', 10);
        precedence.insert('+', 20);
        precedence.insert('-', 20);
        precedence.insert('*', 40);
        Self::with_precedence(source, precedence)
    }

    /// Builds a parser with a custom binary operator table. Higher values
    /// bind tighter; all operators are left-associative.
    pub fn with_precedence(source: &'a str, precedence: HashMap<char, i32>) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Parser {
            lexer,
            current,
            precedence,
        }
    }

    /// Line/column where the current lookahead token started.
    pub fn position(&self) -> (u32, u32) {
        (self.lexer.line(), self.lexer.column())
    }

    fn bump(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn error<T>(&self, kind: SyntaxErrorKind) -> ParseResult<T> {
        let (line, col) = self.position();
        Err(SyntaxError { kind, line, col })
    }

    /// Discards the current token so the caller can attempt to keep parsing
    /// after a syntax error.
    pub fn synchronize(&mut self) {
        self.bump();
    }

    /// Pulls the next top-level construct, or `None` at end of input.
    /// Stray `;` tokens between constructs are skipped.
    pub fn next_item(&mut self) -> Option<ParseResult<Item>> {
        loop {
            match self.current {
                Token::Eof => return None,
                Token::Op(';') => self.bump(),
                Token::Def => return Some(self.parse_definition()),
                Token::Extern => return Some(self.parse_extern()),
                _ => return Some(self.parse_top_level_expr()),
            }
        }
    }

    fn parse_definition(&mut self) -> ParseResult<Item> {
        self.bump(); // eat 'def'
        let prototype = self.parse_prototype()?;
        let body = self.parse_expr()?;
        Ok(Item::Function(Function { prototype, body }))
    }

    fn parse_extern(&mut self) -> ParseResult<Item> {
        self.bump(); // eat 'extern'
        Ok(Item::Extern(self.parse_prototype()?))
    }

    // A bare expression becomes the body of an anonymous zero-argument
    // function so the emitter only ever sees prototypes and functions.
    fn parse_top_level_expr(&mut self) -> ParseResult<Item> {
        let body = self.parse_expr()?;
        let prototype = Prototype {
            name: String::new(),
            params: Vec::new(),
        };
        Ok(Item::Function(Function { prototype, body }))
    }

    fn parse_prototype(&mut self) -> ParseResult<Prototype> {
        let name = match &self.current {
            Token::Ident(name) => name.clone(),
            _ => return self.error(SyntaxErrorKind::MissingFunctionName),
        };
        self.bump();

        if self.current != Token::Op('(') {
            return self.error(SyntaxErrorKind::MissingParamList);
        }
        self.bump();

        let mut params = Vec::new();
        while let Token::Ident(param) = &self.current {
            params.push(param.clone());
            self.bump();
        }

        if self.current != Token::Op(')') {
            return self.error(SyntaxErrorKind::UnclosedParamList);
        }
        self.bump();

        Ok(Prototype { name, params })
    }

    fn parse_expr(&mut self) -> ParseResult<Expr> {
        let lhs = self.parse_primary()?;
        self.parse_binop_rhs(0, lhs)
    }

    /// Precedence climbing: absorbs operators binding at least as tightly as
    /// `min_prec` into `lhs`. Operators missing from the table rank as -1,
    /// so they (and any non-operator token) terminate the expression rather
    /// than erroring here.
    fn parse_binop_rhs(&mut self, min_prec: i32, mut lhs: Expr) -> ParseResult<Expr> {
        loop {
            let (op, prec) = match self.current {
                Token::Op(c) => match self.precedence.get(&c) {
                    Some(&p) if p >= min_prec => (c, p),
                    _ => return Ok(lhs),
                },
                _ => return Ok(lhs),
            };
            self.bump();

            let mut rhs = self.parse_primary()?;

            // If the next operator binds tighter than the one just consumed,
            // it owns our right-hand side.
            if prec < self.current_precedence() {
                rhs = self.parse_binop_rhs(prec + 1, rhs)?;
            }

            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn current_precedence(&self) -> i32 {
        match self.current {
            Token::Op(c) => self.precedence.get(&c).copied().unwrap_or(-1),
            _ => -1,
        }
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.current.clone() {
            Token::Number(value) => {
                self.bump();
                Ok(Expr::Number(value))
            }
            Token::Ident(name) => {
                self.bump();
                self.parse_identifier(name)
            }
            Token::Op('(') => self.parse_paren(),
            token => self.error(SyntaxErrorKind::ExpectedExpression(token)),
        }
    }

    // The identifier itself is already consumed; a following '(' makes this
    // a call, anything else a variable reference.
    fn parse_identifier(&mut self, name: String) -> ParseResult<Expr> {
        if self.current != Token::Op('(') {
            return Ok(Expr::Variable(name));
        }
        self.bump(); // eat '('

        let mut args = Vec::new();
        if self.current != Token::Op(')') {
            loop {
                args.push(self.parse_expr()?);
                if self.current == Token::Op(')') {
                    break;
                }
                if self.current != Token::Op(',') {
                    return self.error(SyntaxErrorKind::BadArgumentList);
                }
                self.bump(); // eat ','
            }
        }
        self.bump(); // eat ')'

        Ok(Expr::Call(name, args))
    }

    fn parse_paren(&mut self) -> ParseResult<Expr> {
        self.bump(); // eat '('
        let inner = self.parse_expr()?;
        if self.current != Token::Op(')') {
            return self.error(SyntaxErrorKind::UnclosedParen);
        }
        self.bump(); // eat ')'
        Ok(inner)
    }
}

/// Parses a whole source string, failing on the first syntax error.
pub fn parse_str(source: &str) -> ParseResult<Vec<Item>> {
    let mut parser = Parser::new(source);
    let mut items = Vec::new();
    while let Some(item) = parser.next_item() {
        items.push(item?);
    }
    Ok(items)
}

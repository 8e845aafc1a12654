use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Eof,
    Def,
    Extern,
    Ident(String),
    Number(f64),
    Op(char),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof => write!(f, "end of input"),
            Token::Def => write!(f, "'def'"),
            Token::Extern => write!(f, "'extern'"),
            Token::Ident(name) => write!(f, "identifier '{}'", name),
            Token::Number(value) => write!(f, "number {}", value),
            Token::Op(op) => write!(f, "'{}'", op),
        }
    }
}

lazy_static! {
    static ref IDENT_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9]*").unwrap();
    static ref NUMBER_RE: Regex = Regex::new(r"^[0-9.]+").unwrap();
}

/// Scans tokens out of a source string one call at a time, tracking the
/// line and column where the current token started.
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: u32,
    col: u32,
    tok_line: u32,
    tok_col: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            pos: 0,
            line: 1,
            col: 1,
            tok_line: 1,
            tok_col: 1,
        }
    }

    /// Line (1-based) where the most recently returned token started.
    pub fn line(&self) -> u32 {
        self.tok_line
    }

    /// Column (1-based) where the most recently returned token started.
    pub fn column(&self) -> u32 {
        self.tok_col
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    fn skip_ignored(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '#' {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    /// Returns the next token, or `Token::Eof` forever once the input is
    /// exhausted. Never fails: numeric text that doesn't parse as an `f64`
    /// (e.g. `1.2.3`) lexes as `Number(0.0)`, and any character that starts
    /// no other token class is returned verbatim as `Op`.
    pub fn next_token(&mut self) -> Token {
        self.skip_ignored();
        self.tok_line = self.line;
        self.tok_col = self.col;

        let rest = &self.source[self.pos..];
        if rest.is_empty() {
            return Token::Eof;
        }

        if let Some(m) = IDENT_RE.find(rest) {
            let text = m.as_str().to_string();
            self.advance_ascii(m.end());
            return match text.as_str() {
                "def" => Token::Def,
                "extern" => Token::Extern,
                _ => Token::Ident(text),
            };
        }

        if let Some(m) = NUMBER_RE.find(rest) {
            let value = m.as_str().parse().unwrap_or(0.0);
            self.advance_ascii(m.end());
            return Token::Number(value);
        }

        let c = rest.chars().next().unwrap_or('\0');
        self.bump();
        Token::Op(c)
    }

    // Identifier and number matches are ASCII with no newlines, so byte
    // length equals column width.
    fn advance_ascii(&mut self, len: usize) {
        self.pos += len;
        self.col += len as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    #[test]
    fn lex_works() {
        let input = "def add(x y) x+1.0";
        let tokenized = [
            Token::Def,
            Token::Ident("add".to_string()),
            Token::Op('('),
            Token::Ident("x".to_string()),
            Token::Ident("y".to_string()),
            Token::Op(')'),
            Token::Ident("x".to_string()),
            Token::Op('+'),
            Token::Number(1.0),
            Token::Eof,
        ];
        assert_eq!(lex_all(input), tokenized);
    }

    #[test]
    fn keywords_need_exact_match() {
        let input = "def extern definition externs";
        let tokenized = [
            Token::Def,
            Token::Extern,
            Token::Ident("definition".to_string()),
            Token::Ident("externs".to_string()),
            Token::Eof,
        ];
        assert_eq!(lex_all(input), tokenized);
    }

    #[test]
    fn comments_are_ignored() {
        let input = "# a whole line\nfoo # trailing\nbar";
        let tokenized = [
            Token::Ident("foo".to_string()),
            Token::Ident("bar".to_string()),
            Token::Eof,
        ];
        assert_eq!(lex_all(input), tokenized);
    }

    #[test]
    fn comment_lines_still_count_for_positions() {
        let mut lexer = Lexer::new("# one\n# two\n  foo");
        assert_eq!(lexer.next_token(), Token::Ident("foo".to_string()));
        assert_eq!((lexer.line(), lexer.column()), (3, 3));
    }

    #[test]
    fn eof_repeats() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token(), Token::Ident("x".to_string()));
        assert_eq!(lexer.next_token(), Token::Eof);
        assert_eq!(lexer.next_token(), Token::Eof);
    }

    #[test]
    fn malformed_number_lexes_to_zero() {
        assert_eq!(lex_all("1.2.3"), [Token::Number(0.0), Token::Eof]);
    }

    #[test]
    fn minus_is_a_separate_operator() {
        let tokenized = [Token::Op('-'), Token::Number(3.0), Token::Eof];
        assert_eq!(lex_all("-3"), tokenized);
    }

    #[test]
    fn token_positions_track_lines_and_columns() {
        let mut lexer = Lexer::new("a\n  bc d");
        lexer.next_token();
        assert_eq!((lexer.line(), lexer.column()), (1, 1));
        lexer.next_token();
        assert_eq!((lexer.line(), lexer.column()), (2, 3));
        lexer.next_token();
        assert_eq!((lexer.line(), lexer.column()), (2, 6));
    }
}

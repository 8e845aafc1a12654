use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Binary(char, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

#[derive(Debug, PartialEq, Clone)]
pub struct Prototype {
    pub name: String,
    pub params: Vec<String>,
}

impl Prototype {
    /// The synthesized wrapper around a bare top-level expression has an
    /// empty name and no parameters.
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Function {
    pub prototype: Prototype,
    pub body: Expr,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Item {
    Extern(Prototype),
    Function(Function),
}

// The rendered form parses back to the same tree: binary expressions are
// always parenthesized, so operator precedence can't reshape them.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(value) => write!(f, "{}", value),
            Expr::Variable(name) => write!(f, "{}", name),
            Expr::Binary(op, lhs, rhs) => write!(f, "({} {} {})", lhs, op, rhs),
            Expr::Call(callee, args) => {
                write!(f, "{}(", callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(" "))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prototype.is_anonymous() {
            write!(f, "{}", self.body)
        } else {
            write!(f, "def {} {}", self.prototype, self.body)
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Extern(prototype) => write!(f, "extern {}", prototype),
            Item::Function(function) => write!(f, "{}", function),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_parenthesizes_binaries() {
        let expr = Expr::Binary(
            '+',
            Box::new(Expr::Number(1.0)),
            Box::new(Expr::Binary(
                '*',
                Box::new(Expr::Number(2.0)),
                Box::new(Expr::Number(3.0)),
            )),
        );
        assert_eq!(expr.to_string(), "(1 + (2 * 3))");
    }

    #[test]
    fn display_call_and_prototype() {
        let call = Expr::Call(
            "foo".to_string(),
            vec![Expr::Number(1.0), Expr::Variable("x".to_string())],
        );
        assert_eq!(call.to_string(), "foo(1, x)");

        let proto = Prototype {
            name: "foo".to_string(),
            params: vec!["x".to_string(), "y".to_string()],
        };
        assert_eq!(Item::Extern(proto).to_string(), "extern foo(x y)");
    }

    #[test]
    fn anonymous_function_displays_as_its_body() {
        let function = Function {
            prototype: Prototype {
                name: String::new(),
                params: Vec::new(),
            },
            body: Expr::Number(4.0),
        };
        assert_eq!(Item::Function(function).to_string(), "4");
    }
}

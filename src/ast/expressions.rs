use std::fmt::{self, Display};

use crate::lexer::tokens::TokenKind;

use super::{ast::Expr, statements::BlockStmt};

// LITERALS

/// Identifier Expression
/// Represents a name in the AST, including the callee of a call.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierExpr {
    pub name: String,
}

impl Display for IdentifierExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Number Expression
/// All numeric literals are stored as `f64`; `5` renders back as `5`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberExpr {
    pub value: f64,
}

impl Display for NumberExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanExpr {
    pub value: bool,
}

impl Display for BooleanExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// String Expression
/// Holds the unescaped content; rendering escapes it again.
#[derive(Debug, Clone, PartialEq)]
pub struct StringExpr {
    pub value: String,
}

impl Display for StringExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"")?;
        for ch in self.value.chars() {
            match ch {
                '"' => write!(f, "\\\"")?,
                '\\' => write!(f, "\\\\")?,
                '\n' => write!(f, "\\n")?,
                '\t' => write!(f, "\\t")?,
                '\r' => write!(f, "\\r")?,
                '\0' => write!(f, "\\0")?,
                _ => write!(f, "{}", ch)?,
            }
        }
        write!(f, "\"")
    }
}

/// Command Expression
/// The raw text of a backtick segment. It is never interpreted here; the
/// evaluator hands it to the shell.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandExpr {
    pub command: String,
}

impl Display for CommandExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`")?;
        for ch in self.command.chars() {
            match ch {
                '`' => write!(f, "\\`")?,
                '\\' => write!(f, "\\\\")?,
                _ => write!(f, "{}", ch)?,
            }
        }
        write!(f, "`")
    }
}

// OPERATORS

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOperator {
    Not,
    Negate,
}

impl PrefixOperator {
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Not => Some(PrefixOperator::Not),
            TokenKind::Dash => Some(PrefixOperator::Negate),
            _ => None,
        }
    }
}

impl Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixOperator::Not => write!(f, "!"),
            PrefixOperator::Negate => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
}

impl InfixOperator {
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(InfixOperator::Plus),
            TokenKind::Dash => Some(InfixOperator::Minus),
            TokenKind::Star => Some(InfixOperator::Multiply),
            TokenKind::Slash => Some(InfixOperator::Divide),
            TokenKind::Percent => Some(InfixOperator::Modulo),
            TokenKind::Equals => Some(InfixOperator::Equals),
            TokenKind::NotEquals => Some(InfixOperator::NotEquals),
            TokenKind::Less => Some(InfixOperator::Less),
            TokenKind::LessEquals => Some(InfixOperator::LessEquals),
            TokenKind::Greater => Some(InfixOperator::Greater),
            TokenKind::GreaterEquals => Some(InfixOperator::GreaterEquals),
            _ => None,
        }
    }
}

impl Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            InfixOperator::Plus => "+",
            InfixOperator::Minus => "-",
            InfixOperator::Multiply => "*",
            InfixOperator::Divide => "/",
            InfixOperator::Modulo => "%",
            InfixOperator::Equals => "==",
            InfixOperator::NotEquals => "!=",
            InfixOperator::Less => "<",
            InfixOperator::LessEquals => "<=",
            InfixOperator::Greater => ">",
            InfixOperator::GreaterEquals => ">=",
        };
        write!(f, "{}", symbol)
    }
}

// COMPLEX

/// Prefix Expression
/// Rendered as `(<op><right>)`, e.g. `(-1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpr {
    pub operator: PrefixOperator,
    pub right: Box<Expr>,
}

impl Display for PrefixExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}{})", self.operator, self.right)
    }
}

/// Infix Expression
/// Rendered as `(<left> <op> <right>)`, so nesting shows how precedence bound.
#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpr {
    pub left: Box<Expr>,
    pub operator: InfixOperator,
    pub right: Box<Expr>,
}

impl Display for InfixExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub condition: Box<Expr>,
    pub consequence: BlockStmt,
    pub alternative: Option<BlockStmt>,
}

impl Display for IfExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.condition.renders_parenthesized() {
            write!(f, "if {} {}", self.condition, self.consequence)?;
        } else {
            write!(f, "if ({}) {}", self.condition, self.consequence)?;
        }

        if let Some(alternative) = &self.alternative {
            write!(f, " else {}", alternative)?;
        }
        Ok(())
    }
}

/// Function Literal
/// `fn(<parameters>) { <body> }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub parameters: Vec<IdentifierExpr>,
    pub body: BlockStmt,
}

impl Display for FunctionExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parameters = self
            .parameters
            .iter()
            .map(|parameter| parameter.name.as_str())
            .collect::<Vec<&str>>()
            .join(", ");

        write!(f, "fn({}) {}", parameters, self.body)
    }
}

/// Call Expression
/// Only a bare identifier can be called.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: IdentifierExpr,
    pub arguments: Vec<Expr>,
}

impl Display for CallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arguments = self
            .arguments
            .iter()
            .map(|argument| argument.to_string())
            .collect::<Vec<String>>()
            .join(", ");

        write!(f, "{}({})", self.callee, arguments)
    }
}

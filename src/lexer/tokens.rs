use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("let", TokenKind::Let);
        map.insert("fn", TokenKind::Fn);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("for", TokenKind::For);
        map.insert("in", TokenKind::In);
        map.insert("return", TokenKind::Return);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map
    };
}

/// Resolves a scanned name to its keyword kind, or `Identifier`.
pub fn lookup_identifier(name: &str) -> TokenKind {
    RESERVED_LOOKUP
        .get(name)
        .copied()
        .unwrap_or(TokenKind::Identifier)
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Illegal,
    EOF,
    Number,
    String,
    Command,
    Identifier,

    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Dot,
    Semicolon, // `;` or a newline
    Comma,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    Let,
    Fn,
    If,
    Else,
    For,
    In,
    Return,
    True,
    False,
}

impl TokenKind {
    /// The name used for this kind in diagnostics.
    pub fn readable_name(&self) -> &'static str {
        match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::EOF => "EOF",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Command => "COMMAND",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::OpenCurly => "LBRACE",
            TokenKind::CloseCurly => "RBRACE",
            TokenKind::OpenParen => "LPAREN",
            TokenKind::CloseParen => "RPAREN",
            TokenKind::Assignment => "ASSIGN",
            TokenKind::Equals => "EQUAL",
            TokenKind::Not => "NOT",
            TokenKind::NotEquals => "NOT_EQUAL",
            TokenKind::Less => "LESS",
            TokenKind::LessEquals => "LESS_EQUAL",
            TokenKind::Greater => "GREATER",
            TokenKind::GreaterEquals => "GREATER_EQUAL",
            TokenKind::Dot => "DOT",
            TokenKind::Semicolon => "LINEEND",
            TokenKind::Comma => "COMMA",
            TokenKind::Plus => "PLUS",
            TokenKind::Dash => "MINUS",
            TokenKind::Slash => "SLASH",
            TokenKind::Star => "ASTERISK",
            TokenKind::Percent => "PERCENT",
            TokenKind::Let => "LET",
            TokenKind::Fn => "FUNCTION",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::For => "FOR",
            TokenKind::In => "IN",
            TokenKind::Return => "RETURN",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.readable_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {:?}}}", self.kind, self.value)
    }
}

impl Token {
    /// Whether this token is a newline rather than a written `;`.
    pub fn is_line_break(&self) -> bool {
        self.kind == TokenKind::Semicolon && self.value == "\n"
    }
}

use std::fmt::Display;

use thiserror::Error;

use crate::{lexer::tokens::TokenKind, Position};

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NoPrefixRule { .. } => "NoPrefixRule",
            ErrorImpl::IllegalToken { .. } => "IllegalToken",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnterminatedBlock => "UnterminatedBlock",
            ErrorImpl::NestingTooDeep { .. } => "NestingTooDeep",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken {
                expected,
                found,
                token,
            } => ErrorTip::Suggestion(format!(
                "expected {}, found {} `{}`",
                expected, found, token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NoPrefixRule { kind } => ErrorTip::Suggestion(format!(
                "`{}` cannot start an expression",
                kind
            )),
            ErrorImpl::IllegalToken { token } => {
                if token.starts_with('"') || token.starts_with('`') {
                    ErrorTip::Suggestion(format!(
                        "`{}` is never closed, did you miss a closing quote?",
                        token
                    ))
                } else {
                    ErrorTip::Suggestion(format!("`{}` is not valid here", token))
                }
            }
            ErrorImpl::NumberParseError { token } => {
                ErrorTip::Suggestion(format!("Invalid number: `{}`", token))
            }
            ErrorImpl::UnterminatedBlock => ErrorTip::None,
            ErrorImpl::NestingTooDeep { .. } => ErrorTip::Suggestion(String::from(
                "Split the expression into smaller `let` bindings",
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("expected {expected}, found {found} `{token}`")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        token: String,
    },
    #[error("unexpected token ({message}): `{token}`")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("no expression-parsing rule for token `{kind}`")]
    NoPrefixRule { kind: TokenKind },
    #[error("illegal token `{token}`")]
    IllegalToken { token: String },
    #[error("error parsing number: `{token}`")]
    NumberParseError { token: String },
    #[error("reached end of input before closing `}}`")]
    UnterminatedBlock,
    #[error("expressions and blocks nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

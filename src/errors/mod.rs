//! Error types and error handling for the front end.
//!
//! This module defines the error types produced while parsing. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for each kind of syntax failure
//! - Helpful error messages and suggestions
//!
//! Lexical problems are not errors at this level: the lexer emits `Illegal`
//! tokens and the parser reports them when it meets one.

pub mod errors;

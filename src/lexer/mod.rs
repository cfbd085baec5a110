//! Lexical analysis module for the shell language.
//!
//! This module contains the lexer (tokenizer) that converts source text
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using anchored regex patterns
//! - Recognition of keywords, identifiers, numbers and operators
//! - String literals and backtick command segments
//! - Newlines as statement terminators
//! - Comments and whitespace handling
//!
//! The lexer never fails: anything it cannot classify becomes an
//! `Illegal` token for the parser to report.

pub mod lexer;
pub mod tokens;

//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the `parse` entry point.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and specialized functions for statement parsing.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence

use std::{collections::HashMap, rc::Rc};

use log::debug;

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span, MK_TOKEN,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and the lookup tables for parsing
/// statements and expressions. It tracks the current position in the token
/// stream and provides methods for token consumption.
pub struct Parser {
    /// The list of tokens to parse
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source being parsed
    file: Rc<String>,
    /// Returned for every read past the end of `tokens`
    eof: Token,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for infix binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// How many nested expressions and blocks are currently open
    depth: usize,
}

/// Deepest nesting of expressions and blocks accepted before giving up.
pub const MAX_NESTING_DEPTH: usize = 128;

impl Parser {
    /// Creates a new Parser instance with empty lookup tables.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Vector of tokens to parse
    /// * `file` - Reference-counted string containing the source name
    pub fn new(tokens: Vec<Token>, file: Rc<String>) -> Self {
        let end = tokens.last().map(|token| token.span.end.0).unwrap_or(0);
        let eof = MK_TOKEN!(
            TokenKind::EOF,
            String::from("EOF"),
            Span {
                start: Position(end, Rc::clone(&file)),
                end: Position(end, Rc::clone(&file)),
            }
        );

        Parser {
            tokens,
            pos: 0,
            file,
            eof,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            depth: 0,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the token after the current one without advancing.
    pub fn peek_token(&self) -> &Token {
        self.tokens.get(self.pos + 1).unwrap_or(&self.eof)
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos;
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        self.tokens.get(index).unwrap_or(&self.eof)
    }

    /// Expects a token of the specified kind, with an optional custom message.
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    /// With a message the error is `UnexpectedTokenDetailed`.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        message: Option<&str>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind == expected_kind {
            return Ok(self.advance().clone());
        }

        match message {
            Some(message) => Err(self.error(ErrorImpl::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: String::from(message),
            })),
            None if token.kind == TokenKind::Illegal => Err(self.error(ErrorImpl::IllegalToken {
                token: token.value.clone(),
            })),
            None => Err(self.error(ErrorImpl::UnexpectedToken {
                expected: expected_kind,
                found: token.kind,
                token: token.value.clone(),
            })),
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Ends a statement.
    ///
    /// A `;` or newline is consumed. A closing `}` or the end of input also
    /// ends the statement but is left for the enclosing block or driver.
    pub fn expect_terminator(&mut self) -> Result<(), Error> {
        let token = self.current_token();
        match token.kind {
            TokenKind::Semicolon => {
                self.advance();
                Ok(())
            }
            TokenKind::CloseCurly | TokenKind::EOF => Ok(()),
            TokenKind::Illegal => Err(self.error(ErrorImpl::IllegalToken {
                token: token.value.clone(),
            })),
            _ => Err(self.error(ErrorImpl::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: String::from("expected `;` or a newline to end the statement"),
            })),
        }
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `binding_power` - The precedence/binding power for this operator
    /// * `led_fn` - The handler function for this infix operator
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// A token may have both a NUD and a LED handler (`-`); registering the
    /// NUD leaves its infix binding power untouched.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Returns the position of the current token in the source.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Builds an error located at the current token.
    pub fn error(&self, error_impl: ErrorImpl) -> Error {
        Error::new(error_impl, self.get_position())
    }

    /// Runs `parse_fn` one nesting level deeper.
    ///
    /// Fails with `NestingTooDeep` once `MAX_NESTING_DEPTH` levels are open.
    pub fn nested<T>(
        &mut self,
        parse_fn: impl FnOnce(&mut Parser) -> Result<T, Error>,
    ) -> Result<T, Error> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error(ErrorImpl::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            }));
        }

        self.depth += 1;
        let result = parse_fn(self);
        self.depth -= 1;
        result
    }

    /// Skips the remainder of a failed statement.
    ///
    /// Rewinds to the statement's first token and moves forward to just past
    /// the first terminator outside any braces or parentheses, so the tokens
    /// of nested blocks and argument lists are skipped along with it. Inside
    /// an unclosed `(`, a line break followed by `let` or `return` still ends
    /// the statement. A `}` without a matching `{` also ends the statement.
    /// Always consumes at least one token unless at `EOF`.
    pub fn synchronize(&mut self, statement_start: usize) {
        self.pos = statement_start;
        let mut braces = 0usize;
        let mut parens = 0usize;

        loop {
            match self.current_token_kind() {
                TokenKind::EOF => break,
                TokenKind::Semicolon if braces == 0 && parens == 0 => {
                    self.advance();
                    break;
                }
                TokenKind::Semicolon if braces == 0 && self.line_break_before_statement() => {
                    self.advance();
                    break;
                }
                TokenKind::OpenCurly => braces += 1,
                TokenKind::CloseCurly if braces == 0 => {
                    self.advance();
                    break;
                }
                TokenKind::CloseCurly => braces -= 1,
                TokenKind::OpenParen => parens += 1,
                TokenKind::CloseParen => parens = parens.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
    }

    fn line_break_before_statement(&self) -> bool {
        self.current_token().is_line_break()
            && matches!(self.peek_token().kind, TokenKind::Let | TokenKind::Return)
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn file(&self) -> &Rc<String> {
        &self.file
    }
}

/// Parses a stream of tokens into a Program.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes the lookup tables, and parses statements until EOF. A statement
/// that fails is left out of the program; its error is recorded and parsing
/// resumes at the next statement.
///
/// # Returns
///
/// A tuple containing the (possibly partial) Program and every error found,
/// in source order.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> (Program, Vec<Error>) {
    let mut parser = Parser::new(tokens, file);
    create_token_lookups(&mut parser);

    debug!(
        "parsing {} tokens from {}",
        parser.tokens.len(),
        parser.file()
    );

    let mut statements = vec![];
    let mut errors = vec![];

    while parser.has_tokens() {
        if parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
            continue;
        }

        let start = parser.pos();
        match parse_stmt(&mut parser) {
            Ok(stmt) => statements.push(stmt),
            Err(error) => {
                debug!(
                    "statement at token {} failed ({}), skipping to the next statement",
                    start, error
                );
                errors.push(error);
                parser.synchronize(start);
            }
        }
    }

    (Program { statements }, errors)
}

use log::trace;

use crate::{
    ast::{
        ast::Stmt,
        expressions::IdentifierExpr,
        statements::{BlockStmt, ExpressionStmt, LetStmt, ReturnStmt},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::parser::Parser;

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let kind = parser.current_token_kind();
    trace!("parsing statement starting with {}", kind);

    if let Some(handler) = parser.get_stmt_lookup().get(&kind).copied() {
        return handler(parser);
    }

    let expression = parse_expr(parser, BindingPower::Default)?;
    parser.expect_terminator()?;

    Ok(Stmt::Expression(ExpressionStmt { expression }))
}

/// `let <identifier> = <expression>`
pub fn parse_let_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Let)?;

    let name = parser.expect(TokenKind::Identifier)?.value;
    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;

    parser.expect_terminator()?;

    Ok(Stmt::Let(LetStmt {
        name: IdentifierExpr { name },
        value,
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Return)?;

    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect_terminator()?;

    Ok(Stmt::Return(ReturnStmt { value }))
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Block(parse_block(parser)?))
}

/// Parses `{ ... }`. Empty statements inside the braces are skipped.
pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    parser.nested(parse_block_body)
}

fn parse_block_body(parser: &mut Parser) -> Result<BlockStmt, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut statements = Vec::new();
    loop {
        match parser.current_token_kind() {
            TokenKind::CloseCurly => {
                parser.advance();
                break;
            }
            TokenKind::EOF => return Err(parser.error(ErrorImpl::UnterminatedBlock)),
            TokenKind::Semicolon => {
                parser.advance();
            }
            _ => statements.push(parse_stmt(parser)?),
        }
    }

    Ok(BlockStmt { body: statements })
}

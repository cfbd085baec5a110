use crate::{
    ast::{
        ast::Expr,
        expressions::{
            BooleanExpr, CallExpr, CommandExpr, FunctionExpr, IdentifierExpr, IfExpr, InfixExpr,
            InfixOperator, NumberExpr, PrefixExpr, PrefixOperator, StringExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser, stmt::parse_block};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    parser.nested(|parser| parse_expr_at_depth(parser, bp))
}

fn parse_expr_at_depth(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None if token_kind == TokenKind::Illegal => {
            return Err(parser.error(ErrorImpl::IllegalToken {
                token: parser.current_token().value.clone(),
            }))
        }
        None => return Err(parser.error(ErrorImpl::NoPrefixRule { kind: token_kind })),
    };

    let mut left = nud(parser)?;

    // While the next operator binds tighter than the caller's, keep extending the lhs
    while let Some(next_bp) = parser
        .get_bp_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        if next_bp <= bp {
            break;
        }

        let token_kind = parser.current_token_kind();
        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => panic!("binding power registered for {} without an infix handler", token_kind),
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    let expr = match token.kind {
        TokenKind::Number => match token.value.parse::<f64>() {
            // Too many digits parse as infinity
            Ok(value) if value.is_finite() => Expr::Number(NumberExpr { value }),
            _ => {
                return Err(parser.error(ErrorImpl::NumberParseError { token: token.value }))
            }
        },
        TokenKind::String => Expr::String(StringExpr { value: token.value }),
        TokenKind::Command => Expr::Command(CommandExpr {
            command: token.value,
        }),
        TokenKind::True => Expr::Boolean(BooleanExpr { value: true }),
        TokenKind::False => Expr::Boolean(BooleanExpr { value: false }),
        kind => return Err(parser.error(ErrorImpl::NoPrefixRule { kind })),
    };

    parser.advance();
    Ok(expr)
}

/// Parses an identifier, or a call when the name is directly followed by `(`.
pub fn parse_identifier_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let name = parser.expect(TokenKind::Identifier)?.value;
    let identifier = IdentifierExpr { name };

    if parser.current_token_kind() != TokenKind::OpenParen {
        return Ok(Expr::Identifier(identifier));
    }

    let arguments = parse_comma_separated(parser, "argument list", |parser| {
        parse_expr(parser, BindingPower::Default)
    })?;

    Ok(Expr::Call(CallExpr {
        callee: identifier,
        arguments,
    }))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.current_token().clone();
    let operator = match InfixOperator::from_token_kind(operator_token.kind) {
        Some(operator) => operator,
        None => {
            return Err(parser.error(ErrorImpl::UnexpectedTokenDetailed {
                token: operator_token.value,
                message: String::from("expected an infix operator"),
            }))
        }
    };
    parser.advance();

    // Parsing the rhs at the operator's own power makes equal powers associate left
    let right = parse_expr(parser, bp)?;

    Ok(Expr::Infix(InfixExpr {
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.current_token().clone();
    let operator = match PrefixOperator::from_token_kind(operator_token.kind) {
        Some(operator) => operator,
        None => return Err(parser.error(ErrorImpl::NoPrefixRule { kind: operator_token.kind })),
    };
    parser.advance();

    let rhs = parse_expr(parser, BindingPower::Prefix)?;

    Ok(Expr::Prefix(PrefixExpr {
        operator,
        right: Box::new(rhs),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// `if (<condition>) { ... } else { ... }`
pub fn parse_if_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::If)?;

    parser.expect_error(TokenKind::OpenParen, Some("expected `(` after `if`"))?;

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    let consequence = parse_block(parser)?;

    // `}` and `else` may sit on different lines
    if parser.current_token().is_line_break() && parser.peek_token().kind == TokenKind::Else {
        parser.advance();
    }

    let alternative = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_block(parser)?)
    } else {
        None
    };

    Ok(Expr::If(IfExpr {
        condition: Box::new(condition),
        consequence,
        alternative,
    }))
}

/// `fn(<parameters>) { ... }`
pub fn parse_fn_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::Fn)?;

    let parameters = parse_comma_separated(parser, "parameter list", |parser| {
        let name = parser.expect(TokenKind::Identifier)?.value;
        Ok(IdentifierExpr { name })
    })?;

    let body = parse_block(parser)?;

    Ok(Expr::Function(FunctionExpr { parameters, body }))
}

/// Parses `( item, item, ... )`, rejecting a trailing comma.
fn parse_comma_separated<T>(
    parser: &mut Parser,
    what: &str,
    mut parse_item: impl FnMut(&mut Parser) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut items = vec![];
    if parser.current_token_kind() == TokenKind::CloseParen {
        parser.advance();
        return Ok(items);
    }

    loop {
        items.push(parse_item(parser)?);

        if parser.current_token_kind() != TokenKind::Comma {
            parser.expect(TokenKind::CloseParen)?;
            return Ok(items);
        }
        parser.advance();

        if parser.current_token_kind() == TokenKind::CloseParen {
            return Err(parser.error(ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: format!("trailing comma in {}", what),
            }));
        }
    }
}

use std::rc::Rc;

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::{Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{lookup_identifier, Token, TokenKind};

/// Receives the lexer positioned at the start of a match, plus the match length.
pub type RegexHandler = fn(&mut Lexer, usize);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(regex: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(regex).expect("lexer patterns are valid regexes"),
        handler,
    }
}

lazy_static! {
    // Every pattern is anchored and matches at least one character. Order
    // matters: two-character operators must come before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern(r"^[ \t\r]+", skip_handler),
        pattern(r"^\n", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, "\n")),
        pattern(r"^#[^\n]*", skip_handler),
        pattern(r"^[a-zA-Z_]+", symbol_handler),
        pattern(r"^[0-9][0-9.]*", number_handler),
        pattern("^\"", string_handler),
        pattern("^`", command_handler),
        pattern(r"^==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern(r"^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern(r"^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern(r"^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern(r"^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern(r"^!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
        pattern(r"^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern(r"^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern(r"^\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern(r"^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern(r"^\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern(r"^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern(r"^%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
        pattern(r"^\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern(r"^\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern(r"^\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern(r"^\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern(r"^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern(r"^\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern(r"^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            pos: 0,
            tokens: vec![],
            source,
            file: file_name,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn span_at(&self, start: usize, end: usize) -> Span {
        Span {
            start: Position(start as u32, Rc::clone(&self.file)),
            end: Position(end as u32, Rc::clone(&self.file)),
        }
    }

    /// Emits the next `len` bytes as a token of the given kind.
    fn push_slice(&mut self, kind: TokenKind, len: usize) {
        let value = self.remainder()[..len].to_string();
        let span = self.span_at(self.pos, self.pos + len);
        self.push(MK_TOKEN!(kind, value, span));
        self.advance_n(len);
    }
}

fn skip_handler(lexer: &mut Lexer, matched: usize) {
    lexer.advance_n(matched);
}

fn symbol_handler(lexer: &mut Lexer, matched: usize) {
    let kind = lookup_identifier(&lexer.remainder()[..matched]);
    lexer.push_slice(kind, matched);
}

/// A run of digits and dots is a number only with at most one dot that is
/// followed by a digit; anything else is kept whole as an illegal token.
fn number_handler(lexer: &mut Lexer, matched: usize) {
    let run = &lexer.remainder()[..matched];
    let well_formed = run.matches('.').count() <= 1 && !run.ends_with('.');

    let kind = if well_formed {
        TokenKind::Number
    } else {
        TokenKind::Illegal
    };
    lexer.push_slice(kind, matched);
}

fn string_handler(lexer: &mut Lexer, _matched: usize) {
    delimited_handler(lexer, '"', TokenKind::String, |ch| match ch {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '0' => Some('\0'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        _ => None,
    });
}

fn command_handler(lexer: &mut Lexer, _matched: usize) {
    delimited_handler(lexer, '`', TokenKind::Command, |ch| match ch {
        '`' => Some('`'),
        '\\' => Some('\\'),
        _ => None,
    });
}

/// Scans from an opening delimiter to the matching unescaped closing one.
///
/// `escape` maps the character after a backslash to its replacement; `None`
/// keeps the backslash and the character as written. An unterminated segment
/// becomes a single illegal token spanning the rest of the source.
fn delimited_handler(
    lexer: &mut Lexer,
    delimiter: char,
    kind: TokenKind,
    escape: fn(char) -> Option<char>,
) {
    let opening = delimiter.len_utf8();
    let body = &lexer.remainder()[opening..];

    let mut value = String::new();
    let mut closed_at = None;
    let mut chars = body.char_indices();

    while let Some((index, ch)) = chars.next() {
        if ch == delimiter {
            closed_at = Some(index);
            break;
        }

        if ch != '\\' {
            value.push(ch);
            continue;
        }

        match chars.next() {
            Some((_, escaped)) => match escape(escaped) {
                Some(replacement) => value.push(replacement),
                None => {
                    value.push('\\');
                    value.push(escaped);
                }
            },
            None => break,
        }
    }

    match closed_at {
        Some(index) => {
            let len = opening + index + delimiter.len_utf8();
            let span = lexer.span_at(lexer.pos, lexer.pos + len);
            lexer.push(MK_TOKEN!(kind, value, span));
            lexer.advance_n(len);
        }
        None => {
            let len = lexer.remainder().len();
            lexer.push_slice(TokenKind::Illegal, len);
        }
    }
}

fn illegal_handler(lexer: &mut Lexer) {
    if let Some(ch) = lexer.at() {
        lexer.push_slice(TokenKind::Illegal, ch.len_utf8());
    }
}

/// Converts source text into tokens, always ending with a single `EOF`.
pub fn tokenize(source: String, file: Option<String>) -> Vec<Token> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let matched = PATTERNS.iter().find_map(|pattern| {
            pattern
                .regex
                .find(lex.remainder())
                .map(|found| (pattern.handler, found.end()))
        });

        match matched {
            Some((handler, len)) => handler(&mut lex, len),
            None => illegal_handler(&mut lex),
        }
    }

    let span = lex.span_at(lex.pos, lex.pos);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));

    trace!("tokenized {} into {} tokens", lex.file, lex.tokens.len());
    lex.tokens
}

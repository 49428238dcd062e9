//! Source text → token stream.
//!
//! The scan keeps going past bad lexemes so one run reports every
//! problem; the pass fails afterwards if anything was recorded.
//! Class names are recognized against the selected language here, which
//! is why a language must be chosen before lexing starts.

use log::trace;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till, take_until};
use nom::character::complete::{alpha1, alphanumeric1, char as nom_char, digit1, multispace0, one_of};
use nom::combinator::{opt, recognize};
use nom::multi::many0;
use nom::sequence::{pair, preceded};
use nom::{IResult, Input, Parser};
use nom_locate::LocatedSpan;

use syntax::Language;

use crate::diagnostics::Diagnostics;
use crate::keywords;
use crate::token::{Token, TokenKind};

pub type Span<'a> = LocatedSpan<&'a str>;
type LResult<'a, O> = IResult<Span<'a>, O>;

fn lex_identifier(input: Span<'_>) -> LResult<'_, Span<'_>> {
    recognize(pair(
        alt((alpha1, recognize(nom_char('_')))),
        many0(alt((alphanumeric1, recognize(nom_char('_'))))),
    ))
    .parse(input)
}

/// `#` followed by alphanumerics or `-` (directives are kebab-case).
fn lex_keyword(input: Span<'_>) -> LResult<'_, Span<'_>> {
    recognize(preceded(
        nom_char('#'),
        many0(alt((alphanumeric1, recognize(nom_char('-'))))),
    ))
    .parse(input)
}

fn lex_number(input: Span<'_>) -> LResult<'_, Span<'_>> {
    recognize((
        opt(one_of("+-")),
        digit1,
        opt(preceded(nom_char('.'), digit1)),
    ))
    .parse(input)
}

fn line_comment(input: Span<'_>) -> LResult<'_, Span<'_>> {
    recognize(pair(tag("//"), take_till(|c| c == '\n'))).parse(input)
}

fn block_comment(input: Span<'_>) -> LResult<'_, Span<'_>> {
    recognize((tag("/*"), take_until("*/"), tag("*/"))).parse(input)
}

/// Consumes whitespace and comments. An unterminated block comment is
/// reported and swallows the rest of the input.
fn skip_trivia<'a>(
    mut input: Span<'a>,
    diags: &mut Diagnostics,
    line_offset: u32,
) -> Span<'a> {
    loop {
        let before = input.fragment().len();
        if let Ok((rest, _)) = multispace0::<Span<'a>, nom::error::Error<Span<'a>>>(input) {
            input = rest;
        }
        let fragment: &str = input.fragment();
        if fragment.starts_with("//") {
            if let Ok((rest, _)) = line_comment(input) {
                input = rest;
            }
        } else if fragment.starts_with("/*") {
            match block_comment(input) {
                Ok((rest, _)) => input = rest,
                Err(_) => {
                    diags.report(
                        input.location_line() + line_offset,
                        input.get_utf8_column(),
                        "/*",
                        "unterminated block comment",
                    );
                    input = input.take_from(input.fragment().len());
                }
            }
        }
        if input.fragment().len() == before {
            return input;
        }
    }
}

struct ScannedString {
    /// Bytes consumed from the input, delimiters included.
    consumed: usize,
    /// Payload with escapes resolved.
    content: String,
    terminated: bool,
}

/// Scans a string body after its opening delimiter. A backslash escapes
/// the next character (which is kept verbatim, the backslash dropped);
/// newlines are allowed in the body.
fn scan_string(fragment: &str, delimiter: &str) -> ScannedString {
    let mut content = String::new();
    let mut rest = &fragment[delimiter.len()..];
    let mut consumed = delimiter.len();
    loop {
        if rest.is_empty() {
            return ScannedString {
                consumed,
                content,
                terminated: false,
            };
        }
        if let Some(stripped) = rest.strip_prefix('\\') {
            match stripped.chars().next() {
                Some(c) => {
                    content.push(c);
                    consumed += 1 + c.len_utf8();
                    rest = &stripped[c.len_utf8()..];
                }
                None => {
                    consumed += 1;
                    rest = "";
                }
            }
            continue;
        }
        if rest.starts_with(delimiter) {
            return ScannedString {
                consumed: consumed + delimiter.len(),
                content,
                terminated: true,
            };
        }
        if let Some(c) = rest.chars().next() {
            content.push(c);
            consumed += c.len_utf8();
            rest = &rest[c.len_utf8()..];
        }
    }
}

/// Tokenizes a source file whose `#language` line has already been
/// consumed. `line_offset` is added to every reported line so positions
/// refer to the original file (the coordinator passes 1).
pub fn tokenize(
    source: &str,
    language: &Language,
    line_offset: u32,
) -> Result<Vec<Token>, Diagnostics> {
    trace!("tokenizing {} bytes", source.len());
    let mut tokens = Vec::new();
    let mut diags = Diagnostics::new();
    let mut input = Span::new(source);

    loop {
        input = skip_trivia(input, &mut diags, line_offset);
        let fragment: &str = input.fragment();
        let Some(c) = fragment.chars().next() else {
            break;
        };
        let line = input.location_line() + line_offset;
        let column = input.get_utf8_column();

        match c {
            '{' | '}' | '=' | '(' | ')' | ',' | ';' => {
                let kind = match c {
                    '{' => TokenKind::ScopeEnter,
                    '}' => TokenKind::ScopeExit,
                    '=' => TokenKind::Assign,
                    '(' => TokenKind::ParenOpen,
                    ')' => TokenKind::ParenClose,
                    ',' => TokenKind::Comma,
                    _ => TokenKind::Semicolon,
                };
                tokens.push(Token::new(kind, c.to_string(), line, column));
                input = input.take_from(1);
            }
            '"' => {
                let scanned = scan_string(fragment, "\"");
                if scanned.terminated {
                    tokens.push(Token::new(TokenKind::Str, scanned.content, line, column));
                } else {
                    diags.report(line, column, "\"", "unterminated string");
                }
                input = input.take_from(scanned.consumed);
            }
            '`' => {
                if fragment.starts_with("```") {
                    let scanned = scan_string(fragment, "```");
                    if scanned.terminated {
                        tokens.push(Token::new(TokenKind::StrMd, scanned.content, line, column));
                    } else {
                        diags.report(line, column, "```", "unterminated markdown string");
                    }
                    input = input.take_from(scanned.consumed);
                } else {
                    diags.report(
                        line,
                        column,
                        "`",
                        "unexpected character '`' (markdown strings are delimited by ```)",
                    );
                    input = input.take_from(1);
                }
            }
            '#' => match lex_keyword(input) {
                Ok((rest, lexeme)) => {
                    let text: &str = lexeme.fragment();
                    match keywords::lookup(text) {
                        Some(keyword) => tokens.push(Token::new(
                            TokenKind::Keyword(keyword),
                            text,
                            line,
                            column,
                        )),
                        None => diags.report(line, column, text, "invalid keyword"),
                    }
                    input = rest;
                }
                Err(_) => {
                    diags.report(line, column, "#", "invalid keyword");
                    input = input.take_from(1);
                }
            },
            '/' => {
                diags.report(
                    line,
                    column,
                    "/",
                    "unexpected character '/' (did you mean a comment, // or /*?)",
                );
                input = input.take_from(1);
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                // lex_identifier cannot fail here: the first character
                // already matches its head.
                if let Ok((rest, lexeme)) = lex_identifier(input) {
                    let text: &str = lexeme.fragment();
                    let kind = if language.is_class(text) {
                        TokenKind::Class
                    } else {
                        TokenKind::Identifier
                    };
                    tokens.push(Token::new(kind, text, line, column));
                    input = rest;
                } else {
                    input = input.take_from(c.len_utf8());
                }
            }
            c if c.is_ascii_digit() || c == '+' || c == '-' => match lex_number(input) {
                Ok((rest, lexeme)) => {
                    let text: &str = lexeme.fragment();
                    tokens.push(Token::new(TokenKind::Number, text, line, column));
                    input = rest;
                }
                Err(_) => {
                    diags.report(
                        line,
                        column,
                        c.to_string(),
                        format!("unexpected character '{c}'"),
                    );
                    input = input.take_from(c.len_utf8());
                }
            },
            other => {
                diags.report(
                    line,
                    column,
                    other.to_string(),
                    format!("unexpected character '{other}'"),
                );
                input = input.take_from(other.len_utf8());
            }
        }
    }

    if diags.is_empty() {
        Ok(tokens)
    } else {
        Err(diags)
    }
}

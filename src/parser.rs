//! Recursive-descent parser for puzzle regexes, built from `nom` combinators.
//!
//! ```text
//! regex  := term term*
//! term   := [a-z] | group
//! group  := '(' regex ('|' regex)? ')' suffix?
//! suffix := '*' | '+' | '?'
//! ```
//!
//! Groups nest at most [`MAX_DEPTH`] deep.

use std::fmt::{self, Display, Formatter};

use nom::{
    branch::alt,
    character::complete::{char, one_of, satisfy},
    combinator::{cut, eof, opt},
    error::{ErrorKind, ParseError},
    multi::many0,
    sequence::preceded,
    IResult, Parser,
};
use thiserror::Error;

use crate::ast::Regex;

/// Each group level costs a handful of parser frames; deeper input is
/// rejected with a `SyntaxError` instead of exhausting the stack.
pub const MAX_DEPTH: usize = 256;

/// The token class the parser was looking for when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// A lowercase letter or `(`.
    Term,
    CloseParen,
    /// A lowercase letter; another `(` would exceed [`MAX_DEPTH`].
    Letter,
    /// Anything that may follow a complete top-level regex.
    TermOrEnd,
}

impl Display for Expected {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Term => write!(f, "a-z or `(`"),
            Expected::CloseParen => write!(f, "`)`"),
            Expected::Letter => write!(f, "a-z (groups nest at most {MAX_DEPTH} deep)"),
            Expected::TermOrEnd => write!(f, "a-z, `(` or end of input"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", describe(.found, .position, .expected))]
pub struct SyntaxError {
    /// Character offset into the regex source.
    pub position: usize,
    /// `None` when the input ended early.
    pub found: Option<char>,
    pub expected: Expected,
}

fn describe(found: &Option<char>, position: &usize, expected: &Expected) -> String {
    match found {
        Some(c) => format!("unexpected `{c}` at position {position}, expected {expected}"),
        None => format!("unexpected end of input at position {position}, expected {expected}"),
    }
}

impl SyntaxError {
    fn at(source: &str, failure: Failure<'_>) -> SyntaxError {
        let offset = source.len() - failure.rest.len();
        SyntaxError {
            position: source[..offset].chars().count(),
            found: failure.rest.chars().next(),
            expected: failure.expected,
        }
    }
}

/// Error threaded through the combinators; `rest` is the unparsed input at the
/// point of failure.
#[derive(Debug, Clone, Copy)]
struct Failure<'a> {
    rest: &'a str,
    expected: Expected,
}

impl<'a> ParseError<&'a str> for Failure<'a> {
    fn from_error_kind(rest: &'a str, _kind: ErrorKind) -> Self {
        Failure {
            rest,
            expected: Expected::Term,
        }
    }

    fn append(_rest: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

type PResult<'a, O> = IResult<&'a str, O, Failure<'a>>;

/// Relabels a recoverable error of `parser` with the token class we expected.
/// Failures raised under `cut` already carry the precise reason and pass
/// through untouched.
fn expect<'a, O, F>(expected: Expected, mut parser: F) -> impl FnMut(&'a str) -> PResult<'a, O>
where
    F: Parser<&'a str, O, Failure<'a>>,
{
    move |input: &'a str| {
        parser.parse(input).map_err(|err| match err {
            nom::Err::Error(_) => nom::Err::Error(Failure {
                rest: input,
                expected,
            }),
            other => other,
        })
    }
}

fn literal(input: &str) -> PResult<'_, Regex> {
    let (input, c) = satisfy(|c| c.is_ascii_lowercase())(input)?;
    Ok((input, Regex::Literal(c)))
}

fn group_body(input: &str, depth: usize) -> PResult<'_, Regex> {
    let (input, first) = regex(input, depth)?;
    let (input, second) = opt(preceded(char('|'), cut(|i| regex(i, depth))))(input)?;
    let (input, _) = expect(Expected::CloseParen, char(')'))(input)?;
    let inner = match second {
        Some(second) => Regex::union(first, second),
        None => first,
    };
    let (input, suffix) = opt(one_of("*+?"))(input)?;
    let group = match suffix {
        Some('*') => Regex::star(inner),
        Some('+') => Regex::plus(inner),
        Some(_) => Regex::optional(inner),
        None => inner,
    };
    Ok((input, group))
}

/// `depth` counts the groups already open around `input`.
fn group(input: &str, depth: usize) -> PResult<'_, Regex> {
    let (rest, _) = char('(')(input)?;
    if depth >= MAX_DEPTH {
        return Err(nom::Err::Failure(Failure {
            rest: input,
            expected: Expected::Letter,
        }));
    }
    cut(|i| group_body(i, depth + 1))(rest)
}

fn term(input: &str, depth: usize) -> PResult<'_, Regex> {
    expect(Expected::Term, alt((literal, |i| group(i, depth))))(input)
}

fn regex(input: &str, depth: usize) -> PResult<'_, Regex> {
    let (input, first) = term(input, depth)?;
    let (input, rest) = many0(|i| term(i, depth))(input)?;
    Ok((input, rest.into_iter().fold(first, Regex::concat)))
}

fn puzzle_regex(input: &str) -> PResult<'_, Regex> {
    let (input, regex) = regex(input, 0)?;
    let (input, _) = expect(Expected::TermOrEnd, eof)(input)?;
    Ok((input, regex))
}

/// Parses one regex; the whole of `text` must be consumed.
pub fn parse(text: &str) -> Result<Regex, SyntaxError> {
    match puzzle_regex(text) {
        Ok((_, regex)) => Ok(regex),
        Err(nom::Err::Error(failure)) | Err(nom::Err::Failure(failure)) => {
            Err(SyntaxError::at(text, failure))
        }
        // complete parsers never ask for more input
        Err(nom::Err::Incomplete(_)) => Err(SyntaxError {
            position: text.chars().count(),
            found: None,
            expected: Expected::Term,
        }),
    }
}

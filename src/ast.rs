use std::fmt::{self, Display, Formatter};

use crate::parser::{self, SyntaxError};

/// Abstract syntax of a puzzle regex.
///
/// `r+` and `r?` have no variant of their own: the parser lowers them to
/// `Concat(r, Star(r))` and `Union(Empty, r)`.
///
/// Concatenation chains are left-nested and as long as the input, so every
/// traversal walks them with [`Regex::split_concat`] instead of recursing;
/// recursion depth stays bounded by group nesting.
#[derive(Debug, PartialEq, Eq)]
pub enum Regex {
    /// Matches only the empty string.
    Empty,
    Literal(char),
    Concat(Box<Regex>, Box<Regex>),
    Union(Box<Regex>, Box<Regex>),
    /// Zero or more repetitions.
    Star(Box<Regex>),
}

impl Regex {
    pub fn parse(text: &str) -> Result<Regex, SyntaxError> {
        parser::parse(text)
    }

    pub fn concat(left: Regex, right: Regex) -> Regex {
        Regex::Concat(Box::new(left), Box::new(right))
    }

    pub fn union(left: Regex, right: Regex) -> Regex {
        Regex::Union(Box::new(left), Box::new(right))
    }

    pub fn star(inner: Regex) -> Regex {
        Regex::Star(Box::new(inner))
    }

    pub fn plus(inner: Regex) -> Regex {
        Regex::concat(inner.clone(), Regex::star(inner))
    }

    pub fn optional(inner: Regex) -> Regex {
        Regex::union(Regex::Empty, inner)
    }

    /// Splits the left-nested `Concat` chain rooted here into its leftmost
    /// operand, which is never a `Concat`, and the right operands in order.
    pub fn split_concat(&self) -> (&Regex, Vec<&Regex>) {
        let mut rest = vec![];
        let mut head = self;
        while let Regex::Concat(left, right) = head {
            rest.push(right.as_ref());
            head = left;
        }
        rest.reverse();
        (head, rest)
    }

    /// Whether the empty string belongs to the language.
    pub fn is_nullable(&self) -> bool {
        match self {
            Regex::Empty => true,
            Regex::Literal(_) => false,
            Regex::Concat(..) => {
                let (head, rest) = self.split_concat();
                head.is_nullable() && rest.iter().all(|r| r.is_nullable())
            }
            Regex::Union(l, r) => l.is_nullable() || r.is_nullable(),
            Regex::Star(_) => true,
        }
    }

    /// Moves compound children out into `into`, leaving `Empty` behind.
    fn detach_children(&mut self, into: &mut Vec<Regex>) {
        let mut detach = |child: &mut Box<Regex>| {
            if matches!(**child, Regex::Concat(..) | Regex::Union(..) | Regex::Star(_)) {
                into.push(std::mem::replace(&mut **child, Regex::Empty));
            }
        };
        match self {
            Regex::Concat(l, r) | Regex::Union(l, r) => {
                detach(l);
                detach(r);
            }
            Regex::Star(inner) => detach(inner),
            Regex::Empty | Regex::Literal(_) => {}
        }
    }
}

impl Clone for Regex {
    fn clone(&self) -> Regex {
        match self {
            Regex::Empty => Regex::Empty,
            Regex::Literal(c) => Regex::Literal(*c),
            Regex::Concat(..) => {
                let (head, rest) = self.split_concat();
                rest.into_iter()
                    .fold(head.clone(), |acc, r| Regex::concat(acc, r.clone()))
            }
            Regex::Union(l, r) => Regex::Union(l.clone(), r.clone()),
            Regex::Star(inner) => Regex::Star(inner.clone()),
        }
    }
}

impl Drop for Regex {
    fn drop(&mut self) {
        let mut pending = vec![];
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

// Output is accepted by `Regex::parse` for every tree the parser can produce.
// `Empty` only ever appears as the left branch of a lowered `?`, which is
// printed back as the suffix.
impl Display for Regex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Regex::Empty => Ok(()),
            Regex::Literal(c) => write!(f, "{c}"),
            Regex::Concat(..) => {
                let (head, rest) = self.split_concat();
                write!(f, "{head}")?;
                for r in rest {
                    match r {
                        Regex::Concat(..) => write!(f, "({r})")?,
                        _ => write!(f, "{r}")?,
                    }
                }
                Ok(())
            }
            Regex::Union(l, r) => match l.as_ref() {
                Regex::Empty => write!(f, "({r})?"),
                _ => write!(f, "({l}|{r})"),
            },
            Regex::Star(inner) => write!(f, "({inner})*"),
        }
    }
}

#[test]
fn test_display_reparses() {
    for text in ["abc", "(a|b)*c", "(ab)+", "(a(b|c))?d", "((a)*|b)", "c(ab)+d"] {
        let regex = Regex::parse(text).unwrap();
        let printed = regex.to_string();
        assert_eq!(Regex::parse(&printed).unwrap(), regex, "{text} -> {printed}");
    }
}

#[test]
fn test_nullable() {
    assert!(Regex::parse("(a)*").unwrap().is_nullable());
    assert!(Regex::parse("(a)?").unwrap().is_nullable());
    assert!(!Regex::parse("(a)+").unwrap().is_nullable());
    assert!(!Regex::parse("(a)*b").unwrap().is_nullable());
    assert!(Regex::parse("((a)*|b)").unwrap().is_nullable());
    assert!(Regex::parse("(a)?(b)*(c)?").unwrap().is_nullable());
}

#[test]
fn test_split_concat() {
    let regex = Regex::parse("a(bc)d").unwrap();
    let (head, rest) = regex.split_concat();
    assert_eq!(head, &Regex::Literal('a'));
    assert_eq!(rest.len(), 2);
    assert!(matches!(rest[0], Regex::Concat(..)));
    assert_eq!(rest[1], &Regex::Literal('d'));

    let single = Regex::Literal('x');
    assert_eq!(single.split_concat(), (&single, vec![]));
}

#[test]
fn test_long_concat_is_walked_iteratively() {
    let text = "ab".repeat(100_000);
    let regex = Regex::parse(&text).unwrap();
    assert!(!regex.is_nullable());
    let copy = regex.clone();
    assert_eq!(copy.to_string(), text);
    drop(copy);
    drop(regex);
}

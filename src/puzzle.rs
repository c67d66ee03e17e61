use std::path::Path;

use thiserror::Error;

use crate::ast::Regex;
use crate::dfa::Dfa;
use crate::matcher::find_common_string;
use crate::nfa::Nfa;
use crate::parser::SyntaxError;

#[derive(Error, Debug)]
pub enum PuzzleError {
    #[error("line {line}: {source}")]
    Syntax {
        /// 1-based line of the puzzle source.
        line: usize,
        source: SyntaxError,
    },
    #[error("cannot read puzzle: {0}")]
    Io(#[from] std::io::Error),
}

/// One regex taken through every stage of the pipeline.
#[derive(Debug, Clone)]
pub struct CompiledRegex {
    pub source: String,
    pub regex: Regex,
    pub nfa: Nfa,
    pub dfa: Dfa,
}

pub fn compile(text: &str) -> Result<CompiledRegex, SyntaxError> {
    let regex = Regex::parse(text)?;
    let nfa = Nfa::from_regex(&regex);
    let dfa = Dfa::from_nfa(&nfa);
    Ok(CompiledRegex {
        source: text.to_string(),
        regex,
        nfa,
        dfa,
    })
}

/// A set of regexes that must all match the same string. The stages of the
/// n-th regex sit at index n of each vector.
#[derive(Debug, Clone, Default)]
pub struct Puzzle {
    pub sources: Vec<String>,
    pub regexes: Vec<Regex>,
    pub nfas: Vec<Nfa>,
    /// Contiguous so the matcher borrows them as one slice.
    pub dfas: Vec<Dfa>,
}

impl Puzzle {
    /// One regex per line; surrounding whitespace and blank lines are ignored.
    pub fn parse(source: &str) -> Result<Puzzle, PuzzleError> {
        let mut puzzle = Puzzle::default();
        for (idx, line) in source.lines().enumerate() {
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            let compiled =
                compile(text).map_err(|source| PuzzleError::Syntax { line: idx + 1, source })?;
            log::info!(
                "line {}: {} -> {} nfa / {} dfa states{}",
                idx + 1,
                compiled.regex,
                compiled.nfa.len(),
                compiled.dfa.len(),
                if compiled.regex.is_nullable() { ", nullable" } else { "" }
            );
            puzzle.push(compiled);
        }
        Ok(puzzle)
    }

    fn push(&mut self, compiled: CompiledRegex) {
        let CompiledRegex {
            source,
            regex,
            nfa,
            dfa,
        } = compiled;
        self.sources.push(source);
        self.regexes.push(regex);
        self.nfas.push(nfa);
        self.dfas.push(dfa);
    }

    pub fn len(&self) -> usize {
        self.dfas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dfas.is_empty()
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Puzzle, PuzzleError> {
        let source = std::fs::read_to_string(path)?;
        Puzzle::parse(&source)
    }

    pub fn solve(&self) -> Option<String> {
        find_common_string(&self.dfas)
    }
}

/// Parses and solves a newline-separated puzzle in one go.
pub fn solve(source: &str) -> Result<Option<String>, PuzzleError> {
    Ok(Puzzle::parse(source)?.solve())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Expected;

    #[test]
    fn test_compile_stages() {
        let compiled = compile("(a|b)*c").unwrap();
        assert_eq!(compiled.source, "(a|b)*c");
        assert!(compiled.nfa.accepts("aabc"));
        assert!(compiled.dfa.accepts("aabc"));
        assert!(!compiled.dfa.accepts("aab"));
    }

    #[test]
    fn test_solve_lines() {
        let source = "(a|b)(a|b)*\n\n  (b|c)+  \n((a)?b)*\n";
        assert_eq!(solve(source).unwrap(), Some("b".to_string()));
        assert_eq!(solve("a\nb\n").unwrap(), None);
    }

    #[test]
    fn test_reports_failing_line() {
        match solve("ab\n\n(ab\n") {
            Err(PuzzleError::Syntax { line, source }) => {
                assert_eq!(line, 3);
                assert_eq!(source.position, 3);
                assert_eq!(source.expected, Expected::CloseParen);
            }
            other => panic!("unexpected result {other:?}"),
        }
        let err = solve("(ab").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 1: unexpected end of input at position 3, expected `)`"
        );
    }

    #[test]
    fn test_missing_file() {
        let err = Puzzle::from_file("does/not/exist/regexes.txt").unwrap_err();
        assert!(matches!(err, PuzzleError::Io(_)));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("regex-puzzle-{}.txt", std::process::id()));
        std::fs::write(&path, "(ab)+\n(a|b)*b\n(a)?(b)?(ab)*\n").unwrap();
        let puzzle = Puzzle::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(puzzle.len(), 3);
        assert_eq!(puzzle.sources[1], "(a|b)*b");
        assert!(puzzle.regexes[2].is_nullable());
        assert!(puzzle.nfas[0].accepts("abab"));
        assert_eq!(puzzle.solve(), Some("ab".to_string()));
    }

    #[test]
    fn test_long_regexes_compile() {
        let text = "a".repeat(100_000);
        let compiled = compile(&text).unwrap();
        assert_eq!(compiled.dfa.len(), 100_001);
        assert!(compiled.dfa.accepts(&text));
        assert!(!compiled.dfa.accepts(&text[1..]));

        let repeated = format!("({})+", "ab".repeat(20_000));
        let compiled = compile(&repeated).unwrap();
        assert!(compiled.dfa.accepts(&"ab".repeat(40_000)));
        assert!(!compiled.dfa.accepts(&"ab".repeat(30_000)));
    }

    #[test]
    fn test_long_puzzle() {
        let source = format!("{}\n(a)*\n", "a".repeat(20_000));
        assert_eq!(solve(&source).unwrap(), Some("a".repeat(20_000)));
    }
}

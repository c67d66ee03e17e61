pub mod ast;
pub mod dfa;
pub mod dot;
pub mod matcher;
pub mod nfa;
pub mod parser;
pub mod puzzle;

#[cfg(test)]
mod test_utils;

pub use ast::Regex;
pub use dfa::Dfa;
pub use matcher::find_common_string;
pub use nfa::Nfa;
pub use parser::SyntaxError;

use wasm_bindgen::prelude::*;

/// Solves a newline-separated puzzle. Resolves to `undefined` when no string
/// satisfies every regex and throws on a syntax error.
#[wasm_bindgen]
pub fn solve_puzzle(source: &str) -> Result<Option<String>, JsError> {
    solve_to_message(source).map_err(|message| JsError::new(&message))
}

/// `JsError` can only be built on a wasm target, so the error crosses the
/// boundary as its message.
fn solve_to_message(source: &str) -> Result<Option<String>, String> {
    puzzle::solve(source).map_err(|e| e.to_string())
}

#[test]
fn test_solve_to_message() {
    assert_eq!(solve_to_message("(a|b)\n(a|c)\n"), Ok(Some("a".to_string())));
    assert_eq!(solve_to_message("a\nb"), Ok(None));
    assert_eq!(
        solve_to_message("a\n(a|b|c)"),
        Err("line 2: unexpected `|` at position 4, expected `)`".to_string())
    );
}

//! Helpers shared by the brute-force tests.

use rand::{rngs::StdRng, Rng};

use crate::ast::Regex;

/// Random tree over `a`, `b` and `c`. `Empty` only shows up through `?`, the
/// same way the parser produces it.
pub fn random_regex(rng: &mut StdRng, depth: u32) -> Regex {
    if depth == 0 || rng.gen_bool(0.25) {
        return Regex::Literal(['a', 'b', 'c'][rng.gen_range(0..3)]);
    }
    match rng.gen_range(0..5) {
        0 => Regex::concat(random_regex(rng, depth - 1), random_regex(rng, depth - 1)),
        1 => Regex::union(random_regex(rng, depth - 1), random_regex(rng, depth - 1)),
        2 => Regex::star(random_regex(rng, depth - 1)),
        3 => Regex::plus(random_regex(rng, depth - 1)),
        _ => Regex::optional(random_regex(rng, depth - 1)),
    }
}

/// The same language, compiled by the `regex` crate and anchored at both ends.
pub fn oracle(regex: &Regex) -> ::regex::Regex {
    ::regex::Regex::new(&format!("^(?:{regex})$")).unwrap()
}

fn strings_of_len(alphabet: &[char], len: usize) -> Vec<String> {
    if len == 0 {
        return vec!["".to_string()];
    }
    let mut ret = vec![];
    for s in strings_of_len(alphabet, len - 1) {
        for &c in alphabet {
            ret.push(format!("{s}{c}"));
        }
    }
    ret
}

/// Every string up to `max_len`, shortest first and lexicographic within a
/// length when `alphabet` is sorted.
pub fn strings_up_to(alphabet: &[char], max_len: usize) -> Vec<String> {
    (0..=max_len)
        .flat_map(|len| strings_of_len(alphabet, len))
        .collect()
}

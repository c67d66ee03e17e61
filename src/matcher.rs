use std::collections::{HashSet, VecDeque};

use crate::dfa::Dfa;
use crate::nfa::StateId;

/// One state per automaton, in input order.
type ProductState = Vec<StateId>;

/// Shortest string accepted by every automaton in `dfas`, or `None` when the
/// product automaton has no reachable accepting state.
///
/// Characters are tried in ascending order, so among several shortest
/// answers the lexicographically smallest one is returned. An empty slice is
/// satisfied by the empty string.
pub fn find_common_string(dfas: &[Dfa]) -> Option<String> {
    let start: ProductState = dfas.iter().map(Dfa::start).collect();

    let mut queue: VecDeque<(ProductState, String)> = VecDeque::new();
    let mut inserted: HashSet<ProductState> = HashSet::new();
    inserted.insert(start.clone());
    queue.push_back((start, String::new()));

    while let Some((current, word)) = queue.pop_front() {
        if dfas
            .iter()
            .zip(&current)
            .all(|(dfa, &state)| dfa.state(state).accepting)
        {
            log::debug!(
                "common string of length {} after {} product states",
                word.chars().count(),
                inserted.len()
            );
            return Some(word);
        }

        for c in offered_characters(dfas, &current) {
            let next = dfas
                .iter()
                .zip(&current)
                .map(|(dfa, &state)| dfa.step(state, c))
                .collect::<Option<ProductState>>();
            let Some(next) = next else {
                continue;
            };
            if inserted.insert(next.clone()) {
                let mut next_word = word.clone();
                next_word.push(c);
                queue.push_back((next, next_word));
            }
        }
    }

    log::debug!("no common string, {} product states exhausted", inserted.len());
    None
}

/// Characters every automaton can consume from its current state. Anything
/// outside this set leads at least one automaton to rejection.
fn offered_characters(dfas: &[Dfa], current: &[StateId]) -> Vec<char> {
    let mut components = dfas.iter().zip(current);
    let Some((first, &first_state)) = components.next() else {
        return vec![];
    };
    let rest: Vec<_> = components.collect();
    first
        .state(first_state)
        .transitions
        .keys()
        .copied()
        .filter(|c| {
            rest.iter()
                .all(|&(dfa, &state)| dfa.state(state).transitions.contains_key(c))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Regex;
    use crate::nfa::Nfa;
    use crate::test_utils::{oracle, random_regex, strings_up_to};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn compile(text: &str) -> Dfa {
        Dfa::from_nfa(&Nfa::from_regex(&Regex::parse(text).unwrap()))
    }

    fn solve(texts: &[&str]) -> Option<String> {
        let dfas: Vec<Dfa> = texts.iter().map(|t| compile(t)).collect();
        find_common_string(&dfas)
    }

    #[test]
    fn test_shortest_common_character() {
        assert_eq!(solve(&["(a|b)", "(a|c)"]), Some("a".to_string()));
    }

    #[test]
    fn test_disjoint_literals() {
        assert_eq!(solve(&["a", "b"]), None);
    }

    #[test]
    fn test_unsatisfiable_with_cycles_terminates() {
        assert_eq!(solve(&["(a)*b", "(a)*c"]), None);
        assert_eq!(solve(&["(ab)*", "(ab)*a", "(a|b)*"]), None);
        assert_eq!(solve(&["((a)+b)+", "(ba)+"]), None);
    }

    #[test]
    fn test_prefers_shortest() {
        assert_eq!(solve(&["(a)*", "(b)*"]), Some(String::new()));
        assert_eq!(solve(&["(a)*aaa", "(aa)+"]), Some("aaaa".to_string()));
        assert_eq!(solve(&["(a|b)*b(a|b)", "(a|b)(a|b)*"]), Some("ba".to_string()));
    }

    #[test]
    fn test_lexicographic_tie_break() {
        assert_eq!(solve(&["(a|b)(a|b)", "(b|a)(b|a)"]), Some("aa".to_string()));
    }

    #[test]
    fn test_single_and_empty_collections() {
        assert_eq!(solve(&["(ab)+c"]), Some("abc".to_string()));
        assert_eq!(find_common_string(&[]), Some(String::new()));
    }

    #[test]
    fn test_agrees_with_brute_force() {
        let mut rng = StdRng::seed_from_u64(1234);
        let candidates = strings_up_to(&['a', 'b', 'c'], 6);
        for _ in 0..200 {
            let count = rng.gen_range(2..=3);
            let regexes: Vec<Regex> = (0..count).map(|_| random_regex(&mut rng, 3)).collect();
            let references: Vec<_> = regexes.iter().map(oracle).collect();
            let dfas: Vec<Dfa> = regexes
                .iter()
                .map(|r| Dfa::from_nfa(&Nfa::from_regex(r)))
                .collect();

            let brute_force = candidates
                .iter()
                .find(|s| references.iter().all(|r| r.is_match(s)));
            let found = find_common_string(&dfas);

            match (brute_force, &found) {
                (Some(expected), _) => assert_eq!(found.as_ref(), Some(expected), "{regexes:?}"),
                (None, Some(s)) => {
                    assert!(s.len() > 6, "{regexes:?} -> {s}");
                    assert!(references.iter().all(|r| r.is_match(s)));
                }
                (None, None) => {}
            }
        }
    }
}

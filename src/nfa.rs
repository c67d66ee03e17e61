use std::collections::{BTreeSet, VecDeque};

use crate::ast::Regex;

/// Index of a state inside its automaton's arena.
pub type StateId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfaState {
    pub accepting: bool,
    /// At most one labeled edge leaves a state.
    pub transition: Option<(char, StateId)>,
    pub empty_transitions: Vec<StateId>,
}

/// Thompson automaton. States are owned by the arena and refer to each other
/// by index, so the back edges introduced by `Star` are plain indices.
#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<NfaState>,
    start: StateId,
}

impl Nfa {
    pub fn from_regex(regex: &Regex) -> Nfa {
        let mut builder = NfaBuilder { states: vec![] };
        let (start, accept) = builder.build(regex);
        log::debug!(
            "nfa for {regex}: {} states, {} accepting",
            builder.states.len(),
            accept.len()
        );
        Nfa {
            states: builder.states,
            start,
        }
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn state(&self, id: StateId) -> &NfaState {
        &self.states[id]
    }

    pub fn states(&self) -> &[NfaState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// States reachable from `frontier` through empty transitions only,
    /// sorted by identity.
    pub fn epsilon_closure(&self, frontier: impl IntoIterator<Item = StateId>) -> Vec<StateId> {
        let mut visited: BTreeSet<StateId> = BTreeSet::new();
        let mut queue: VecDeque<StateId> = frontier.into_iter().collect();
        while let Some(state) = queue.pop_front() {
            if !visited.insert(state) {
                continue;
            }
            queue.extend(self.states[state].empty_transitions.iter().copied());
        }
        visited.into_iter().collect()
    }

    pub fn accepts(&self, input: &str) -> bool {
        let mut current = self.epsilon_closure([self.start]);
        for c in input.chars() {
            let targets = current
                .iter()
                .filter_map(|&state| match self.states[state].transition {
                    Some((label, to)) if label == c => Some(to),
                    _ => None,
                })
                .collect::<Vec<_>>();
            if targets.is_empty() {
                return false;
            }
            current = self.epsilon_closure(targets);
        }
        current.iter().any(|&state| self.states[state].accepting)
    }
}

/// Allocates states in construction order; the arena length doubles as the
/// identity counter for one build.
struct NfaBuilder {
    states: Vec<NfaState>,
}

impl NfaBuilder {
    fn new_state(&mut self, accepting: bool) -> StateId {
        self.states.push(NfaState {
            accepting,
            transition: None,
            empty_transitions: vec![],
        });
        self.states.len() - 1
    }

    /// Wires every current accepting state into `target` and demotes it.
    fn redirect(&mut self, accept: &[StateId], target: StateId) {
        for &state in accept {
            let state = &mut self.states[state];
            state.accepting = false;
            state.empty_transitions.push(target);
        }
    }

    /// Returns the start state and the accepting states of the fragment.
    /// Concatenation chains are built in a loop, so only group nesting
    /// deepens the recursion.
    fn build(&mut self, regex: &Regex) -> (StateId, Vec<StateId>) {
        let (head, rest) = regex.split_concat();
        let (start, mut accept) = self.build_operand(head);
        for operand in rest {
            let (next_start, next_accept) = self.build_operand(operand);
            self.redirect(&accept, next_start);
            accept = next_accept;
        }
        (start, accept)
    }

    fn build_operand(&mut self, regex: &Regex) -> (StateId, Vec<StateId>) {
        match regex {
            Regex::Empty => {
                let state = self.new_state(true);
                (state, vec![state])
            }
            Regex::Literal(c) => {
                let accept = self.new_state(true);
                let start = self.new_state(false);
                self.states[start].transition = Some((*c, accept));
                (start, vec![accept])
            }
            Regex::Concat(..) => self.build(regex),
            Regex::Union(left, right) => {
                let (left_start, mut accept) = self.build(left);
                let (right_start, right_accept) = self.build(right);
                let start = self.new_state(false);
                self.states[start].empty_transitions = vec![left_start, right_start];
                accept.extend(right_accept);
                (start, accept)
            }
            Regex::Star(inner) => {
                let (inner_start, inner_accept) = self.build(inner);
                let state = self.new_state(true);
                self.states[state].empty_transitions.push(inner_start);
                self.redirect(&inner_accept, state);
                (state, vec![state])
            }
        }
    }
}

#[test]
fn test_from_regex() {
    let regex = Regex::parse("a(b|c)*d").unwrap();
    let nfa = Nfa::from_regex(&regex);
    assert!(nfa.accepts("ad"));
    assert!(nfa.accepts("abd"));
    assert!(nfa.accepts("acd"));
    assert!(nfa.accepts("abbd"));
    assert!(nfa.accepts("accd"));
    assert!(nfa.accepts("abcd"));
    assert!(nfa.accepts("acbd"));
    assert!(nfa.accepts("abbcd"));
    assert!(nfa.accepts("accbd"));
    assert!(!nfa.accepts("abbdbd"));
    assert!(!nfa.accepts("a"));
    assert!(!nfa.accepts(""));
}

use std::collections::{BTreeMap, HashMap, VecDeque};

use itertools::Itertools;

use crate::nfa::{Nfa, StateId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaState {
    pub accepting: bool,
    /// Ordered by character, one successor per character.
    pub transitions: BTreeMap<char, StateId>,
    /// Sorted identities of the NFA states in this state's epsilon-closure.
    pub nfa_states: Vec<StateId>,
}

#[derive(Debug, Clone)]
pub struct Dfa {
    states: Vec<DfaState>,
    start: StateId,
}

impl Dfa {
    /// Subset construction. Always terminates: every closure is materialized
    /// at most once, so the cycles `Star` puts into the NFA resolve to states
    /// that already exist.
    pub fn from_nfa(nfa: &Nfa) -> Dfa {
        let mut construction = SubsetConstruction {
            nfa,
            cache: HashMap::new(),
            states: vec![],
            pending: VecDeque::new(),
        };
        let start = construction.materialize([nfa.start()]);
        while let Some(state) = construction.pending.pop_front() {
            construction.expand(state);
        }
        log::debug!(
            "subset construction: {} nfa states -> {} dfa states",
            nfa.len(),
            construction.states.len()
        );
        Dfa {
            states: construction.states,
            start,
        }
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn state(&self, id: StateId) -> &DfaState {
        &self.states[id]
    }

    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn step(&self, state: StateId, c: char) -> Option<StateId> {
        self.states[state].transitions.get(&c).copied()
    }

    pub fn accepts(&self, input: &str) -> bool {
        let mut state = self.start;
        for c in input.chars() {
            match self.step(state, c) {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.states[state].accepting
    }
}

struct SubsetConstruction<'a> {
    nfa: &'a Nfa,
    /// Closure identity -> materialized state. Lives for one build only.
    cache: HashMap<Vec<StateId>, StateId>,
    states: Vec<DfaState>,
    /// Registered states whose transitions are not computed yet.
    pending: VecDeque<StateId>,
}

impl SubsetConstruction<'_> {
    /// Returns the state standing for the closure of `frontier`, creating and
    /// registering it before any of its successors are looked at.
    fn materialize(&mut self, frontier: impl IntoIterator<Item = StateId>) -> StateId {
        let closure = self.nfa.epsilon_closure(frontier);
        if let Some(&state) = self.cache.get(&closure) {
            return state;
        }

        let id = self.states.len();
        self.states.push(DfaState {
            accepting: closure.iter().any(|&s| self.nfa.state(s).accepting),
            transitions: BTreeMap::new(),
            nfa_states: closure.clone(),
        });
        self.cache.insert(closure, id);
        self.pending.push_back(id);
        log::trace!("dfa state {id} = {:?}", self.states[id].nfa_states);
        id
    }

    fn expand(&mut self, id: StateId) {
        let targets_by_label = self.states[id]
            .nfa_states
            .iter()
            .filter_map(|&s| self.nfa.state(s).transition)
            .into_group_map();

        for (label, targets) in targets_by_label.into_iter().sorted_by_key(|(label, _)| *label) {
            let next = self.materialize(targets);
            self.states[id].transitions.insert(label, next);
        }
    }
}

use std::fmt::Display;

use crate::{automaton::GIndex, incremental::acceptance::Acceptance};

/// Identifies a state inside the arena of a DAG builder. Identifiers of
/// released states are reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl GIndex for StateId {
    fn new(index: usize) -> Self {
        StateId(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// The structural identity of a state: its acceptance plus one optional
/// successor per alphabet index. Two states with equal signatures accept the
/// same residual language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateSignature {
    successors: Vec<Option<StateId>>,
    acceptance: Acceptance,
}

impl StateSignature {
    pub fn new(alphabet_size: usize, acceptance: Acceptance) -> Self {
        StateSignature {
            successors: vec![None; alphabet_size],
            acceptance,
        }
    }

    pub fn with_successor(mut self, index: usize, successor: StateId) -> Self {
        self.successors[index] = Some(successor);
        self
    }

    pub fn acceptance(&self) -> Acceptance {
        self.acceptance
    }

    pub fn successor(&self, index: usize) -> Option<StateId> {
        self.successors[index]
    }

    /// Iterates over all defined successors. A state referenced through several
    /// symbols is yielded once per symbol.
    pub fn successors(&self) -> impl Iterator<Item = StateId> + '_ {
        self.successors.iter().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.successors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    pub(crate) fn set_acceptance(&mut self, acceptance: Acceptance) {
        self.acceptance = acceptance;
    }

    /// Replaces the successor at `index`, returning the previous one.
    pub(crate) fn set_successor(
        &mut self,
        index: usize,
        successor: Option<StateId>,
    ) -> Option<StateId> {
        std::mem::replace(&mut self.successors[index], successor)
    }

    pub(crate) fn clear_successors(&mut self) -> Vec<StateId> {
        self.successors
            .iter_mut()
            .filter_map(|successor| successor.take())
            .collect()
    }

    pub(crate) fn grow(&mut self, alphabet_size: usize) {
        self.successors.resize(alphabet_size, None);
    }
}

/// A state of the DAG: its signature and the number of `(state, symbol)` pairs
/// pointing at it.
#[derive(Debug, Clone)]
pub struct State {
    pub(super) signature: StateSignature,
    pub(super) incoming: u32,
}

impl State {
    pub fn new(signature: StateSignature) -> Self {
        State {
            signature,
            incoming: 0,
        }
    }

    pub fn signature(&self) -> &StateSignature {
        &self.signature
    }

    pub fn incoming(&self) -> u32 {
        self.incoming
    }

    /// A state is confluent if more than one transition points at it.
    pub fn is_confluent(&self) -> bool {
        self.incoming > 1
    }
}

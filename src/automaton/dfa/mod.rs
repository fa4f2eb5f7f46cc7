use std::fmt::Debug;

use itertools::Itertools;
use node::DfaNode;
use petgraph::{
    Direction,
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
};

use crate::automaton::{
    Alphabet, Automaton, AutomatonNode, InitializedAutomaton, Language, Letter, TransitionSystem,
};

pub mod node;

/// A partial deterministic automaton stored as a petgraph [DiGraph].
///
/// Missing transitions are allowed, reading a symbol without an outgoing edge
/// leaves the automaton undefined for the rest of the word.
#[derive(Clone)]
pub struct Dfa<N: AutomatonNode, E: Letter> {
    start: Option<NodeIndex<u32>>,
    pub graph: DiGraph<DfaNode<N>, E>,
    alphabet: Vec<E>,
}

impl<N: AutomatonNode, E: Letter> Dfa<N, E> {
    pub fn new(alphabet: Vec<E>) -> Self {
        Dfa {
            alphabet,
            start: None,
            graph: DiGraph::new(),
        }
    }

    pub fn set_initial(&mut self, start: NodeIndex<u32>) {
        self.start = Some(start);
    }

    pub fn state_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn add_node(&mut self, data: DfaNode<N>) -> NodeIndex<u32> {
        self.graph.add_node(data)
    }

    pub fn set_accepting(&mut self, node: NodeIndex<u32>, accepting: bool) {
        self.graph[node].accepting = accepting;
    }

    /// Adds the transition `from -label-> to`. Adding an identical transition
    /// twice returns the existing edge.
    ///
    /// Panics if `label` is not part of the alphabet or if `from` already has a
    /// different target for `label`.
    pub fn add_edge(
        &mut self,
        from: NodeIndex<u32>,
        to: NodeIndex<u32>,
        label: E,
    ) -> EdgeIndex<u32> {
        assert!(
            self.alphabet.contains(&label),
            "Symbol {:?} not in alphabet",
            label
        );

        let existing_edge = self
            .graph
            .edges_directed(from, Direction::Outgoing)
            .find(|edge| *edge.weight() == label);
        if let Some(edge) = existing_edge {
            let target = edge.target();
            if target != to {
                panic!(
                    "Transition conflict, adding the new transition causes this automaton to no longer be a DFA. Existing: {:?} -{:?}-> {:?}. New: {:?} -{:?}-> {:?}",
                    from, label, target, from, label, to
                );
            }
            return edge.id();
        }

        self.graph.add_edge(from, to, label)
    }
}

impl<N: AutomatonNode, E: Letter> Alphabet for Dfa<N, E> {
    type Letter = E;

    fn alphabet(&self) -> &[Self::Letter] {
        &self.alphabet
    }
}

impl<N: AutomatonNode, E: Letter> Automaton for Dfa<N, E> {
    type NIndex = NodeIndex<u32>;

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}

impl<N: AutomatonNode, E: Letter> TransitionSystem for Dfa<N, E> {
    fn successor(&self, node: Self::NIndex, letter: &Self::Letter) -> Option<Self::NIndex> {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .find(|edge| edge.weight() == letter)
            .map(|edge| edge.target())
    }
}

impl<N: AutomatonNode, E: Letter> InitializedAutomaton for Dfa<N, E> {
    fn get_initial(&self) -> Option<Self::NIndex> {
        self.start
    }

    fn is_accepting(&self, node: Self::NIndex) -> bool {
        self.graph[node].accepting
    }
}

impl<N: AutomatonNode, E: Letter> Language for Dfa<N, E> {
    fn accepts<'a>(&self, input: impl IntoIterator<Item = &'a Self::Letter>) -> bool
    where
        Self::Letter: 'a,
    {
        let mut current_state = self.start;
        for symbol in input {
            match current_state {
                Some(state) => current_state = self.successor(state, symbol),
                None => return false,
            }
        }

        current_state.is_some_and(|state| self.is_accepting(state))
    }
}

impl<N: AutomatonNode, E: Letter> Debug for Dfa<N, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dfa")
            .field("alphabet", &self.alphabet)
            .field("state_count", &self.graph.node_count())
            .field(
                "states",
                &self
                    .graph
                    .node_indices()
                    .map(|node| (&self.graph[node].data, node))
                    .collect_vec(),
            )
            .field("initial_state", &self.start)
            .field(
                "final_states",
                &self
                    .graph
                    .node_indices()
                    .filter(|node| self.graph[*node].accepting)
                    .collect_vec(),
            )
            .field("edge_count", &self.graph.edge_count())
            .field(
                "edges",
                &self
                    .graph
                    .edge_references()
                    .map(|edge| {
                        format!(
                            "{:?} -{:?}-> {:?}",
                            edge.source(),
                            edge.weight(),
                            edge.target()
                        )
                    })
                    .collect_vec(),
            )
            .finish()
    }
}

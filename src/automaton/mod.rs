use std::{fmt::Debug, hash::Hash};

use petgraph::graph::NodeIndex;

pub mod alphabet;
pub mod dfa;
pub mod index_map;

/// This trait represents types that can be used as node data in an automaton.
pub trait AutomatonNode: Debug + Clone + PartialEq + Eq + Hash {}
impl<T> AutomatonNode for T where T: Debug + Clone + PartialEq + Eq + Hash {}

/// This trait represents types that can be used as input symbols.
pub trait Letter: Debug + Clone + PartialEq + Eq + Hash + Ord {}

impl<T: Debug + Clone + PartialEq + Eq + Hash + Ord> Letter for T {}

/// This trait represents node indices in an automaton.
/// The index space must be compact, so usually implementers of this trait are
/// just some wrapper type around some integer type. It must be possible to
/// construct an index from a [usize] and to turn an index into a [usize].
pub trait GIndex: Debug + Copy + Clone + PartialEq + Eq + Hash + Ord {
    /// Create a new index from a [usize].
    fn new(index: usize) -> Self;
    /// Turn this index into a [usize] to e.g. index into a [Vec].
    fn index(self) -> usize;
}

impl GIndex for NodeIndex {
    fn new(index: usize) -> Self {
        NodeIndex::new(index)
    }

    fn index(self) -> usize {
        NodeIndex::index(self)
    }
}

impl GIndex for usize {
    fn new(index: usize) -> Self {
        index
    }

    fn index(self) -> usize {
        self
    }
}

impl GIndex for u32 {
    fn new(index: usize) -> Self {
        index as u32
    }

    fn index(self) -> usize {
        self as usize
    }
}

pub trait Alphabet {
    type Letter: Letter;

    fn alphabet(&self) -> &[Self::Letter];
}

pub trait Automaton: Alphabet {
    /// The index type used to identify nodes.
    type NIndex: GIndex;

    /// Returns the number of nodes in the automaton.
    /// It should be valid to index nodes from 0 to node_count() - 1
    fn node_count(&self) -> usize;
}

pub trait TransitionSystem: Automaton {
    /// Returns the node reached from `node` by reading `letter`, or [None] if
    /// the transition is undefined.
    fn successor(&self, node: Self::NIndex, letter: &Self::Letter) -> Option<Self::NIndex>;
}

/// A transition system with a (possibly missing) initial node and a notion of
/// accepting nodes.
pub trait InitializedAutomaton: TransitionSystem {
    fn get_initial(&self) -> Option<Self::NIndex>;

    fn is_accepting(&self, node: Self::NIndex) -> bool;
}

pub trait Language: Alphabet {
    fn accepts<'a>(&self, input: impl IntoIterator<Item = &'a Self::Letter>) -> bool
    where
        Self::Letter: 'a;
}

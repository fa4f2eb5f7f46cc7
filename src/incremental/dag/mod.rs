use petgraph::graph::NodeIndex;

use crate::{
    automaton::{
        Alphabet, Letter,
        alphabet::IndexedAlphabet,
        dfa::{Dfa, node::DfaNode},
        index_map::IndexMap,
    },
    config::DagBuilderConfig,
    incremental::{DagBuilderError, acceptance::Acceptance},
    validation,
};

pub mod exact;
pub mod prefix_closed;
pub mod registry;
pub mod state;

pub use exact::IncrementalDfaDagBuilder;
pub use prefix_closed::IncrementalPcDfaDagBuilder;
use registry::{SignatureChange, StateRegistry};
use state::{StateId, StateSignature};

/// One step of a walk: the state that was left and the symbol index read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PathElem {
    pub state: StateId,
    pub symbol: usize,
}

/// Result of following a word from the root as far as transitions exist.
#[derive(Debug, Clone)]
pub(crate) struct Walk {
    pub path: Vec<PathElem>,
    /// The state reached after the last followed transition.
    pub last: StateId,
    /// Position of the first confluent state among the states a transition
    /// was attempted from. Position `path.len()` refers to `last`.
    pub confluence: Option<usize>,
}

/// State shared by both DAG builder variants: the alphabet, the arena with its
/// canonicalization table, the unregistered root and the lazily created sink.
#[derive(Debug, Clone)]
pub(crate) struct DagBuilderCore<L: Letter> {
    pub alphabet: IndexedAlphabet<L>,
    pub registry: StateRegistry,
    pub root: StateId,
    pub sink: Option<StateId>,
    pub config: DagBuilderConfig,
    pub prefix_closed: bool,
}

impl<L: Letter> DagBuilderCore<L> {
    pub fn new(alphabet: IndexedAlphabet<L>, config: DagBuilderConfig, prefix_closed: bool) -> Self {
        let mut registry = StateRegistry::with_capacity(*config.get_initial_capacity());
        let root = registry.allocate_unregistered(StateSignature::new(
            alphabet.len(),
            Acceptance::DontKnow,
        ));

        DagBuilderCore {
            alphabet,
            registry,
            root,
            sink: None,
            config,
            prefix_closed,
        }
    }

    pub fn symbol_index(&self, symbol: &L) -> Result<usize, DagBuilderError> {
        self.alphabet
            .index_of(symbol)
            .ok_or_else(|| DagBuilderError::UnknownSymbol {
                symbol: format!("{:?}", symbol),
            })
    }

    /// Resolves every symbol of `word` before anything is touched, so that an
    /// unknown symbol never leaves a half-applied mutation behind.
    pub fn symbol_indices(&self, word: &[L]) -> Result<Vec<usize>, DagBuilderError> {
        word.iter().map(|symbol| self.symbol_index(symbol)).collect()
    }

    pub fn is_sink(&self, state: StateId) -> bool {
        self.sink == Some(state)
    }

    /// The sink loops on every symbol.
    pub fn successor(&self, state: StateId, symbol: usize) -> Option<StateId> {
        if self.is_sink(state) {
            return Some(state);
        }

        self.registry.state(state).signature().successor(symbol)
    }

    pub fn acceptance(&self, state: StateId) -> Acceptance {
        if self.is_sink(state) {
            return Acceptance::False;
        }

        self.registry.state(state).signature().acceptance()
    }

    pub fn is_confluent(&self, state: StateId) -> bool {
        self.registry.state(state).is_confluent()
    }

    pub fn get_state(&self, symbols: &[usize]) -> Option<StateId> {
        symbols
            .iter()
            .try_fold(self.root, |state, symbol| self.successor(state, *symbol))
    }

    pub fn lookup(&self, word: &[L]) -> Result<Acceptance, DagBuilderError> {
        let symbols = self.symbol_indices(word)?;

        Ok(self
            .get_state(&symbols)
            .map_or(Acceptance::DontKnow, |state| self.acceptance(state)))
    }

    pub fn walk(&self, symbols: &[usize]) -> Walk {
        let mut path = Vec::with_capacity(symbols.len());
        let mut current = self.root;
        let mut confluence = None;

        for symbol in symbols.iter().copied() {
            if confluence.is_none() && self.is_confluent(current) {
                confluence = Some(path.len());
            }

            let Some(successor) = self.successor(current, symbol) else {
                break;
            };
            path.push(PathElem {
                state: current,
                symbol,
            });
            current = successor;
        }

        Walk {
            path,
            last: current,
            confluence,
        }
    }

    pub fn ensure_sink(&mut self) -> StateId {
        if let Some(sink) = self.sink {
            return sink;
        }

        let sink = self
            .registry
            .allocate_unregistered(StateSignature::new(self.alphabet.len(), Acceptance::False));
        tracing::trace!("created sink {}", sink);
        self.sink = Some(sink);
        sink
    }

    pub fn update_root(&mut self, change: SignatureChange) {
        self.registry.rewrite(self.root, change);
    }

    /// Builds the chain of canonical states spelling `suffix` that ends in
    /// `tail`. Every chain state carries `acceptance`.
    pub fn create_chain(&mut self, suffix: &[usize], tail: StateId, acceptance: Acceptance) -> StateId {
        let alphabet_size = self.alphabet.len();

        suffix.iter().rev().fold(tail, |next, symbol| {
            self.registry.replace_or_register(
                StateSignature::new(alphabet_size, acceptance).with_successor(*symbol, next),
            )
        })
    }

    /// Withdraws every state that is about to be updated in place from the
    /// table: the path states above `boundary`, and `last` as well if there is
    /// no boundary. None of them can then be handed out while the new suffix
    /// and the clones are built, and their in-degrees stay at one.
    pub fn hide_path(&mut self, path: &[PathElem], last: StateId, boundary: Option<usize>) {
        let end = boundary.map_or(path.len(), |boundary| boundary.min(path.len()));

        for elem in &path[..end] {
            if elem.state != self.root {
                self.registry.hide(elem.state);
            }
        }
        if boundary.is_none() && last != self.root {
            self.registry.hide(last);
        }
    }

    /// Applies `change` to `last`, cloning it if a boundary was seen, and
    /// re-links the result into the path.
    pub fn relink(
        &mut self,
        path: &[PathElem],
        last: StateId,
        boundary: Option<usize>,
        change: SignatureChange,
        acceptance: Option<Acceptance>,
    ) {
        if last == self.root {
            self.update_root(change);
            return;
        }

        let last = if boundary.is_some() {
            self.registry.clone_state(last, change)
        } else {
            self.registry.update(last, change)
        };

        self.propagate_upwards(path, boundary, last, acceptance);
    }

    /// Re-links `last` into the path from the bottom up. Positions at or below
    /// `boundary` are cloned. Positions above it were hidden by
    /// [DagBuilderCore::hide_path] and are updated in place, which registers
    /// them again. Once an update leaves a state unchanged the remaining
    /// changes are no-ops and only restore the table entries.
    pub fn propagate_upwards(
        &mut self,
        path: &[PathElem],
        boundary: Option<usize>,
        mut last: StateId,
        acceptance: Option<Acceptance>,
    ) {
        for (position, elem) in path.iter().enumerate().rev() {
            let change = SignatureChange::successor(elem.symbol, last, acceptance);

            if elem.state == self.root {
                self.update_root(change);
                return;
            }

            last = if boundary.is_some_and(|boundary| position >= boundary) {
                self.registry.clone_state(elem.state, change)
            } else {
                self.registry.update(elem.state, change)
            };
        }
    }

    /// Releases unreferenced states and optionally checks the invariants.
    pub fn finish_mutation(&mut self) {
        if *self.config.get_reclaim_states() {
            let keep: Vec<StateId> = std::iter::once(self.root).chain(self.sink).collect();
            let released = self.registry.sweep(&keep);
            if released > 0 {
                tracing::trace!("released {} unreferenced states", released);
            }
        } else {
            self.registry.discard_orphans();
        }

        if *self.config.get_check_invariants()
            && let Err(error) = validation::dag::validate(self)
        {
            panic!("DAG invariants violated: {:#}", error);
        }
    }

    pub fn size(&self) -> usize {
        self.registry.registered_count() + 1 + usize::from(self.sink.is_some())
    }

    /// Adds `symbol` to the alphabet and extends every signature with an
    /// undefined transition. Returns the index of the new symbol, or [None] if
    /// it was already known.
    pub fn add_symbol(&mut self, symbol: L) -> Option<usize> {
        if self.alphabet.contains(&symbol) {
            return None;
        }

        let index = self.alphabet.add_symbol(symbol);
        self.registry.grow(self.alphabet.len());
        tracing::debug!("grew alphabet to {} symbols", self.alphabet.len());
        Some(index)
    }

    pub fn to_dfa(&self) -> Dfa<Acceptance, L> {
        let mut dfa = Dfa::new(self.alphabet.alphabet().to_vec());
        let mut node_map = IndexMap::<StateId, Option<NodeIndex>>::new(self.registry.slot_count());
        let mut visited = Vec::new();
        let mut stack = vec![self.root];

        while let Some(state) = stack.pop() {
            if node_map.has_key(state) {
                continue;
            }

            let acceptance = self.acceptance(state);
            let node = dfa.add_node(DfaNode::new(acceptance == Acceptance::True, acceptance));
            node_map.insert(state, Some(node));
            visited.push((state, node));

            if !self.is_sink(state) {
                stack.extend(self.registry.state(state).signature().successors());
            }
        }

        for (state, node) in visited {
            for (index, letter) in self.alphabet.iter().enumerate() {
                let target = self
                    .successor(state, index)
                    .and_then(|successor| *node_map.get(successor));
                if let Some(target) = target {
                    dfa.add_edge(node, target, letter.clone());
                }
            }
        }

        if let Some(root) = node_map.get(self.root) {
            dfa.set_initial(*root);
        }

        dfa
    }
}

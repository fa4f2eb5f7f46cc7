use crate::{
    automaton::{InitializedAutomaton, Letter, alphabet::IndexedAlphabet, dfa::Dfa},
    config::DagBuilderConfig,
    incremental::{
        DagBuilderError, IncrementalDfaBuilder,
        acceptance::Acceptance,
        dag::{
            DagBuilderCore, Walk,
            registry::SignatureChange,
            state::{StateId, StateSignature},
        },
        separating_word,
    },
    validation,
};

/// Incremental builder for prefix-closed samples.
///
/// Accepting a word accepts all of its prefixes, rejecting a word rejects all
/// of its extensions. Rejected words are routed into a single shared sink
/// state, which is created on the first rejection.
#[derive(Debug, Clone)]
pub struct IncrementalPcDfaDagBuilder<L: Letter> {
    core: DagBuilderCore<L>,
}

impl<L: Letter> IncrementalPcDfaDagBuilder<L> {
    pub fn new(alphabet: IndexedAlphabet<L>) -> Self {
        Self::with_config(alphabet, DagBuilderConfig::default())
    }

    pub fn with_config(alphabet: IndexedAlphabet<L>, config: DagBuilderConfig) -> Self {
        IncrementalPcDfaDagBuilder {
            core: DagBuilderCore::new(alphabet, config, true),
        }
    }

    pub fn config(&self) -> &DagBuilderConfig {
        &self.core.config
    }

    /// The state reached by `word`, if the DAG defines one.
    pub fn state_of(&self, word: &[L]) -> Result<Option<StateId>, DagBuilderError> {
        Ok(self.core.get_state(&self.core.symbol_indices(word)?))
    }

    /// The number of transitions pointing at `state`.
    pub fn in_degree(&self, state: StateId) -> u32 {
        self.core.registry.state(state).incoming()
    }

    pub fn sink(&self) -> Option<StateId> {
        self.core.sink
    }

    fn create_suffix(&mut self, suffix: &[usize], accepting: bool) -> StateId {
        if accepting {
            let leaf = self.core.registry.replace_or_register(StateSignature::new(
                self.core.alphabet.len(),
                Acceptance::True,
            ));
            self.core.create_chain(suffix, leaf, Acceptance::True)
        } else {
            let sink = self.core.ensure_sink();
            self.core.create_chain(suffix, sink, Acceptance::DontKnow)
        }
    }

    /// Unregisters the subtree below `state` that is referenced from nowhere
    /// else. Descendants that are still referenced elsewhere only lose one
    /// incoming transition. Purged states are released by the next sweep.
    fn purge(&mut self, state: StateId) {
        let mut stack = vec![state];
        let mut purged = 0;

        while let Some(current) = stack.pop() {
            assert_ne!(
                self.core.acceptance(current),
                Acceptance::True,
                "attempted to purge accepting state {}",
                current
            );

            self.core.registry.hide(current);
            for successor in self.core.registry.take_successors(current) {
                let exclusive = !self.core.is_sink(successor)
                    && self.core.registry.state(successor).incoming() == 1;
                self.core.registry.decrease_incoming(successor);
                if exclusive {
                    stack.push(successor);
                }
            }
            purged += 1;
        }

        tracing::debug!("purged {} states below {}", purged, state);
    }

    /// Rejects the empty word, and with it every word.
    fn reject_root(&mut self) {
        let root = self.core.root;
        let sink = self.core.ensure_sink();

        self.purge(root);
        self.core.update_root(SignatureChange::Acceptance(Acceptance::False));
        for symbol in 0..self.core.alphabet.len() {
            self.core.update_root(SignatureChange::Successor(symbol, sink));
        }
    }
}

impl<L: Letter> IncrementalDfaBuilder<L> for IncrementalPcDfaDagBuilder<L> {
    fn alphabet(&self) -> &IndexedAlphabet<L> {
        &self.core.alphabet
    }

    fn lookup(&self, word: &[L]) -> Result<Acceptance, DagBuilderError> {
        self.core.lookup(word)
    }

    fn insert(&mut self, word: &[L], accepting: bool) -> Result<(), DagBuilderError> {
        let symbols = self.core.symbol_indices(word)?;
        let acceptance = Acceptance::from_bool(accepting);
        let Walk {
            path,
            last,
            confluence,
        } = self.core.walk(&symbols);
        let root = self.core.root;

        // A rejected prefix decides the word.
        let rejected_prefix = path
            .iter()
            .map(|elem| elem.state)
            .chain(std::iter::once(last))
            .any(|state| self.core.acceptance(state) == Acceptance::False);
        if rejected_prefix {
            return if accepting {
                Err(DagBuilderError::Conflict {
                    existing: Acceptance::False,
                    requested: acceptance,
                })
            } else {
                Ok(())
            };
        }

        let propagated = accepting.then_some(Acceptance::True);
        let full_match = path.len() == symbols.len();

        let boundary = if full_match {
            let existing = self.core.acceptance(last);
            if existing == acceptance {
                return Ok(());
            }
            if existing.is_definite() {
                return Err(DagBuilderError::Conflict {
                    existing,
                    requested: acceptance,
                });
            }

            confluence.or_else(|| self.core.is_confluent(last).then_some(path.len()))
        } else {
            confluence
        };

        if full_match && !accepting {
            if last == root {
                self.reject_root();
                self.core.finish_mutation();
                return Ok(());
            }

            self.core.hide_path(&path, last, boundary);
            let sink = self.core.ensure_sink();
            if boundary.is_none() {
                self.purge(last);
            }
            self.core.propagate_upwards(&path, boundary, sink, None);
        } else {
            self.core.hide_path(&path, last, boundary);

            let change = match symbols.get(path.len()) {
                Some(&symbol) => {
                    let chain = self.create_suffix(&symbols[path.len() + 1..], accepting);
                    SignatureChange::successor(symbol, chain, propagated)
                }
                None => SignatureChange::Acceptance(Acceptance::True),
            };
            self.core.relink(&path, last, boundary, change, propagated);
        }

        self.core.finish_mutation();
        tracing::trace!(
            "inserted prefix-closed word of length {} ({}), {} symbols were already present",
            symbols.len(),
            acceptance,
            path.len()
        );

        Ok(())
    }

    fn add_alphabet_symbol(&mut self, symbol: L) {
        let Some(index) = self.core.add_symbol(symbol) else {
            return;
        };

        if self.core.acceptance(self.core.root) == Acceptance::False {
            let sink = self.core.ensure_sink();
            self.core.update_root(SignatureChange::Successor(index, sink));
        }
    }

    fn find_separating_word<A>(
        &self,
        target: &A,
        inputs: &[L],
        omit_undefined: bool,
    ) -> Result<Option<Vec<L>>, DagBuilderError>
    where
        A: InitializedAutomaton<Letter = L>,
    {
        separating_word::find_separating_word(&self.core, target, inputs, omit_undefined)
    }

    fn size(&self) -> usize {
        self.core.size()
    }

    fn to_dfa(&self) -> Dfa<Acceptance, L> {
        self.core.to_dfa()
    }

    fn validate(&self) -> anyhow::Result<()> {
        validation::dag::validate(&self.core)
    }
}

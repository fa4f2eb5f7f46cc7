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

/// Incremental builder of a minimal acyclic partial DFA that stores exactly the
/// inserted words. Words that were never inserted are classified as
/// [Acceptance::DontKnow].
#[derive(Debug, Clone)]
pub struct IncrementalDfaDagBuilder<L: Letter> {
    core: DagBuilderCore<L>,
}

impl<L: Letter> IncrementalDfaDagBuilder<L> {
    pub fn new(alphabet: IndexedAlphabet<L>) -> Self {
        Self::with_config(alphabet, DagBuilderConfig::default())
    }

    pub fn with_config(alphabet: IndexedAlphabet<L>, config: DagBuilderConfig) -> Self {
        IncrementalDfaDagBuilder {
            core: DagBuilderCore::new(alphabet, config, false),
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

    fn create_suffix(&mut self, suffix: &[usize], acceptance: Acceptance) -> StateId {
        let leaf = self
            .core
            .registry
            .replace_or_register(StateSignature::new(self.core.alphabet.len(), acceptance));

        self.core.create_chain(suffix, leaf, Acceptance::DontKnow)
    }
}

impl<L: Letter> IncrementalDfaBuilder<L> for IncrementalDfaDagBuilder<L> {
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

        let boundary = if path.len() == symbols.len() {
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

        self.core.hide_path(&path, last, boundary);

        let change = match symbols.get(path.len()) {
            Some(&symbol) => {
                let chain = self.create_suffix(&symbols[path.len() + 1..], acceptance);
                SignatureChange::Successor(symbol, chain)
            }
            None => SignatureChange::Acceptance(acceptance),
        };

        self.core.relink(&path, last, boundary, change, None);
        self.core.finish_mutation();
        tracing::trace!(
            "inserted word of length {} ({}), {} symbols were already present",
            symbols.len(),
            acceptance,
            path.len()
        );

        Ok(())
    }

    fn add_alphabet_symbol(&mut self, symbol: L) {
        self.core.add_symbol(symbol);
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

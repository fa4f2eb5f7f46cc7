use thiserror::Error;

use crate::automaton::{InitializedAutomaton, Letter, alphabet::IndexedAlphabet, dfa::Dfa};

pub mod acceptance;
pub mod dag;
pub mod separating_word;

use acceptance::Acceptance;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DagBuilderError {
    /// The word already has a definite classification that differs from the
    /// requested one. The builder is left unchanged.
    #[error("incompatible acceptances: {existing} vs {requested}")]
    Conflict {
        existing: Acceptance,
        requested: Acceptance,
    },
    #[error("symbol {symbol} is not part of the input alphabet")]
    UnknownSymbol { symbol: String },
}

/// Incremental construction of a partial DFA from classified sample words.
pub trait IncrementalDfaBuilder<L: Letter> {
    fn alphabet(&self) -> &IndexedAlphabet<L>;

    /// Classifies `word` according to the samples inserted so far.
    fn lookup(&self, word: &[L]) -> Result<Acceptance, DagBuilderError>;

    /// Records the classification of `word`. On error the builder is left
    /// exactly as before the call.
    fn insert(&mut self, word: &[L], accepting: bool) -> Result<(), DagBuilderError>;

    fn insert_accepting(&mut self, word: &[L]) -> Result<(), DagBuilderError> {
        self.insert(word, true)
    }

    fn has_definitive_information(&self, word: &[L]) -> Result<bool, DagBuilderError> {
        Ok(self.lookup(word)?.is_definite())
    }

    /// Extends the input alphabet. Known symbols are ignored.
    fn add_alphabet_symbol(&mut self, symbol: L);

    /// Searches a shortest word over `inputs` on which the builder and `target`
    /// disagree. With `omit_undefined`, words on which `target` is undefined are
    /// skipped, otherwise an undefined transition of `target` is treated as
    /// leading into a rejecting sink.
    fn find_separating_word<A>(
        &self,
        target: &A,
        inputs: &[L],
        omit_undefined: bool,
    ) -> Result<Option<Vec<L>>, DagBuilderError>
    where
        A: InitializedAutomaton<Letter = L>;

    /// The number of states, including the root and a materialized sink.
    fn size(&self) -> usize;

    /// Exports the states reachable from the root. Nodes carry their three-valued
    /// acceptance; only [Acceptance::True] nodes are accepting.
    fn to_dfa(&self) -> Dfa<Acceptance, L>;

    /// Checks the structural invariants of the underlying DAG.
    fn validate(&self) -> anyhow::Result<()>;
}

use hashbrown::HashMap;

use crate::automaton::{Alphabet, Letter};

/// An ordered input alphabet with a dense index space.
///
/// Every symbol is assigned the position at which it was added, so indices
/// stay stable when the alphabet grows. Adding a symbol that is already part
/// of the alphabet is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedAlphabet<L: Letter> {
    symbols: Vec<L>,
    indices: HashMap<L, usize>,
}

impl<L: Letter> IndexedAlphabet<L> {
    pub fn new(symbols: impl IntoIterator<Item = L>) -> Self {
        let mut alphabet = IndexedAlphabet {
            symbols: Vec::new(),
            indices: HashMap::new(),
        };

        for symbol in symbols {
            alphabet.add_symbol(symbol);
        }

        alphabet
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &L) -> bool {
        self.indices.contains_key(symbol)
    }

    pub fn index_of(&self, symbol: &L) -> Option<usize> {
        self.indices.get(symbol).copied()
    }

    /// Returns the symbol at `index`.
    ///
    /// Panics if `index` is out of range.
    pub fn symbol_at(&self, index: usize) -> &L {
        &self.symbols[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &L> {
        self.symbols.iter()
    }

    /// Adds `symbol` to the end of the alphabet and returns its index. If the
    /// symbol is already known, its existing index is returned.
    pub fn add_symbol(&mut self, symbol: L) -> usize {
        if let Some(index) = self.indices.get(&symbol) {
            return *index;
        }

        let index = self.symbols.len();
        self.indices.insert(symbol.clone(), index);
        self.symbols.push(symbol);
        index
    }
}

impl<L: Letter> Alphabet for IndexedAlphabet<L> {
    type Letter = L;

    fn alphabet(&self) -> &[Self::Letter] {
        &self.symbols
    }
}

impl<L: Letter> FromIterator<L> for IndexedAlphabet<L> {
    fn from_iter<T: IntoIterator<Item = L>>(iter: T) -> Self {
        IndexedAlphabet::new(iter)
    }
}

#[test]
fn test_indexed_alphabet_ignores_duplicates() {
    let mut alphabet: IndexedAlphabet<char> = "abca".chars().collect();

    assert_eq!(alphabet.len(), 3);
    assert_eq!(alphabet.index_of(&'c'), Some(2));
    assert_eq!(alphabet.add_symbol('b'), 1);
    assert_eq!(alphabet.add_symbol('d'), 3);
    assert_eq!(alphabet.symbol_at(3), &'d');
    assert_eq!(alphabet.index_of(&'e'), None);
}

use crate::automaton::GIndex;

pub trait IndexMapData: Clone + PartialEq {
    fn empty() -> Self;
}

impl<T: Clone + PartialEq> IndexMapData for Option<T> {
    fn empty() -> Self {
        None
    }
}

impl IndexMapData for u32 {
    fn empty() -> Self {
        0
    }
}

impl IndexMapData for bool {
    fn empty() -> Self {
        false
    }
}

/// A dense map over a compact index space, backed by a [Vec].
pub struct IndexMap<K: GIndex, V: IndexMapData> {
    data: Vec<V>,
    _marker: std::marker::PhantomData<K>,
}

impl<K: GIndex, V: IndexMapData> IndexMap<K, V> {
    pub fn new(max_index: usize) -> Self {
        IndexMap {
            data: vec![V::empty(); max_index],
            _marker: std::marker::PhantomData,
        }
    }

    pub fn has_key(&self, key: K) -> bool {
        let index = key.index();

        index < self.data.len() && self.data[index] != V::empty()
    }

    pub fn get(&self, key: K) -> &V {
        &self.data[key.index()]
    }

    pub fn get_mut(&mut self, key: K) -> &mut V {
        &mut self.data[key.index()]
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.data[key.index()] = value;
    }
}

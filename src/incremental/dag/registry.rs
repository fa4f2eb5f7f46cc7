use hashbrown::HashMap;

use crate::{
    automaton::GIndex,
    incremental::{
        acceptance::Acceptance,
        dag::state::{State, StateId, StateSignature},
    },
};

/// A single modification of a [StateSignature].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureChange {
    Acceptance(Acceptance),
    Successor(usize, StateId),
    Both(Acceptance, usize, StateId),
}

impl SignatureChange {
    /// A successor change that additionally sets the acceptance if one is
    /// given.
    pub fn successor(index: usize, successor: StateId, acceptance: Option<Acceptance>) -> Self {
        match acceptance {
            Some(acceptance) => SignatureChange::Both(acceptance, index, successor),
            None => SignatureChange::Successor(index, successor),
        }
    }

    pub fn acceptance(&self) -> Option<Acceptance> {
        match self {
            SignatureChange::Acceptance(acceptance) | SignatureChange::Both(acceptance, _, _) => {
                Some(*acceptance)
            }
            SignatureChange::Successor(_, _) => None,
        }
    }

    pub fn transition(&self) -> Option<(usize, StateId)> {
        match self {
            SignatureChange::Successor(index, successor)
            | SignatureChange::Both(_, index, successor) => Some((*index, *successor)),
            SignatureChange::Acceptance(_) => None,
        }
    }

    /// Whether applying this change to `signature` would leave it unchanged.
    pub fn is_noop(&self, signature: &StateSignature) -> bool {
        self.acceptance()
            .is_none_or(|acceptance| acceptance == signature.acceptance())
            && self
                .transition()
                .is_none_or(|(index, successor)| signature.successor(index) == Some(successor))
    }

    /// Applies the change and returns the successor it displaced.
    fn apply(&self, signature: &mut StateSignature) -> Option<StateId> {
        if let Some(acceptance) = self.acceptance() {
            signature.set_acceptance(acceptance);
        }

        self.transition()
            .and_then(|(index, successor)| signature.set_successor(index, Some(successor)))
    }
}

/// Arena of DAG states together with the canonicalization table.
///
/// The table maps every registered signature to its unique representative.
/// States that are currently being mutated are *hidden*, i.e. present in the
/// arena but absent from the table. In-degrees are maintained for every live
/// state, whether registered or not. A state whose in-degree drops to zero is
/// remembered as an orphan until the next [StateRegistry::sweep].
#[derive(Debug, Clone, Default)]
pub struct StateRegistry {
    slots: Vec<Option<State>>,
    free: Vec<StateId>,
    table: HashMap<StateSignature, StateId>,
    orphans: Vec<StateId>,
}

impl StateRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        StateRegistry {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            table: HashMap::with_capacity(capacity),
            orphans: Vec::new(),
        }
    }

    /// Returns the state with the given id.
    ///
    /// Panics if the state has been released.
    pub fn state(&self, id: StateId) -> &State {
        self.slots[id.index()]
            .as_ref()
            .unwrap_or_else(|| panic!("State {} has already been released", id))
    }

    fn state_mut(&mut self, id: StateId) -> &mut State {
        self.slots[id.index()]
            .as_mut()
            .unwrap_or_else(|| panic!("State {} has already been released", id))
    }

    pub fn is_live(&self, id: StateId) -> bool {
        self.slots.get(id.index()).is_some_and(Option::is_some)
    }

    /// Upper bound of all state ids handed out so far.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn registered_count(&self) -> usize {
        self.table.len()
    }

    pub fn canonical(&self, signature: &StateSignature) -> Option<StateId> {
        self.table.get(signature).copied()
    }

    pub fn is_registered(&self, id: StateId) -> bool {
        self.canonical(self.state(id).signature()) == Some(id)
    }

    pub fn live_states(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|state| (StateId::new(index), state)))
    }

    fn allocate(&mut self, signature: StateSignature) -> StateId {
        for successor in signature.successors() {
            self.increase_incoming(successor);
        }

        let state = State::new(signature);
        match self.free.pop() {
            Some(id) => {
                self.slots[id.index()] = Some(state);
                id
            }
            None => {
                let id = StateId::new(self.slots.len());
                self.slots.push(Some(state));
                id
            }
        }
    }

    /// Allocates a state that never enters the table, e.g. the root or the
    /// sink.
    pub fn allocate_unregistered(&mut self, signature: StateSignature) -> StateId {
        self.allocate(signature)
    }

    /// Returns the canonical state for `signature`, creating and registering a
    /// new one if none exists.
    pub fn replace_or_register(&mut self, signature: StateSignature) -> StateId {
        if let Some(id) = self.table.get(&signature) {
            return *id;
        }

        let id = self.allocate(signature.clone());
        self.table.insert(signature, id);
        id
    }

    /// Removes `id` from the table without touching the arena. Does nothing if
    /// the table maps its signature to a different state.
    pub fn hide(&mut self, id: StateId) {
        let Some(state) = self.slots[id.index()].as_ref() else {
            return;
        };

        if self.table.get(state.signature()) == Some(&id) {
            self.table.remove(state.signature());
        }
    }

    /// Applies `change` to a hidden state and registers the result. If another
    /// state already carries the new signature, `id` is retired and the other
    /// state is returned.
    pub fn unhide(&mut self, id: StateId, change: SignatureChange) -> StateId {
        if !change.is_noop(self.state(id).signature()) {
            self.rewrite(id, change);
        }
        self.register_or_merge(id)
    }

    /// Mutates `id` in place and re-canonicalizes it. `id` may be registered or
    /// hidden, but must not be confluent.
    pub fn update(&mut self, id: StateId, change: SignatureChange) -> StateId {
        debug_assert!(
            !self.state(id).is_confluent(),
            "in-place update of confluent state {}",
            id
        );

        if change.is_noop(self.state(id).signature()) && self.is_registered(id) {
            return id;
        }

        self.hide(id);
        self.unhide(id, change)
    }

    /// Returns the canonical state for the signature of `id` with `change`
    /// applied, leaving `id` untouched.
    pub fn clone_state(&mut self, id: StateId, change: SignatureChange) -> StateId {
        let signature = self.state(id).signature();
        if change.is_noop(signature) {
            return id;
        }

        let mut signature = signature.clone();
        change.apply(&mut signature);
        self.replace_or_register(signature)
    }

    /// Applies `change` to `id` directly, keeping in-degrees consistent. The
    /// table is not consulted, so this is only valid for hidden or
    /// unregistered states.
    pub fn rewrite(&mut self, id: StateId, change: SignatureChange) {
        let displaced = change.apply(&mut self.state_mut(id).signature);

        if let Some((_, successor)) = change.transition() {
            self.increase_incoming(successor);
        }
        if let Some(displaced) = displaced {
            self.decrease_incoming(displaced);
        }
    }

    fn register_or_merge(&mut self, id: StateId) -> StateId {
        let signature = self.state(id).signature().clone();

        if let Some(other) = self.table.get(&signature).copied() {
            if other != id {
                self.retire(id);
            }
            return other;
        }

        self.table.insert(signature, id);
        id
    }

    /// Drops all outgoing references of a state that has been replaced by an
    /// equivalent one. The state itself is released once it is unreferenced.
    fn retire(&mut self, id: StateId) {
        for successor in self.take_successors(id) {
            self.decrease_incoming(successor);
        }
    }

    /// Clears all successors of `id` without adjusting their in-degrees.
    pub fn take_successors(&mut self, id: StateId) -> Vec<StateId> {
        self.state_mut(id).signature.clear_successors()
    }

    pub fn increase_incoming(&mut self, id: StateId) {
        self.state_mut(id).incoming += 1;
    }

    pub fn decrease_incoming(&mut self, id: StateId) {
        let state = self.state_mut(id);
        debug_assert!(state.incoming > 0, "in-degree of {} underflows", id);
        state.incoming -= 1;

        if state.incoming == 0 {
            self.orphans.push(id);
        }
    }

    /// Releases every orphan that is still unreferenced, cascading into its
    /// successors. States in `keep` are never released. Returns the number of
    /// released states.
    pub fn sweep(&mut self, keep: &[StateId]) -> usize {
        let mut released = 0;

        while let Some(id) = self.orphans.pop() {
            if keep.contains(&id) {
                continue;
            }

            match &self.slots[id.index()] {
                Some(state) if state.incoming == 0 => {}
                _ => continue,
            }

            self.release(id);
            released += 1;
        }

        released
    }

    /// Forgets all orphans without releasing them.
    pub fn discard_orphans(&mut self) {
        self.orphans.clear();
    }

    fn release(&mut self, id: StateId) {
        self.hide(id);
        for successor in self.take_successors(id) {
            self.decrease_incoming(successor);
        }

        self.slots[id.index()] = None;
        self.free.push(id);
    }

    /// Extends every signature to `alphabet_size` symbols and rebuilds the
    /// table.
    pub fn grow(&mut self, alphabet_size: usize) {
        let registered: Vec<StateId> = self.table.drain().map(|(_, id)| id).collect();

        for state in self.slots.iter_mut().flatten() {
            state.signature.grow(alphabet_size);
        }

        for id in registered {
            let signature = self.state(id).signature().clone();
            self.table.insert(signature, id);
        }
    }
}

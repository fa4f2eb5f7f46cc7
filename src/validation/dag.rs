use anyhow::{bail, ensure};
use hashbrown::HashMap;

use crate::{
    automaton::{
        Letter,
        index_map::{IndexMap, IndexMapData},
    },
    incremental::{
        acceptance::Acceptance,
        dag::{DagBuilderCore, state::StateId},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unseen,
    Open,
    Closed,
}

impl IndexMapData for Visit {
    fn empty() -> Self {
        Visit::Unseen
    }
}

/// Checks the structural invariants of a DAG builder at a quiescent point:
///
/// - apart from the sink's self-loops, no state can reach itself
/// - every reachable state except the root and the sink is the registered
///   representative of its signature, and no two of them share a signature
/// - the in-degree of every live state equals the number of transitions
///   pointing at it
/// - every signature covers the whole alphabet
/// - prefix-closed builders never have an accepting successor below a
///   non-accepting state
/// - with reclamation enabled, exactly the reachable states are live
pub(crate) fn validate<L: Letter>(core: &DagBuilderCore<L>) -> anyhow::Result<()> {
    let registry = &core.registry;
    let alphabet_size = core.alphabet.len();

    let mut reachable = IndexMap::<StateId, bool>::new(registry.slot_count());
    let mut reachable_count = 0;
    let mut stack = vec![core.root];
    while let Some(state) = stack.pop() {
        ensure!(registry.is_live(state), "reachable state {} was released", state);
        if *reachable.get(state) {
            continue;
        }

        reachable.insert(state, true);
        reachable_count += 1;
        if !core.is_sink(state) {
            stack.extend(registry.state(state).signature().successors());
        }
    }

    ensure_acyclic(core)?;

    let mut references = IndexMap::<StateId, u32>::new(registry.slot_count());
    for (_, state) in registry.live_states() {
        for successor in state.signature().successors() {
            ensure!(
                registry.is_live(successor),
                "released state {} is still referenced",
                successor
            );
            *references.get_mut(successor) += 1;
        }
    }

    let mut signatures = HashMap::new();
    for (id, state) in registry.live_states() {
        ensure!(
            state.incoming() == *references.get(id),
            "state {} has in-degree {} but is referenced {} times",
            id,
            state.incoming(),
            references.get(id)
        );
        ensure!(
            state.signature().len() == alphabet_size,
            "state {} covers {} symbols instead of {}",
            id,
            state.signature().len(),
            alphabet_size
        );

        if !*reachable.get(id) || core.is_sink(id) {
            continue;
        }

        if core.prefix_closed && state.signature().acceptance() != Acceptance::True {
            for successor in state.signature().successors() {
                ensure!(
                    core.acceptance(successor) != Acceptance::True,
                    "accepting state {} is reachable from non-accepting state {}",
                    successor,
                    id
                );
            }
        }

        if id == core.root {
            continue;
        }

        ensure!(
            registry.is_registered(id),
            "reachable state {} is not the registered representative of its signature",
            id
        );
        if let Some(other) = signatures.insert(state.signature(), id) {
            bail!("states {} and {} share the same signature", other, id);
        }
    }

    if *core.config.get_reclaim_states() {
        ensure!(
            registry.live_count() == reachable_count,
            "{} states are live but only {} are reachable",
            registry.live_count(),
            reachable_count
        );
    }

    Ok(())
}

/// Depth-first search from the root that fails on the first back edge. The
/// sink is not expanded.
fn ensure_acyclic<L: Letter>(core: &DagBuilderCore<L>) -> anyhow::Result<()> {
    let registry = &core.registry;
    let mut visits = IndexMap::<StateId, Visit>::new(registry.slot_count());
    let mut stack = vec![(core.root, false)];

    while let Some((state, expanded)) = stack.pop() {
        if expanded {
            visits.insert(state, Visit::Closed);
            continue;
        }
        if *visits.get(state) == Visit::Closed {
            continue;
        }

        visits.insert(state, Visit::Open);
        stack.push((state, true));
        if core.is_sink(state) {
            continue;
        }

        for successor in registry.state(state).signature().successors() {
            match visits.get(successor) {
                Visit::Open => bail!("transition from {} to {} closes a cycle", state, successor),
                Visit::Closed => {}
                Visit::Unseen => stack.push((successor, false)),
            }
        }
    }

    Ok(())
}

use std::collections::VecDeque;

use petgraph::unionfind::UnionFind;

use crate::{
    automaton::{GIndex, InitializedAutomaton, Letter},
    incremental::{
        DagBuilderError,
        dag::{DagBuilderCore, state::StateId},
    },
};

/// A pair of states reached by the same word, with a back-pointer to the
/// record it was discovered from and the position of the input symbol read.
struct Record<S> {
    dag_state: StateId,
    target_state: Option<S>,
    reached_from: Option<(usize, usize)>,
}

/// Breadth-first search over pairs of DAG and target states. Pairs already
/// known to be equivalent are merged in a union-find structure, so every pair
/// of classes is expanded at most once and the first conflict found yields a
/// shortest separating word.
///
/// States of the DAG occupy the ids `0..slot_count`, target states follow
/// directly after them. Unless undefined target transitions are omitted, one
/// more id stands for the virtual rejecting sink of the target.
pub(crate) fn find_separating_word<L, A>(
    core: &DagBuilderCore<L>,
    target: &A,
    inputs: &[L],
    omit_undefined: bool,
) -> Result<Option<Vec<L>>, DagBuilderError>
where
    L: Letter,
    A: InitializedAutomaton<Letter = L>,
{
    let symbols = inputs
        .iter()
        .map(|input| core.symbol_index(input))
        .collect::<Result<Vec<_>, _>>()?;

    let dag_states = core.registry.slot_count();
    let undefined = dag_states + target.node_count();
    let universe = undefined + usize::from(!omit_undefined);
    let target_id = |state: Option<A::NIndex>| state.map_or(undefined, |s| dag_states + s.index());

    let initial = target.get_initial();
    if initial.is_none() && omit_undefined {
        return Ok(None);
    }

    let accepting = initial.is_some_and(|state| target.is_accepting(state));
    if core.acceptance(core.root).conflicts(accepting) {
        tracing::debug!("empty word separates the DAG from the target");
        return Ok(Some(Vec::new()));
    }

    let mut classes = UnionFind::<usize>::new(universe);
    classes.union(core.root.index(), target_id(initial));

    let mut records = vec![Record {
        dag_state: core.root,
        target_state: initial,
        reached_from: None,
    }];
    let mut queue = VecDeque::from([0]);

    while let Some(current) = queue.pop_front() {
        let dag_state = records[current].dag_state;
        let target_state = records[current].target_state;

        for (position, symbol) in symbols.iter().copied().enumerate() {
            let target_successor =
                target_state.and_then(|state| target.successor(state, &inputs[position]));
            if target_successor.is_none() && omit_undefined {
                continue;
            }

            // Words the DAG knows nothing about never separate.
            let Some(dag_successor) = core.successor(dag_state, symbol) else {
                continue;
            };

            let dag_class = classes.find_mut(dag_successor.index());
            let target_class = classes.find_mut(target_id(target_successor));
            if dag_class == target_class {
                continue;
            }

            let accepting = target_successor.is_some_and(|state| target.is_accepting(state));
            if core.acceptance(dag_successor).conflicts(accepting) {
                let word = reconstruct(&records, current, inputs, position);
                tracing::debug!(
                    "found separating word of length {} after {} records",
                    word.len(),
                    records.len()
                );
                return Ok(Some(word));
            }

            classes.union(dag_class, target_class);
            records.push(Record {
                dag_state: dag_successor,
                target_state: target_successor,
                reached_from: Some((current, position)),
            });
            queue.push_back(records.len() - 1);
        }
    }

    tracing::debug!("no separating word after {} records", records.len());
    Ok(None)
}

fn reconstruct<S, L: Clone>(
    records: &[Record<S>],
    mut current: usize,
    inputs: &[L],
    last: usize,
) -> Vec<L> {
    let mut word = vec![inputs[last].clone()];

    while let Some((from, position)) = records[current].reached_from {
        word.push(inputs[position].clone());
        current = from;
    }

    word.reverse();
    word
}

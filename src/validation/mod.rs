use std::iter::repeat_n;

use itertools::Itertools;

use crate::{
    automaton::Letter,
    incremental::{IncrementalDfaBuilder, acceptance::Acceptance},
};

pub mod dag;

/// The classification a builder must report for `word` after `samples` were
/// inserted without conflicts.
///
/// Exact builders only know the inserted words. Prefix-closed builders accept
/// every prefix of an accepted sample and reject every extension of a rejected
/// one.
pub fn expected_acceptance<L: Letter>(
    samples: &[(Vec<L>, bool)],
    word: &[L],
    prefix_closed: bool,
) -> Acceptance {
    if !prefix_closed {
        return samples
            .iter()
            .find(|(sample, _)| sample.as_slice() == word)
            .map_or(Acceptance::DontKnow, |(_, accepting)| {
                Acceptance::from_bool(*accepting)
            });
    }

    if samples
        .iter()
        .any(|(sample, accepting)| !accepting && word.starts_with(sample))
    {
        Acceptance::False
    } else if samples
        .iter()
        .any(|(sample, accepting)| *accepting && sample.starts_with(word))
    {
        Acceptance::True
    } else {
        Acceptance::DontKnow
    }
}

/// Asserts that `builder` classifies every word over its alphabet up to
/// `max_word_length` the way the inserted `samples` dictate.
pub fn assert_matches_samples<L: Letter>(
    builder: &impl IncrementalDfaBuilder<L>,
    samples: &[(Vec<L>, bool)],
    prefix_closed: bool,
    max_word_length: usize,
) {
    let alphabet = builder.alphabet().iter().cloned().collect_vec();

    for i in 0..=max_word_length {
        for word in repeat_n(alphabet.iter(), i).multi_cartesian_product() {
            let word = word.into_iter().cloned().collect_vec();
            let expected = expected_acceptance(samples, &word, prefix_closed);
            let actual = builder
                .lookup(&word)
                .unwrap_or_else(|error| panic!("lookup of {:?} failed: {}", word, error));

            assert_eq!(
                actual, expected,
                "{:?} is classified as {} but the samples imply {}",
                word, actual, expected
            );
        }
    }
}

/// Asserts that two builders classify every word up to `max_word_length`
/// identically.
pub fn assert_same_classification<L: Letter>(
    a: &impl IncrementalDfaBuilder<L>,
    b: &impl IncrementalDfaBuilder<L>,
    max_word_length: usize,
) {
    if a.alphabet() != b.alphabet() {
        panic!("Alphabets are not the same");
    }

    let alphabet = a.alphabet().iter().cloned().collect_vec();

    for i in 0..=max_word_length {
        for word in repeat_n(alphabet.iter(), i).multi_cartesian_product() {
            let word = word.into_iter().cloned().collect_vec();
            let (left, right) = (a.lookup(&word), b.lookup(&word));

            assert_eq!(
                left, right,
                "{:?} is classified differently by builder `a` and builder `b`",
                word
            );
        }
    }
}

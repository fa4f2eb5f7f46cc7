use incremental_dfa::{
    automaton::{
        Alphabet, Language,
        dfa::{Dfa, node::DfaNode},
    },
    config::DagBuilderConfig,
    incremental::{
        DagBuilderError, IncrementalDfaBuilder, acceptance::Acceptance,
        dag::IncrementalPcDfaDagBuilder,
    },
    validation::{assert_matches_samples, assert_same_classification},
};
use itertools::Itertools;
use rand::{RngExt, SeedableRng, rngs::StdRng, seq::SliceRandom};

fn word(s: &str) -> Vec<char> {
    s.chars().collect_vec()
}

fn builder() -> IncrementalPcDfaDagBuilder<char> {
    IncrementalPcDfaDagBuilder::with_config(
        "abc".chars().collect(),
        DagBuilderConfig::default().with_check_invariants(true),
    )
}

#[test]
fn test_lookup() {
    let mut builder = builder();

    builder.insert(&word("abc"), true).unwrap();
    assert_eq!(builder.lookup(&word("")).unwrap(), Acceptance::True);
    assert_eq!(builder.lookup(&word("a")).unwrap(), Acceptance::True);
    assert_eq!(builder.lookup(&word("ab")).unwrap(), Acceptance::True);
    assert_eq!(builder.lookup(&word("abc")).unwrap(), Acceptance::True);
    assert_eq!(builder.lookup(&word("abca")).unwrap(), Acceptance::DontKnow);

    builder.insert(&word("acb"), false).unwrap();
    assert_eq!(builder.lookup(&word("acb")).unwrap(), Acceptance::False);
    assert_eq!(builder.lookup(&word("acba")).unwrap(), Acceptance::False);
    assert_eq!(builder.lookup(&word("ac")).unwrap(), Acceptance::DontKnow);

    builder.insert(&word("ac"), true).unwrap();
    assert_eq!(builder.lookup(&word("ac")).unwrap(), Acceptance::True);
    assert_eq!(builder.lookup(&word("acb")).unwrap(), Acceptance::False);
    assert_eq!(builder.lookup(&word("aca")).unwrap(), Acceptance::DontKnow);
    assert_eq!(builder.lookup(&word("acba")).unwrap(), Acceptance::False);

    builder.validate().unwrap();
}

#[test]
fn test_shared_suffix_collapses() {
    let mut builder = builder();

    builder.insert(&word("c"), true).unwrap();
    builder.insert(&word("bc"), true).unwrap();

    assert_eq!(builder.lookup(&word("b")).unwrap(), Acceptance::True);
    assert_eq!(builder.lookup(&word("bc")).unwrap(), Acceptance::True);
    assert_eq!(builder.lookup(&word("c")).unwrap(), Acceptance::True);

    let c = builder.state_of(&word("c")).unwrap().unwrap();
    assert_eq!(builder.state_of(&word("bc")).unwrap(), Some(c));
    assert_eq!(builder.in_degree(c), 2);
}

#[test]
fn test_rejected_prefix_decides_extensions() {
    let mut builder = builder();

    builder.insert(&word("ab"), false).unwrap();
    assert_eq!(
        builder.insert(&word("abc"), true),
        Err(DagBuilderError::Conflict {
            existing: Acceptance::False,
            requested: Acceptance::True
        })
    );
    assert_eq!(builder.lookup(&word("abc")).unwrap(), Acceptance::False);

    let size = builder.size();
    builder.insert(&word("abc"), false).unwrap();
    builder.insert(&word("abca"), false).unwrap();
    assert_eq!(builder.size(), size);
}

#[test]
fn test_accepted_extension_decides_prefixes() {
    let mut builder = builder();

    builder.insert(&word("abc"), true).unwrap();

    assert!(builder.insert(&word("ab"), false).is_err());
    assert!(builder.insert(&word(""), false).is_err());
    assert_eq!(builder.lookup(&word("ab")).unwrap(), Acceptance::True);
}

#[test]
fn test_rejection_purges_subtree() {
    let mut builder = builder();

    builder.insert(&word("abc"), false).unwrap();
    builder.insert(&word("abca"), false).unwrap();
    builder.insert(&word("bbc"), false).unwrap();
    // "a" and "b" lead into the same chain
    assert_eq!(builder.size(), 4);
    assert_eq!(
        builder.state_of(&word("a")).unwrap(),
        builder.state_of(&word("b")).unwrap()
    );

    builder.insert(&word("a"), false).unwrap();

    assert_eq!(builder.lookup(&word("a")).unwrap(), Acceptance::False);
    assert_eq!(builder.lookup(&word("abc")).unwrap(), Acceptance::False);
    assert_eq!(builder.lookup(&word("b")).unwrap(), Acceptance::DontKnow);
    assert_eq!(builder.lookup(&word("bbc")).unwrap(), Acceptance::False);
    assert_eq!(builder.lookup(&word("bb")).unwrap(), Acceptance::DontKnow);
    assert_eq!(builder.state_of(&word("a")).unwrap(), builder.sink());
    assert_eq!(builder.size(), 4);

    builder.insert(&word("b"), false).unwrap();
    assert_eq!(builder.size(), 2);
    builder.validate().unwrap();
}

#[test]
fn test_rejecting_empty_word() {
    let mut builder = builder();

    builder.insert(&word("ab"), false).unwrap();
    builder.insert(&word("ca"), false).unwrap();
    builder.insert(&word(""), false).unwrap();

    assert_eq!(builder.size(), 2);
    assert_eq!(builder.lookup(&word("")).unwrap(), Acceptance::False);
    assert_eq!(builder.lookup(&word("bac")).unwrap(), Acceptance::False);
    assert!(builder.insert(&word("b"), true).is_err());
    builder.insert(&word("cc"), false).unwrap();

    builder.add_alphabet_symbol('d');
    assert_eq!(builder.lookup(&word("d")).unwrap(), Acceptance::False);
    builder.validate().unwrap();
}

#[test]
fn test_add_alphabet_symbol() {
    let mut builder = builder();

    builder.insert(&word("ab"), true).unwrap();
    builder.insert(&word("ba"), false).unwrap();
    builder.add_alphabet_symbol('d');

    assert_eq!(builder.lookup(&word("ab")).unwrap(), Acceptance::True);
    assert_eq!(builder.lookup(&word("bad")).unwrap(), Acceptance::False);
    assert_eq!(builder.lookup(&word("ad")).unwrap(), Acceptance::DontKnow);

    builder.insert(&word("add"), true).unwrap();
    assert_eq!(builder.lookup(&word("ad")).unwrap(), Acceptance::True);
    builder.validate().unwrap();
}

#[test]
fn test_find_separating_word() {
    let mut builder = builder();
    let alphabet = builder.alphabet().alphabet().to_vec();

    builder.insert(&word("abc"), true).unwrap();
    builder.insert(&word("acb"), false).unwrap();
    builder.insert(&word("ac"), true).unwrap();

    let mut dfa = Dfa::<u32, char>::new(alphabet.clone());
    let s0 = dfa.add_node(DfaNode::accepting(0));
    let s1 = dfa.add_node(DfaNode::accepting(1));
    let s2 = dfa.add_node(DfaNode::accepting(2));
    let s3 = dfa.add_node(DfaNode::accepting(3));
    dfa.set_initial(s0);
    dfa.add_edge(s0, s1, 'a');
    dfa.add_edge(s1, s2, 'b');
    dfa.add_edge(s2, s3, 'c');

    assert_eq!(
        builder.find_separating_word(&dfa, &alphabet, true).unwrap(),
        None
    );
    assert_eq!(
        builder.find_separating_word(&dfa, &alphabet, false).unwrap(),
        Some(word("ac"))
    );

    let s4 = dfa.add_node(DfaNode::accepting(4));
    dfa.add_edge(s1, s4, 'c');
    assert_eq!(
        builder.find_separating_word(&dfa, &alphabet, true).unwrap(),
        None
    );
    assert_eq!(
        builder.find_separating_word(&dfa, &alphabet, false).unwrap(),
        None
    );

    let s5 = dfa.add_node(DfaNode::non_accepting(5));
    dfa.add_edge(s4, s5, 'b');
    assert_eq!(
        builder.find_separating_word(&dfa, &alphabet, true).unwrap(),
        None
    );
    assert_eq!(
        builder.find_separating_word(&dfa, &alphabet, false).unwrap(),
        None
    );

    let s6 = dfa.add_node(DfaNode::non_accepting(6));
    dfa.add_edge(s3, s6, 'a');
    assert_eq!(
        builder.find_separating_word(&dfa, &alphabet, true).unwrap(),
        None
    );
    assert_eq!(
        builder.find_separating_word(&dfa, &alphabet, false).unwrap(),
        None
    );

    let s7 = dfa.add_node(DfaNode::accepting(7));
    dfa.add_edge(s5, s7, 'a');
    assert_eq!(
        builder.find_separating_word(&dfa, &alphabet, true).unwrap(),
        Some(word("acba"))
    );
    assert_eq!(
        builder.find_separating_word(&dfa, &alphabet, false).unwrap(),
        Some(word("acba"))
    );
}

#[test]
fn test_separating_word_of_length_one() {
    let mut builder = builder();
    builder.insert(&word("a"), true).unwrap();

    let mut dfa = Dfa::<u32, char>::new(vec!['a', 'b', 'c']);
    let q0 = dfa.add_node(DfaNode::accepting(0));
    let q1 = dfa.add_node(DfaNode::non_accepting(1));
    dfa.set_initial(q0);
    dfa.add_edge(q0, q1, 'a');

    assert_eq!(
        builder
            .find_separating_word(&dfa, &word("abc"), false)
            .unwrap(),
        Some(word("a"))
    );
}

#[test]
fn test_to_dfa_contains_sink() {
    let mut builder = builder();

    builder.insert(&word("ab"), true).unwrap();
    builder.insert(&word("ac"), false).unwrap();

    let dfa = builder.to_dfa();

    assert_eq!(dfa.state_count(), builder.size());
    assert!(dfa.accepts(&word("a")));
    assert!(dfa.accepts(&word("ab")));
    assert!(!dfa.accepts(&word("ac")));
    assert!(!dfa.accepts(&word("acab")));
    assert_eq!(
        builder
            .find_separating_word(&dfa, dfa.alphabet(), false)
            .unwrap(),
        None
    );
}

fn random_samples(
    builder: &mut IncrementalPcDfaDagBuilder<char>,
    alphabet: &[char],
    max_length: usize,
    seed: u64,
    count: usize,
) -> Vec<(Vec<char>, bool)> {
    let mut r = StdRng::seed_from_u64(seed);
    let mut samples: Vec<(Vec<char>, bool)> = Vec::new();

    for _ in 0..count {
        let length = r.random_range(0..=max_length);
        let sample = (0..length)
            .map(|_| alphabet[r.random_range(0..alphabet.len())])
            .collect_vec();
        // bias towards acceptance, rejections close off large parts of the tree
        let accepting = r.random_range(0..3) > 0;

        let conflicting = if accepting {
            samples
                .iter()
                .any(|(known, accepting)| !accepting && sample.starts_with(known))
        } else {
            samples
                .iter()
                .any(|(known, accepting)| *accepting && known.starts_with(&sample))
        };
        let result = builder.insert(&sample, accepting);

        if conflicting {
            assert!(
                matches!(result, Err(DagBuilderError::Conflict { .. })),
                "expected a conflict for {:?}",
                sample
            );
        } else {
            result.unwrap();
            samples.push((sample, accepting));
        }
    }

    samples
}

#[test]
fn test_random_samples() {
    for seed in 0..8 {
        let mut builder = builder();
        let samples = random_samples(&mut builder, &word("abc"), 5, seed, 100);

        assert_matches_samples(&builder, &samples, true, 6);
        builder.validate().unwrap();
    }
}

#[test]
fn test_random_samples_without_reclamation() {
    let config = DagBuilderConfig::default()
        .with_check_invariants(true)
        .with_reclaim_states(false);

    for seed in 0..4 {
        let mut builder =
            IncrementalPcDfaDagBuilder::with_config("abc".chars().collect(), config.clone());
        let samples = random_samples(&mut builder, &word("abc"), 5, seed, 100);

        assert_matches_samples(&builder, &samples, true, 6);

        let mut reclaiming = self::builder();
        for (sample, accepting) in &samples {
            reclaiming.insert(sample, *accepting).unwrap();
        }
        assert_same_classification(&builder, &reclaiming, 6);
    }
}

fn pc_builder(alphabet: &str) -> IncrementalPcDfaDagBuilder<char> {
    IncrementalPcDfaDagBuilder::with_config(
        alphabet.chars().collect(),
        DagBuilderConfig::default().with_check_invariants(true),
    )
}

#[test]
fn test_accepted_words_sharing_a_tail() {
    let samples = ["babbaa", "babbbbb", "babbbbbb"]
        .into_iter()
        .map(|sample| (word(sample), true))
        .collect_vec();

    let mut builder = pc_builder("ab");
    for (sample, accepting) in &samples {
        builder.insert(sample, *accepting).unwrap();
    }

    let mut reversed = pc_builder("ab");
    for (sample, accepting) in samples.iter().rev() {
        reversed.insert(sample, *accepting).unwrap();
    }

    assert_eq!(builder.lookup(&word("babbbbbb")).unwrap(), Acceptance::True);
    assert_eq!(builder.lookup(&word("babbbbbbb")).unwrap(), Acceptance::DontKnow);
    let long = format!("babb{}", "b".repeat(11));
    assert_eq!(builder.lookup(&word(&long)).unwrap(), Acceptance::DontKnow);
    assert_matches_samples(&builder, &samples, true, 10);
    builder.validate().unwrap();

    assert_eq!(builder.size(), 10);
    assert_eq!(builder.size(), reversed.size());
    assert_same_classification(&builder, &reversed, 10);
}

#[test]
fn test_random_samples_on_small_alphabets() {
    for alphabet in ["a", "ab"] {
        for seed in 0..8 {
            let mut builder = pc_builder(alphabet);
            let samples = random_samples(&mut builder, &word(alphabet), 8, seed, 60);

            assert_matches_samples(&builder, &samples, true, 11);
        }
    }
}

#[test]
fn test_shuffled_insertion_order() {
    for alphabet in ["a", "ab", "abc"] {
        for seed in 0..6 {
            let mut builder = pc_builder(alphabet);
            let mut samples = random_samples(&mut builder, &word(alphabet), 8, seed, 80);

            samples.shuffle(&mut StdRng::seed_from_u64(seed + 100));
            let mut shuffled = pc_builder(alphabet);
            for (sample, accepting) in &samples {
                shuffled.insert(sample, *accepting).unwrap();
            }

            assert_eq!(builder.size(), shuffled.size());
            assert_same_classification(&builder, &shuffled, 9);
        }
    }
}

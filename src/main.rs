use incremental_dfa::{
    automaton::{Alphabet, alphabet::IndexedAlphabet},
    incremental::{
        IncrementalDfaBuilder,
        dag::{IncrementalDfaDagBuilder, IncrementalPcDfaDagBuilder},
    },
};
use itertools::Itertools;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let alphabet: IndexedAlphabet<char> = "abc".chars().collect();
    let mut exact = IncrementalDfaDagBuilder::new(alphabet.clone());
    let mut prefix_closed = IncrementalPcDfaDagBuilder::new(alphabet.clone());

    for (word, accepting) in [("abc", true), ("ac", false), ("acb", true), ("", true)] {
        let word = word.chars().collect_vec();

        exact.insert(&word, accepting)?;
        if let Err(error) = prefix_closed.insert(&word, accepting) {
            tracing::warn!("prefix-closed builder refused {:?}: {}", word, error);
        }
    }

    for word in ["", "a", "ab", "abc", "ac", "acb", "acba"] {
        let symbols = word.chars().collect_vec();
        println!(
            "{:>5}: exact {}, prefix-closed {}",
            format!("{:?}", word),
            exact.lookup(&symbols)?,
            prefix_closed.lookup(&symbols)?
        );
    }

    println!(
        "sizes: exact {}, prefix-closed {}",
        exact.size(),
        prefix_closed.size()
    );

    let target = exact.to_dfa();
    println!("{:#?}", target);

    let separating = prefix_closed.find_separating_word(&target, alphabet.alphabet(), false)?;
    match separating {
        Some(word) => println!("separating word: {:?}", word.iter().collect::<String>()),
        None => println!("no separating word"),
    }

    Ok(())
}

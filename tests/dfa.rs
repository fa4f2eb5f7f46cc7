use incremental_dfa::automaton::{
    InitializedAutomaton, Language, TransitionSystem,
    dfa::{Dfa, node::DfaNode},
};

#[test]
fn test_dfa() {
    let mut dfa = Dfa::<u32, char>::new(vec!['a', 'b']);
    let q0 = dfa.add_node(DfaNode::non_accepting(0));
    let q1 = dfa.add_node(DfaNode::non_accepting(1));
    let q2 = dfa.add_node(DfaNode::accepting(2));
    dfa.set_initial(q0);

    dfa.add_edge(q0, q1, 'a');
    dfa.add_edge(q1, q2, 'b');
    dfa.add_edge(q2, q1, 'a');

    let input = "ababab";
    assert!(dfa.accepts(&input.chars().collect::<Vec<_>>()));

    let input = "ababa";
    assert!(!dfa.accepts(&input.chars().collect::<Vec<_>>()));

    let input = "abb";
    assert!(!dfa.accepts(&input.chars().collect::<Vec<_>>()));
}

#[test]
fn test_partial_dfa() {
    let mut dfa = Dfa::<u32, char>::new(vec!['a', 'b']);
    let q0 = dfa.add_node(DfaNode::accepting(0));
    let q1 = dfa.add_node(DfaNode::non_accepting(1));

    assert_eq!(dfa.get_initial(), None);
    assert!(!dfa.accepts(&[]));

    dfa.set_initial(q0);
    dfa.add_edge(q0, q1, 'a');

    assert_eq!(dfa.successor(q0, &'a'), Some(q1));
    assert_eq!(dfa.successor(q0, &'b'), None);
    assert!(dfa.accepts(&[]));

    dfa.set_accepting(q1, true);
    assert!(dfa.is_accepting(q1));
    assert!(dfa.accepts(&['a']));
}

#[test]
fn test_duplicate_edge() {
    let mut dfa = Dfa::<u32, char>::new(vec!['a']);
    let q0 = dfa.add_node(DfaNode::non_accepting(0));
    let q1 = dfa.add_node(DfaNode::accepting(1));

    let edge = dfa.add_edge(q0, q1, 'a');
    assert_eq!(dfa.add_edge(q0, q1, 'a'), edge);
    assert_eq!(dfa.graph.edge_count(), 1);
}

#[test]
#[should_panic]
fn test_nondeterministic_edge() {
    let mut dfa = Dfa::<u32, char>::new(vec!['a']);
    let q0 = dfa.add_node(DfaNode::non_accepting(0));
    let q1 = dfa.add_node(DfaNode::accepting(1));

    dfa.add_edge(q0, q1, 'a');
    dfa.add_edge(q0, q0, 'a');
}

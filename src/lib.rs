pub mod automaton;
pub mod config;
pub mod incremental;
pub mod validation;

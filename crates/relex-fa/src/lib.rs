mod automaton;
mod dfa;
mod nfa;
mod ranges;


pub use automaton::{Automaton, FiniteAutomaton, State, StimulateResult, Transition};
pub use dfa::{Dfa, DfaState};
pub use nfa::{BuildError, Nfa, NfaState};
pub use ranges::{CharRange, InputSet};

use std::collections::VecDeque;

use bit_set::BitSet;
use thiserror::Error;

use crate::automaton::{Automaton, FiniteAutomaton, State, Transition};
use crate::ranges::InputSet;

/// Rejections at the producer boundary. A well-formed NFA cannot trip any of
/// these; they exist so a buggy producer fails at construction entry instead
/// of handing over a corrupt automaton.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("transition references state {0}, which does not exist")]
    UnknownState(usize),
    #[error("input byte {0:#04x} is outside the ASCII range")]
    NotAscii(u8),
    #[error("transition range {0:#04x}..={1:#04x} is inverted")]
    InvertedRange(u8, u8),
    #[error("the NUL byte is reserved as a sentinel and cannot label a transition")]
    ReservedNul,
}

#[derive(Debug)]
pub struct NfaState {
    number: u32,
    accepting: bool,
}

impl State for NfaState {
    fn number(&self) -> u32 {
        self.number
    }

    fn renumber(&mut self, number: u32) {
        self.number = number;
    }
}

impl NfaState {
    pub fn accepting(&self) -> bool {
        self.accepting
    }
}

/// Built by the regex compiler, one state and edge at a time; read-only from
/// then on. Epsilon transitions carry no label.
#[derive(Debug)]
pub struct Nfa {
    core: Automaton<NfaState>,
}

impl Nfa {
    pub fn new() -> Nfa {
        Nfa {
            core: Automaton::new(),
        }
    }

    pub fn add_state(&mut self) -> usize {
        self.core.states.push(NfaState {
            number: 0,
            accepting: false,
        });
        self.core.states.len() - 1
    }

    pub fn set_start(&mut self, state: usize) -> Result<(), BuildError> {
        self.check_state(state)?;
        self.core.start_state = state;
        Ok(())
    }

    pub fn set_accepting(&mut self, state: usize, accepting: bool) -> Result<(), BuildError> {
        self.check_state(state)?;
        self.core.states[state].accepting = accepting;
        Ok(())
    }

    pub fn add_transition(
        &mut self,
        from: usize,
        to: usize,
        input: InputSet,
    ) -> Result<(), BuildError> {
        self.check_state(from)?;
        self.check_state(to)?;
        for r in input.ranges() {
            if r.start > r.end {
                return Err(BuildError::InvertedRange(r.start, r.end));
            }
            if r.contains(0) {
                return Err(BuildError::ReservedNul);
            }
            if r.end > 127 {
                return Err(BuildError::NotAscii(r.end));
            }
        }

        self.core.transitions.push(Transition {
            from,
            to,
            label: Some(input),
        });
        Ok(())
    }

    pub fn add_char_transition(&mut self, from: usize, to: usize, c: u8) -> Result<(), BuildError> {
        self.add_transition(from, to, InputSet::single(c))
    }

    pub fn add_epsilon(&mut self, from: usize, to: usize) -> Result<(), BuildError> {
        self.check_state(from)?;
        self.check_state(to)?;
        self.core.transitions.push(Transition {
            from,
            to,
            label: None,
        });
        Ok(())
    }

    /// Number the states once construction is done. The producer calls this
    /// after its last `add_state`.
    pub fn assign_state_numbers(&mut self) {
        self.core.assign_state_numbers();
    }

    pub fn distinguish_valid_inputs(&mut self) {
        self.core.distinguish_valid_inputs();
    }

    pub(crate) fn accepting_set(&self) -> BitSet {
        self.core
            .states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.accepting)
            .map(|(i, _)| i)
            .collect()
    }

    // all states reachable from `states` by a single transition on `c`
    pub(crate) fn move_on(&self, states: &BitSet, c: u8) -> BitSet {
        let mut result = BitSet::new();
        for t in &self.core.transitions {
            if states.contains(t.from) && t.label.as_ref().is_some_and(|input| input.contains(c)) {
                result.insert(t.to);
            }
        }
        result
    }

    fn check_state(&self, state: usize) -> Result<(), BuildError> {
        if state < self.core.states.len() {
            Ok(())
        } else {
            Err(BuildError::UnknownState(state))
        }
    }
}

impl Default for Nfa {
    fn default() -> Self {
        Nfa::new()
    }
}

impl FiniteAutomaton for Nfa {
    type State = NfaState;

    fn core(&self) -> &Automaton<NfaState> {
        &self.core
    }

    // basic BFS over epsilon edges, visited set guards against epsilon cycles
    fn closure(&self, states: &BitSet) -> BitSet {
        let mut result = BitSet::new();
        let mut visited = BitSet::new();
        let mut queue: VecDeque<usize> = states.iter().collect();

        while let Some(i) = queue.pop_front() {
            if visited.contains(i) {
                continue;
            }

            for t in &self.core.transitions {
                if t.from == i && t.label.is_none() && !visited.contains(t.to) {
                    queue.push_back(t.to);
                }
            }

            result.insert(i);
            visited.insert(i);
        }

        result
    }

    fn is_accepting(&self, state: usize) -> bool {
        self.core.states[state].accepting
    }
}

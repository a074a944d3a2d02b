use std::collections::{HashMap, VecDeque};

use bit_set::BitSet;

use crate::automaton::{Automaton, FiniteAutomaton, State, Transition};
use crate::nfa::Nfa;
use crate::ranges::InputSet;

/// A DFA state is a set of NFA states. It has no accept flag of its own:
/// accept-ness is derived from the member set, see [`Dfa::is_accepting`].
#[derive(Debug)]
pub struct DfaState {
    number: u32,
    nfa_states: BitSet,
}

impl State for DfaState {
    fn number(&self) -> u32 {
        self.number
    }

    fn renumber(&mut self, number: u32) {
        self.number = number;
    }
}

impl DfaState {
    pub fn nfa_states(&self) -> &BitSet {
        &self.nfa_states
    }
}

#[derive(Debug)]
pub struct Dfa {
    core: Automaton<DfaState>,
    // accepting states of the source NFA, snapshotted at construction
    nfa_accept: BitSet,
}

impl Dfa {
    /// Subset construction. Starts from the epsilon-closure of the NFA's
    /// start state and grows one DFA state per distinct reachable closure,
    /// reusing an existing state whenever the same set comes up again.
    /// Moves scan bytes 1..=127; NUL is reserved and never transitioned on.
    pub fn from_nfa(nfa: &Nfa) -> Dfa {
        assert!(
            !nfa.core().states().is_empty(),
            "cannot construct a DFA from an NFA with no states"
        );

        let mut seed = BitSet::new();
        seed.insert(nfa.core().start_state());
        let initial = nfa.closure(&seed);

        let mut states = vec![DfaState {
            number: 0,
            nfa_states: initial.clone(),
        }];

        // configuration -> index, the de-duplication lookup
        let mut subsets: HashMap<BitSet, usize> = HashMap::new();
        subsets.insert(initial, 0);

        let mut work_queue: VecDeque<usize> = VecDeque::new();
        work_queue.push_back(0);

        let mut transitions: Vec<Transition> = Vec::new();

        while let Some(t) = work_queue.pop_front() {
            // inputs leading to each target, coalesced into ranges as we go;
            // a Vec keeps targets in first-reached order
            let mut moves: Vec<(usize, InputSet)> = Vec::new();

            for c in 1u8..128 {
                let move_set = nfa.move_on(&states[t].nfa_states, c);
                if move_set.is_empty() {
                    continue;
                }

                let closure = nfa.closure(&move_set);
                let target = match subsets.get(&closure) {
                    Some(&existing) => existing,
                    None => {
                        let index = states.len();
                        states.push(DfaState {
                            number: 0,
                            nfa_states: closure.clone(),
                        });
                        subsets.insert(closure, index);
                        work_queue.push_back(index);
                        index
                    }
                };

                match moves.iter_mut().find(|(to, _)| *to == target) {
                    Some((_, input)) => input.insert(c),
                    None => moves.push((target, InputSet::single(c))),
                }
            }

            for (to, input) in moves {
                transitions.push(Transition {
                    from: t,
                    to,
                    label: Some(input),
                });
            }
        }

        let mut dfa = Dfa {
            core: Automaton {
                states,
                transitions,
                start_state: 0,
            },
            nfa_accept: nfa.accepting_set(),
        };
        dfa.core.assign_state_numbers();
        dfa
    }

    pub fn distinguish_valid_inputs(&mut self) {
        self.core.distinguish_valid_inputs();
    }
}

impl FiniteAutomaton for Dfa {
    type State = DfaState;

    fn core(&self) -> &Automaton<DfaState> {
        &self.core
    }

    // a DFA has no free moves, a state set is already its own closure
    fn closure(&self, states: &BitSet) -> BitSet {
        states.clone()
    }

    fn is_accepting(&self, state: usize) -> bool {
        !self.core.states[state].nfa_states.is_disjoint(&self.nfa_accept)
    }
}

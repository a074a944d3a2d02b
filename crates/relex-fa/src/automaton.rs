use bit_set::BitSet;

use crate::ranges::InputSet;

// pointer-based graphs in safe rust are somewhat tricky, so states live in a
// Vec and everything refers to them by index
#[derive(Debug, Clone)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
    // None is the epsilon marker; a DFA never carries one
    pub label: Option<InputSet>,
}

/// A state as the shared algorithms see it: only its assigned number.
/// Accept-ness is automaton-kind-specific and lives on [`FiniteAutomaton`].
pub trait State {
    fn number(&self) -> u32;
    fn renumber(&mut self, number: u32);
}

/// Shared state/transition storage for both automaton kinds.
#[derive(Debug)]
pub struct Automaton<S: State> {
    pub(crate) states: Vec<S>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) start_state: usize,
}

impl<S: State> Automaton<S> {
    pub(crate) fn new() -> Automaton<S> {
        Automaton {
            states: Vec::new(),
            transitions: Vec::new(),
            start_state: 0,
        }
    }

    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn start_state(&self) -> usize {
        self.start_state
    }

    /// Numbers every state sequentially from 1 in container order, then
    /// forces the start state to 0. Runs exactly once, after the state set
    /// is final; renumbering after further state creation is not supported.
    pub fn assign_state_numbers(&mut self) {
        let mut next = 0;
        let start = self.start_state;
        for (i, state) in self.states.iter_mut().enumerate() {
            if i != start {
                next += 1;
                state.renumber(next);
            }
        }
        // always use 0 as the start state
        self.states[start].renumber(0);
    }

    /// Splits overlapping transition inputs against each other until any two
    /// transitions have either disjoint or identical ranges. Fixed point over
    /// all pairs; epsilon transitions are ignored. Quadratic per pass, which
    /// is fine for the alphabet sizes involved and a once-per-automaton run.
    pub fn distinguish_valid_inputs(&mut self) {
        loop {
            let mut changes = false;
            for i in 0..self.transitions.len() {
                for j in i + 1..self.transitions.len() {
                    let (head, tail) = self.transitions.split_at_mut(j);
                    if let (Some(a), Some(b)) = (head[i].label.as_mut(), tail[0].label.as_mut()) {
                        changes |= a.distinguish(b);
                    }
                }
            }
            if !changes {
                break;
            }
        }
    }
}

/// What `stimulate` returns: the longest prefix the automaton consumed and
/// the states active after consuming it. Whether the prefix is a complete
/// match is up to the caller, via [`FiniteAutomaton::any_accepting`].
#[derive(Debug)]
pub struct StimulateResult<'a> {
    pub matched: &'a str,
    pub active_states: BitSet,
}

/// The seam between the shared algorithms and the two concrete automaton
/// kinds: each kind supplies its own notion of closure (epsilon walk for the
/// NFA, identity for the DFA) and of accept-ness (explicit flag vs. derived
/// from the member set).
pub trait FiniteAutomaton {
    type State: State;

    fn core(&self) -> &Automaton<Self::State>;

    /// All states reachable from `states` without consuming input.
    /// Idempotent: `closure(closure(s)) == closure(s)`.
    fn closure(&self, states: &BitSet) -> BitSet;

    fn is_accepting(&self, state: usize) -> bool;

    fn any_accepting(&self, states: &BitSet) -> bool {
        states.iter().any(|s| self.is_accepting(s))
    }

    /// Greedy longest-prefix simulation. Starting from the closure of the
    /// start state, consumes one input byte at a time; stops at the first
    /// byte no active state can leave on, without rolling anything back.
    fn stimulate<'a>(&self, input: &'a str) -> StimulateResult<'a> {
        let core = self.core();
        let mut seed = BitSet::new();
        seed.insert(core.start_state);
        let mut active_states = self.closure(&seed);

        let mut matched = 0;
        for (pos, c) in input.bytes().enumerate() {
            let mut to_states = BitSet::new();
            for t in &core.transitions {
                if active_states.contains(t.from)
                    && t.label.as_ref().is_some_and(|input| input.contains(c))
                {
                    to_states.insert(t.to);
                }
            }

            if to_states.is_empty() {
                break;
            }

            active_states = self.closure(&to_states);
            matched = pos + 1;
        }

        // labels only hold ASCII, so `matched` always falls on a char boundary
        StimulateResult {
            matched: &input[..matched],
            active_states,
        }
    }

    /// Whether the automaton accepts the whole of `input`.
    fn matches(&self, input: &str) -> bool {
        let result = self.stimulate(input);
        result.matched.len() == input.len() && self.any_accepting(&result.active_states)
    }
}

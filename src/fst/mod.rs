use std::collections::{HashSet, VecDeque};
use std::iter::FromIterator;

use crate::symbol::Symbol;
use crate::util::types::{ArcLabel, StateId};

pub mod states;

/// A single transition `(p, a, q, b)`: from `from`, consume `input`,
/// produce `output`, go to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arc {
    pub from: StateId,
    pub input: Symbol,
    pub to: StateId,
    pub output: Symbol,
}

impl Arc {
    pub fn new(from: StateId, input: Symbol, to: StateId, output: Symbol) -> Self {
        Self { from, input, to, output }
    }

    /// the combined label the subset and product constructions match on
    pub fn label(&self) -> ArcLabel {
        (self.input.clone(), self.output.clone())
    }

    /// returns true if the arc neither consumes nor produces a symbol
    pub fn is_epsilon(&self) -> bool {
        self.input == Symbol::Epsilon && self.output == Symbol::Epsilon
    }

    /// returns true if either tape of the arc is epsilon
    pub fn mentions_epsilon(&self) -> bool {
        self.input == Symbol::Epsilon || self.output == Symbol::Epsilon
    }
}

/// Finite-state transducer over string symbols, represented as the 5-tuple
/// `(sigma, states, initial, finals, arcs)`.
///
/// The arc set is flat and keyed on state ids, so the value is cheaply
/// clonable and free of interior pointers. Machines may be nondeterministic
/// and may carry ε-arcs; passes that need ε-freeness say so. All operations
/// in this crate return new values and never mutate their inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Fst {
    sigma: HashSet<Symbol>,
    states: HashSet<StateId>,
    initial: StateId,
    finals: HashSet<StateId>,
    arcs: HashSet<Arc>,
}

impl Fst {
    pub fn new(
        sigma: HashSet<Symbol>,
        states: HashSet<StateId>,
        initial: StateId,
        finals: HashSet<StateId>,
        arcs: HashSet<Arc>,
    ) -> Self {
        debug_assert!(states.contains(&initial));
        debug_assert!(finals.iter().all(|f| states.contains(f)));
        debug_assert!(arcs.iter().all(|a| states.contains(&a.from) && states.contains(&a.to)));
        Self { sigma, states, initial, finals, arcs }
    }

    /// machine accepting exactly the empty string, mapped to itself
    pub fn epsilon_language() -> Self {
        let states = HashSet::from_iter(vec![0]);
        let finals = HashSet::from_iter(vec![0]);
        Self::new(HashSet::new(), states, 0, finals, HashSet::new())
    }

    /// machine accepting nothing
    pub fn empty_language() -> Self {
        let states = HashSet::from_iter(vec![0]);
        Self::new(HashSet::new(), states, 0, HashSet::new(), HashSet::new())
    }

    pub fn sigma(&self) -> &HashSet<Symbol> {
        &self.sigma
    }

    pub fn states(&self) -> &HashSet<StateId> {
        &self.states
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn finals(&self) -> &HashSet<StateId> {
        &self.finals
    }

    pub fn arcs(&self) -> &HashSet<Arc> {
        &self.arcs
    }

    /// Returns true if given state is a final state of the machine
    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(&state)
    }

    /// Returns true if given symbol is part of the declared alphabet
    pub fn contains_symbol(&self, symbol: &Symbol) -> bool {
        self.sigma.contains(symbol)
    }

    /// all arcs originating from the given state
    pub fn arcs_from(&self, state: StateId) -> impl Iterator<Item = &Arc> {
        self.arcs.iter().filter(move |arc| arc.from == state)
    }

    /// returns true if any arc mentions ε on either tape
    pub fn has_epsilon_arcs(&self) -> bool {
        self.arcs.iter().any(|arc| arc.mentions_epsilon())
    }

    /// retrieve the ε-closure of the given state over `(ε, ε)` arcs
    pub fn epsilon_closure(&self, state: StateId) -> HashSet<StateId> {
        self.closure(state, |arc| arc.is_epsilon())
    }

    /// closure over arcs that consume no input symbol, used by the
    /// input-projection walk
    fn input_epsilon_closure(&self, state: StateId) -> HashSet<StateId> {
        self.closure(state, |arc| arc.input == Symbol::Epsilon)
    }

    fn closure<P>(&self, state: StateId, follow: P) -> HashSet<StateId>
    where
        P: Fn(&Arc) -> bool,
    {
        let mut reached = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(state);

        while let Some(current) = queue.pop_front() {
            reached.insert(current);

            self.arcs_from(current)
                .filter(|arc| follow(arc) && !reached.contains(&arc.to))
                .map(|arc| arc.to)
                .for_each(|target| queue.push_back(target));
        }

        reached
    }

    /// Returns true if the given word lies in the input projection of the
    /// relation denoted by this machine.
    ///
    /// A token outside the declared alphabet matches the `?` and `@`
    /// wildcards; a token inside it matches only its own arcs. Arcs that
    /// consume no input are followed freely.
    pub fn accepts(&self, word: &[&str]) -> bool {
        let mut current = self.input_epsilon_closure(self.initial);

        for token in word {
            let symbol = Symbol::token(token);
            let known = self.contains_symbol(&symbol);

            let mut next = HashSet::new();
            for state in current.iter() {
                for arc in self.arcs_from(*state) {
                    let matched = match &arc.input {
                        Symbol::Token(_) => arc.input == symbol,
                        Symbol::Unknown | Symbol::Identity => !known,
                        Symbol::Epsilon => false,
                    };
                    if matched {
                        next.extend(self.input_epsilon_closure(arc.to));
                    }
                }
            }

            if next.is_empty() {
                // no transition can consume this token
                return false;
            }
            current = next;
        }

        current.iter().any(|state| self.is_final(*state))
    }
}

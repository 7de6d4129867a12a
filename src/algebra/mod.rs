use std::collections::HashSet;
use std::iter::FromIterator;

use log::trace;

use crate::fst::states::{rename_apart, shift_states};
use crate::fst::{Arc, Fst};
use crate::symbol::Symbol;

pub mod subset;

/// Thompson-style constructions over transducers. Each function returns a
/// new machine; inputs are never mutated.

/// create a transducer with a single mapping from `input` to `output`
pub fn mapping(input: Symbol, output: Symbol) -> Fst {
    let mut sigma = HashSet::new();
    let mut arcs = HashSet::new();

    if input == Symbol::Unknown && output == Symbol::Unknown {
        // a bare unknown also passes through as identity
        sigma.insert(Symbol::Unknown);
        sigma.insert(Symbol::Identity);
        arcs.insert(Arc::new(0, Symbol::Unknown, 1, Symbol::Unknown));
        arcs.insert(Arc::new(0, Symbol::Identity, 1, Symbol::Identity));
    } else if input == Symbol::Unknown || output == Symbol::Unknown {
        // keep a record that the unknown case can also pass through
        // unchanged; harmonization expands it later
        let concrete = if input == Symbol::Unknown { output.clone() } else { input.clone() };
        sigma.insert(input.clone());
        sigma.insert(output.clone());
        sigma.insert(Symbol::Identity);
        arcs.insert(Arc::new(0, input, 1, output));
        arcs.insert(Arc::new(0, Symbol::Unknown, 1, Symbol::Unknown));
        arcs.insert(Arc::new(0, concrete.clone(), 1, concrete));
    } else {
        sigma.insert(input.clone());
        sigma.insert(output.clone());
        arcs.insert(Arc::new(0, input, 1, output));
    }

    let fst = Fst::new(
        sigma,
        HashSet::from_iter(vec![0, 1]),
        0,
        HashSet::from_iter(vec![1]),
        arcs,
    );
    trace!("constructed mapping {:?}", fst);

    fst
}

/// create a transducer as the concatenation of two machines
pub fn concatenate(first: &Fst, second: &Fst) -> Fst {
    // states of the second machine are renamed away from the first
    let second = rename_apart(second, first.states());

    let sigma = first.sigma().union(second.sigma()).cloned().collect();
    let states = first.states().union(second.states()).cloned().collect();

    let mut arcs: HashSet<Arc> = first.arcs().union(second.arcs()).cloned().collect();

    // ε-bridges from the first machine's finals to the second's initial;
    // those finals become intermediate states
    for final_state in first.finals() {
        arcs.insert(Arc::new(*final_state, Symbol::Epsilon, second.initial(), Symbol::Epsilon));
    }

    Fst::new(sigma, states, first.initial(), second.finals().clone(), arcs)
}

/// Thompson union through a fresh initial state and ε-arcs.
///
/// This is the reference construction; the evaluator computes union through
/// the product construction instead, which yields an ε-free result.
pub fn epsilon_union(left: &Fst, right: &Fst) -> Fst {
    let mut left = left.clone();
    let mut right = rename_apart(right, left.states());

    // free state id 0 for the new initial state
    while left.states().contains(&0) || right.states().contains(&0) {
        left = shift_states(&left);
        right = shift_states(&right);
    }

    let sigma = left.sigma().union(right.sigma()).cloned().collect();
    let mut states: HashSet<_> = left.states().union(right.states()).cloned().collect();
    states.insert(0);

    let mut arcs: HashSet<Arc> = left.arcs().union(right.arcs()).cloned().collect();
    arcs.insert(Arc::new(0, Symbol::Epsilon, left.initial(), Symbol::Epsilon));
    arcs.insert(Arc::new(0, Symbol::Epsilon, right.initial(), Symbol::Epsilon));

    let finals = left.finals().union(right.finals()).cloned().collect();

    Fst::new(sigma, states, 0, finals, arcs)
}

/// Kleene closure. The new initial state is the sole final state, wired to
/// the old machine with ε-arcs; the result is determinized so downstream
/// product constructions see an ε-free machine.
pub fn kleene_star(fst: &Fst) -> Fst {
    let shifted = shift_states(fst);

    let mut sigma = shifted.sigma().clone();
    sigma.insert(Symbol::Epsilon);

    let mut states = shifted.states().clone();
    states.insert(0);

    let mut arcs = shifted.arcs().clone();
    arcs.insert(Arc::new(0, Symbol::Epsilon, shifted.initial(), Symbol::Epsilon));
    for final_state in shifted.finals() {
        arcs.insert(Arc::new(*final_state, Symbol::Epsilon, 0, Symbol::Epsilon));
    }

    let starred = Fst::new(sigma, states, 0, HashSet::from_iter(vec![0]), arcs);
    trace!("kleene closure before determinization {:?}", starred);

    subset::determinize(&starred)
}

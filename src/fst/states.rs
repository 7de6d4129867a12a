use std::collections::HashSet;

use crate::fst::{Arc, Fst};
use crate::util::types::StateId;

/// State-renaming utilities. Ids inside a machine are opaque, so two
/// machines must be made disjoint before their state sets are combined.

/// map every state of the machine (initial, finals and both arc endpoints)
/// through the given function
fn map_states<F>(fst: &Fst, f: F) -> Fst
where
    F: Fn(StateId) -> StateId,
{
    let states = fst.states().iter().map(|s| f(*s)).collect();
    let finals = fst.finals().iter().map(|s| f(*s)).collect();
    let arcs = fst
        .arcs()
        .iter()
        .map(|arc| Arc::new(f(arc.from), arc.input.clone(), f(arc.to), arc.output.clone()))
        .collect();

    Fst::new(fst.sigma().clone(), states, f(fst.initial()), finals, arcs)
}

/// Rename the states of a machine away from a conflict set.
///
/// Starts from the states themselves; while any of them collides with the
/// forbidden set, every state is shifted by +1 simultaneously and the check
/// is retried. Terminates once the smallest shifted id exceeds the largest
/// forbidden one.
pub fn rename_apart(fst: &Fst, forbidden: &HashSet<StateId>) -> Fst {
    let mut offset: StateId = 0;
    while fst.states().iter().any(|s| forbidden.contains(&(s + offset))) {
        offset += 1;
    }

    if offset == 0 {
        fst.clone()
    } else {
        map_states(fst, |s| s + offset)
    }
}

/// uniform increment: every state through the successor function, freeing
/// state id 0 for a new initial state
pub fn shift_states(fst: &Fst) -> Fst {
    map_states(fst, |s| s + 1)
}

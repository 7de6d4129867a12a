use std::collections::HashSet;

use log::debug;

use crate::fst::Fst;
use crate::util::types::StateId;

/// Dead-state pruning: a state survives iff it is both ingressible and
/// egressible. Ingressible means being the initial state or having an
/// incoming arc from a different state (a self-loop alone does not count);
/// egressible means being final or having an outgoing arc to a different
/// state. The sink of the product construction and any limbo states it
/// created fail the test and disappear together with their arcs. The
/// initial state is always retained so the machine stays well-formed.
pub fn prune(fst: &Fst) -> Fst {
    let live: HashSet<StateId> = fst
        .states()
        .iter()
        .filter(|state| **state == fst.initial() || (ingressible(fst, **state) && egressible(fst, **state)))
        .cloned()
        .collect();

    if live.len() == fst.states().len() {
        return fst.clone();
    }

    debug!("pruning removed {} dead states", fst.states().len() - live.len());

    let arcs = fst
        .arcs()
        .iter()
        .filter(|arc| live.contains(&arc.from) && live.contains(&arc.to))
        .cloned()
        .collect();
    let finals = fst.finals().intersection(&live).cloned().collect();

    Fst::new(fst.sigma().clone(), live, fst.initial(), finals, arcs)
}

fn ingressible(fst: &Fst, state: StateId) -> bool {
    state == fst.initial() || fst.arcs().iter().any(|arc| arc.to == state && arc.from != state)
}

fn egressible(fst: &Fst, state: StateId) -> bool {
    fst.is_final(state) || fst.arcs().iter().any(|arc| arc.from == state && arc.to != state)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::iter::FromIterator;

    use super::prune;
    use crate::fst::{Arc, Fst};
    use crate::symbol::Symbol;

    fn sym(token: &str) -> Symbol {
        Symbol::token(token)
    }

    #[test]
    fn limbo_states_disappear_with_their_arcs() {
        let mut arcs = HashSet::new();
        arcs.insert(Arc::new(0, sym("a"), 1, sym("a")));
        // state 2 has no way out and is not final
        arcs.insert(Arc::new(0, sym("b"), 2, sym("b")));
        let fst = Fst::new(
            HashSet::from_iter(vec![sym("a"), sym("b")]),
            HashSet::from_iter(vec![0, 1, 2]),
            0,
            HashSet::from_iter(vec![1]),
            arcs,
        );

        let pruned = prune(&fst);
        assert_eq!(pruned.states().len(), 2);
        assert!(!pruned.states().contains(&2));
        assert_eq!(pruned.arcs().len(), 1);
        assert!(pruned.accepts(&["a"]));
        assert!(!pruned.accepts(&["b"]));
    }

    #[test]
    fn a_self_loop_alone_keeps_no_state_alive() {
        let mut arcs = HashSet::new();
        arcs.insert(Arc::new(0, sym("a"), 1, sym("a")));
        arcs.insert(Arc::new(1, sym("a"), 1, sym("a")));
        let fst = Fst::new(
            HashSet::from_iter(vec![sym("a")]),
            HashSet::from_iter(vec![0, 1]),
            0,
            HashSet::from_iter(vec![0]),
            arcs,
        );

        // state 1 loops on itself but leads nowhere and is not final
        let pruned = prune(&fst);
        assert!(!pruned.states().contains(&1));
        assert!(pruned.arcs().is_empty());
    }

    #[test]
    fn the_initial_state_is_always_retained() {
        let fst = Fst::new(
            HashSet::new(),
            HashSet::from_iter(vec![0]),
            0,
            HashSet::new(),
            HashSet::new(),
        );

        let pruned = prune(&fst);
        assert_eq!(pruned.states().len(), 1);
        assert!(!pruned.is_final(0));
    }

    #[test]
    fn pruning_is_idempotent() {
        let mut arcs = HashSet::new();
        arcs.insert(Arc::new(0, sym("a"), 1, sym("a")));
        arcs.insert(Arc::new(0, sym("b"), 2, sym("b")));
        arcs.insert(Arc::new(3, sym("c"), 1, sym("c")));
        let fst = Fst::new(
            HashSet::from_iter(vec![sym("a"), sym("b"), sym("c")]),
            HashSet::from_iter(vec![0, 1, 2, 3]),
            0,
            HashSet::from_iter(vec![1]),
            arcs,
        );

        let once = prune(&fst);
        let twice = prune(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn pruning_preserves_the_recognized_relation() {
        let mut arcs = HashSet::new();
        arcs.insert(Arc::new(0, sym("a"), 1, sym("a")));
        arcs.insert(Arc::new(0, sym("b"), 2, sym("b")));
        arcs.insert(Arc::new(2, sym("b"), 2, sym("b")));
        let fst = Fst::new(
            HashSet::from_iter(vec![sym("a"), sym("b")]),
            HashSet::from_iter(vec![0, 1, 2]),
            0,
            HashSet::from_iter(vec![1]),
            arcs,
        );

        let pruned = prune(&fst);
        for word in &[vec![], vec!["a"], vec!["b"], vec!["b", "b"]] {
            assert_eq!(pruned.accepts(word), fst.accepts(word));
        }
    }
}

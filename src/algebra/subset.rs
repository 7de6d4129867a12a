use std::collections::{BTreeSet, HashSet, VecDeque};
use std::iter::FromIterator;

use hashbrown::HashMap;
use log::debug;

use crate::fst::{Arc, Fst};
use crate::util::types::{ArcLabel, StateId};

/// Determinization by the powerset construction
/// (https://en.wikipedia.org/wiki/Powerset_construction), extended to
/// transducers by treating the `(input, output)` pair as the arc label.
///
/// ε-closures are taken before and after every move, so `(ε, ε)` arcs
/// disappear from the output; arcs with ε on a single tape are ordinary
/// labels and survive. Each reachable set of source states becomes one
/// output state, numbered consecutively in discovery order; a set is final
/// if any member was. The declared alphabet passes through unchanged.
pub fn determinize(fst: &Fst) -> Fst {
    // the ε-closure of the initial state seeds the search
    let start = BTreeSet::from_iter(fst.epsilon_closure(fst.initial()).into_iter());

    let mut subsets: Vec<BTreeSet<StateId>> = vec![start.clone()];
    let mut subset_mapping: HashMap<BTreeSet<StateId>, StateId> = HashMap::new();
    subset_mapping.insert(start.clone(), 0);

    let mut agenda = VecDeque::new();
    agenda.push_back(start);

    let mut arcs = HashSet::new();

    while let Some(subset) = agenda.pop_front() {
        let source = subset_mapping[&subset];

        // apply a move for each label leaving the subset, closing over ε
        let mut moves: HashMap<ArcLabel, BTreeSet<StateId>> = HashMap::new();
        for state in subset.iter() {
            for arc in fst.arcs_from(*state) {
                if arc.is_epsilon() {
                    continue;
                }
                let reachable = moves.entry(arc.label()).or_insert_with(BTreeSet::new);
                reachable.extend(fst.epsilon_closure(arc.to));
            }
        }

        for ((input, output), targets) in moves {
            let target = if let Some(existing) = subset_mapping.get(&targets) {
                *existing
            } else {
                // queue the newly created subset for processing
                let fresh = subsets.len() as StateId;
                subsets.push(targets.clone());
                subset_mapping.insert(targets.clone(), fresh);
                agenda.push_back(targets);
                fresh
            };
            arcs.insert(Arc::new(source, input, target, output));
        }
    }

    let finals = subsets
        .iter()
        .enumerate()
        .filter(|(_, subset)| subset.iter().any(|state| fst.is_final(*state)))
        .map(|(id, _)| id as StateId)
        .collect();
    let states = (0..subsets.len() as StateId).collect();

    debug!("subset construction mapped {} states onto {} subsets", fst.states().len(), subsets.len());

    Fst::new(fst.sigma().clone(), states, 0, finals, arcs)
}

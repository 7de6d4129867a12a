use std::collections::{HashSet, VecDeque};

use hashbrown::HashMap;
use log::debug;
use strum_macros::EnumString;

use crate::algebra::subset::determinize;
use crate::error::FstError;
use crate::fst::{Arc, Fst};
use crate::util::types::StateId;

pub mod harmonize;
pub mod prune;

pub use self::harmonize::harmonize;
pub use self::prune::prune;

/// Binary rational operations computed by the product construction
#[derive(EnumString, Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum ProductOp {
    Union,
    Intersection,
    Subtraction,
}

/// One side of a joint state. The sink stands in for "this side has no way
/// to continue on this label"; it is never final and has no outgoing arcs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Side {
    State(StateId),
    Sink,
}

/// union of two transducers through the product construction
pub fn union(left: &Fst, right: &Fst) -> Result<Fst, FstError> {
    binary(left, right, ProductOp::Union)
}

/// intersection of two transducers through the product construction
pub fn intersection(left: &Fst, right: &Fst) -> Result<Fst, FstError> {
    binary(left, right, ProductOp::Intersection)
}

/// subtraction of the second transducer's relation from the first's
pub fn subtraction(left: &Fst, right: &Fst) -> Result<Fst, FstError> {
    binary(left, right, ProductOp::Subtraction)
}

/// Full binary operation: operands still carrying ε-arcs from concatenation
/// or the ε-based union are determinized first, then the alphabets are
/// harmonized, the product is explored, and dead states are pruned away.
fn binary(left: &Fst, right: &Fst, op: ProductOp) -> Result<Fst, FstError> {
    let left = if left.has_epsilon_arcs() { determinize(left) } else { left.clone() };
    let right = if right.has_epsilon_arcs() { determinize(right) } else { right.clone() };

    let (left, right) = harmonize(&left, &right);
    let joint = product(&left, &right, op)?;

    Ok(prune(&joint))
}

/// Product construction: union, intersection or subtraction of two ε-free
/// transducers by lazy exploration of the joint state space.
///
/// Starting from the joint initial state, every arc on one side is paired
/// with a label-matching arc on the other side, defaulting to the sink when
/// the other side cannot answer. Joint pairs are flattened to fresh ids in
/// first-seen order, counted locally to this call; the initial pair becomes
/// state 0. Callers must harmonize the alphabets beforehand and prune the
/// result afterwards.
pub fn product(left: &Fst, right: &Fst, op: ProductOp) -> Result<Fst, FstError> {
    if left.has_epsilon_arcs() {
        return Err(FstError::EpsilonBearing { operand: "left", op });
    }
    if right.has_epsilon_arcs() {
        return Err(FstError::EpsilonBearing { operand: "right", op });
    }

    let left_arcs = arcs_by_source(left);
    let right_arcs = arcs_by_source(right);

    let seed = (Side::State(left.initial()), Side::State(right.initial()));

    // flat ids are issued in first-seen order by a counter local to this
    // call; the mapping doubles as the visited index
    let mut flattened: HashMap<(Side, Side), StateId> = HashMap::new();
    flattened.insert(seed, 0);
    let mut next_id: StateId = 1;

    let mut states = HashSet::new();
    states.insert(0);
    let mut finals = HashSet::new();
    if is_final_pair(seed, left, right, op) {
        finals.insert(0);
    }

    let mut arcs = HashSet::new();

    let mut agenda = VecDeque::new();
    agenda.push_back(seed);

    while let Some(pair) = agenda.pop_front() {
        let (left_side, right_side) = pair;
        let source = flattened[&pair];

        let from_left = outgoing(&left_arcs, left_side);
        let from_right = outgoing(&right_arcs, right_side);

        let mut joint_arcs: Vec<(Arc, (Side, Side))> = Vec::new();

        for arc in from_left {
            let mut matched = false;
            for candidate in from_right {
                if candidate.input == arc.input && candidate.output == arc.output {
                    matched = true;
                    joint_arcs.push((
                        (*arc).clone(),
                        (Side::State(arc.to), Side::State(candidate.to)),
                    ));
                }
            }
            if !matched {
                // the right side cannot continue on this label
                joint_arcs.push(((*arc).clone(), (Side::State(arc.to), Side::Sink)));
            }
        }

        for arc in from_right {
            let matched = from_left
                .iter()
                .any(|candidate| candidate.input == arc.input && candidate.output == arc.output);
            if !matched {
                joint_arcs.push(((*arc).clone(), (Side::Sink, Side::State(arc.to))));
            }
        }

        for (arc, target_pair) in joint_arcs {
            let target = if let Some(existing) = flattened.get(&target_pair) {
                *existing
            } else {
                let fresh = next_id;
                next_id += 1;
                flattened.insert(target_pair, fresh);
                states.insert(fresh);
                if is_final_pair(target_pair, left, right, op) {
                    finals.insert(fresh);
                }
                agenda.push_back(target_pair);
                fresh
            };
            arcs.insert(Arc::new(source, arc.input, target, arc.output));
        }
    }

    debug!("{:?} product explored {} joint states", op, flattened.len());

    let sigma = left.sigma().union(right.sigma()).cloned().collect();

    Ok(Fst::new(sigma, states, 0, finals, arcs))
}

fn arcs_by_source(fst: &Fst) -> HashMap<StateId, Vec<&Arc>> {
    let mut index: HashMap<StateId, Vec<&Arc>> = HashMap::new();
    for arc in fst.arcs() {
        index.entry(arc.from).or_insert_with(Vec::new).push(arc);
    }
    index
}

fn outgoing<'a>(index: &'a HashMap<StateId, Vec<&'a Arc>>, side: Side) -> &'a [&'a Arc] {
    match side {
        Side::State(state) => index.get(&state).map(|arcs| arcs.as_slice()).unwrap_or(&[]),
        Side::Sink => &[],
    }
}

fn is_final_pair(pair: (Side, Side), left: &Fst, right: &Fst, op: ProductOp) -> bool {
    let left_final = match pair.0 {
        Side::State(state) => left.is_final(state),
        Side::Sink => false,
    };
    let right_final = match pair.1 {
        Side::State(state) => right.is_final(state),
        Side::Sink => false,
    };

    match op {
        ProductOp::Union => left_final || right_final,
        ProductOp::Intersection => left_final && right_final,
        ProductOp::Subtraction => left_final && !right_final,
    }
}

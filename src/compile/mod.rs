use log::trace;

use crate::algebra::{concatenate, kleene_star, mapping};
use crate::error::FstError;
use crate::fst::Fst;
use crate::product::{intersection, subtraction, union};
use crate::symbol::Symbol;

pub mod ast;

pub use self::ast::RegexNode;

/// compile a parse tree into a transducer
pub fn compile(node: &RegexNode) -> Result<Fst, FstError> {
    evaluate(Fst::epsilon_language(), node)
}

/// Walk one parse-tree node with an accumulator machine, dispatching on the
/// node's tag. The top-level marker threads the accumulator through its
/// children; every other constructor replaces it.
pub fn evaluate(accumulator: Fst, node: &RegexNode) -> Result<Fst, FstError> {
    trace!("evaluating {:?}", node);

    match node {
        RegexNode::Statement(children) => {
            let mut accumulator = accumulator;
            for child in children {
                accumulator = evaluate(accumulator, child)?;
            }
            Ok(accumulator)
        }
        RegexNode::Symbol(token) => {
            let symbol = Symbol::decode(token);
            Ok(mapping(symbol.clone(), symbol))
        }
        RegexNode::Mapping(input, output) => {
            let input = decode_leaf(input)?;
            let output = decode_leaf(output)?;
            Ok(mapping(input, output))
        }
        RegexNode::Concatenation(children) => {
            let mut children = children.iter();
            let first = children
                .next()
                .ok_or_else(|| FstError::MalformedParse("empty concatenation".to_string()))?;

            let mut result = evaluate(accumulator.clone(), first)?;
            for child in children {
                let next = evaluate(accumulator.clone(), child)?;
                result = concatenate(&result, &next);
            }
            Ok(result)
        }
        RegexNode::Union(left, right) => {
            let left = evaluate(accumulator.clone(), left)?;
            let right = evaluate(accumulator, right)?;
            union(&left, &right)
        }
        RegexNode::Intersection(left, right) => {
            let left = evaluate(accumulator.clone(), left)?;
            let right = evaluate(accumulator, right)?;
            intersection(&left, &right)
        }
        RegexNode::Subtraction(left, right) => {
            let left = evaluate(accumulator.clone(), left)?;
            let right = evaluate(accumulator, right)?;
            subtraction(&left, &right)
        }
        RegexNode::KleeneStar(child) => {
            let child = evaluate(accumulator, child)?;
            Ok(kleene_star(&child))
        }
    }
}

/// a mapping child must be a symbol leaf
fn decode_leaf(node: &RegexNode) -> Result<Symbol, FstError> {
    match node {
        RegexNode::Symbol(token) => Ok(Symbol::decode(token)),
        other => Err(FstError::MalformedParse(format!(
            "expected a symbol leaf, found {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{compile, RegexNode};
    use crate::error::FstError;
    use crate::symbol::Symbol;

    fn boxed(node: RegexNode) -> Box<RegexNode> {
        Box::new(node)
    }

    #[test]
    fn a_single_symbol_compiles_to_the_two_state_machine() {
        let fst = compile(&RegexNode::symbol("a")).unwrap();

        assert_eq!(fst.states().len(), 2);
        assert_eq!(fst.finals().len(), 1);
        assert_eq!(fst.arcs().len(), 1);
        assert_eq!(fst.sigma().len(), 1);
        assert!(fst.accepts(&["a"]));
    }

    #[test]
    fn concatenation_evaluates_left_to_right() {
        let tree = RegexNode::Concatenation(vec![
            RegexNode::symbol("a"),
            RegexNode::symbol("b"),
            RegexNode::symbol("c"),
        ]);
        let fst = compile(&tree).unwrap();

        assert!(fst.accepts(&["a", "b", "c"]));
        assert!(!fst.accepts(&["a", "b"]));
        assert!(!fst.accepts(&["c", "b", "a"]));
    }

    #[test]
    fn union_goes_through_the_product_construction() {
        let tree = RegexNode::Union(boxed(RegexNode::symbol("a")), boxed(RegexNode::symbol("b")));
        let fst = compile(&tree).unwrap();

        assert!(fst.accepts(&["a"]));
        assert!(fst.accepts(&["b"]));
        assert!(!fst.accepts(&[]));
        // the product result is ε-free
        assert!(!fst.has_epsilon_arcs());
    }

    #[test]
    fn union_of_concatenations_discharges_the_epsilon_bridges() {
        let tree = RegexNode::Union(
            boxed(RegexNode::Concatenation(vec![
                RegexNode::symbol("a"),
                RegexNode::symbol("b"),
            ])),
            boxed(RegexNode::symbol("c")),
        );
        let fst = compile(&tree).unwrap();

        assert!(fst.accepts(&["a", "b"]));
        assert!(fst.accepts(&["c"]));
        assert!(!fst.accepts(&["a"]));
    }

    #[test]
    fn kleene_star_compiles_through_the_subset_construction() {
        let tree = RegexNode::KleeneStar(boxed(RegexNode::symbol("a")));
        let fst = compile(&tree).unwrap();

        assert!(fst.accepts(&[]));
        assert!(fst.accepts(&["a", "a", "a"]));
        assert!(!fst.accepts(&["b"]));
        assert!(!fst.has_epsilon_arcs());
    }

    #[test]
    fn mappings_decode_reserved_symbols() {
        let fst = compile(&RegexNode::mapping("a", "b")).unwrap();
        assert!(fst.accepts(&["a"]));
        assert!(!fst.accepts(&["b"]));

        let unknown = compile(&RegexNode::symbol("?")).unwrap();
        assert!(unknown.contains_symbol(&Symbol::Identity));
        assert!(unknown.accepts(&["anything"]));
    }

    #[test]
    fn statement_markers_pass_the_accumulator_through() {
        let tree = RegexNode::Statement(vec![RegexNode::symbol("a")]);
        let fst = compile(&tree).unwrap();
        assert!(fst.accepts(&["a"]));

        // an empty statement leaves the seed machine untouched
        let empty = compile(&RegexNode::Statement(vec![])).unwrap();
        assert!(empty.accepts(&[]));
    }

    #[test]
    fn malformed_mapping_children_are_reported_with_the_fragment() {
        let tree = RegexNode::Mapping(
            boxed(RegexNode::symbol("a")),
            boxed(RegexNode::KleeneStar(boxed(RegexNode::symbol("b")))),
        );
        let err = compile(&tree).unwrap_err();
        match err {
            FstError::MalformedParse(fragment) => assert!(fragment.contains("(b)*")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn empty_concatenations_are_malformed() {
        let err = compile(&RegexNode::Concatenation(vec![])).unwrap_err();
        assert_eq!(err, FstError::MalformedParse("empty concatenation".to_string()));
    }

    #[test]
    fn intersection_and_subtraction_are_reachable_through_the_tree() {
        let both = RegexNode::Intersection(
            boxed(RegexNode::Union(
                boxed(RegexNode::symbol("a")),
                boxed(RegexNode::symbol("b")),
            )),
            boxed(RegexNode::symbol("b")),
        );
        let fst = compile(&both).unwrap();
        assert!(fst.accepts(&["b"]));
        assert!(!fst.accepts(&["a"]));

        let minus = RegexNode::Subtraction(
            boxed(RegexNode::Union(
                boxed(RegexNode::symbol("a")),
                boxed(RegexNode::symbol("b")),
            )),
            boxed(RegexNode::symbol("b")),
        );
        let fst = compile(&minus).unwrap();
        assert!(fst.accepts(&["a"]));
        assert!(!fst.accepts(&["b"]));
    }
}

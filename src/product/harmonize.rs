use itertools::Itertools;
use log::trace;

use crate::fst::{Arc, Fst};
use crate::symbol::Symbol;

/// Alphabet harmonization: before a binary operation whose semantics depend
/// on matching concrete symbols, the wildcard arcs of each machine are
/// expanded against the ordinary symbols the other machine declares and this
/// one lacks. The original wildcard arcs are retained, since `?` keeps
/// denoting "any symbol still outside the enlarged alphabet"; the declared
/// alphabets themselves are not touched here.
pub fn harmonize(left: &Fst, right: &Fst) -> (Fst, Fst) {
    let left_novel = novel_symbols(right, left);
    let right_novel = novel_symbols(left, right);

    (expand(left, &left_novel), expand(right, &right_novel))
}

/// ordinary symbols declared by `other` but unknown to `own`; reserved
/// symbols can never become newly known
fn novel_symbols(other: &Fst, own: &Fst) -> Vec<Symbol> {
    other
        .sigma()
        .iter()
        .filter(|symbol| !symbol.is_reserved() && !own.contains_symbol(symbol))
        .cloned()
        .collect()
}

/// expand every wildcard-bearing arc of the machine against the given
/// symbols, keeping both the arc and its endpoints
pub fn expand(fst: &Fst, novel: &[Symbol]) -> Fst {
    if novel.is_empty() {
        return fst.clone();
    }

    let mut arcs = fst.arcs().clone();
    for arc in fst.arcs() {
        match (&arc.input, &arc.output) {
            (Symbol::Identity, Symbol::Identity) => {
                for symbol in novel {
                    arcs.insert(Arc::new(arc.from, symbol.clone(), arc.to, symbol.clone()));
                }
            }
            (Symbol::Unknown, Symbol::Unknown) => {
                // the non-identity relation expands to all distinct pairs of
                // novel symbols, plus the half-known combinations
                for (first, second) in novel.iter().cartesian_product(novel.iter()) {
                    if first != second {
                        arcs.insert(Arc::new(arc.from, first.clone(), arc.to, second.clone()));
                    }
                }
                for symbol in novel {
                    arcs.insert(Arc::new(arc.from, symbol.clone(), arc.to, Symbol::Unknown));
                    arcs.insert(Arc::new(arc.from, Symbol::Unknown, arc.to, symbol.clone()));
                }
            }
            (Symbol::Unknown, output) => {
                for symbol in novel {
                    arcs.insert(Arc::new(arc.from, symbol.clone(), arc.to, output.clone()));
                }
            }
            (input, Symbol::Unknown) => {
                for symbol in novel {
                    arcs.insert(Arc::new(arc.from, input.clone(), arc.to, symbol.clone()));
                }
            }
            _ => {}
        }
    }

    trace!("harmonization expanded {} arcs to {}", fst.arcs().len(), arcs.len());

    Fst::new(
        fst.sigma().clone(),
        fst.states().clone(),
        fst.initial(),
        fst.finals().clone(),
        arcs,
    )
}

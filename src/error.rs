use thiserror::Error;

use crate::product::ProductOp;

/// Errors surfaced while compiling an expression into a transducer.
///
/// Messages carry the offending parse-tree fragment or an operand label so
/// failures can be diagnosed without exposing internal state ids.
#[derive(Debug, Error, PartialEq)]
pub enum FstError {
    /// the evaluator met a parse-tree fragment it cannot dispatch on
    #[error("malformed parse input: {0}")]
    MalformedParse(String),

    /// the surface expression was rejected by the grammar
    #[error("syntax error: {0}")]
    Syntax(String),

    /// the product construction was invoked on an ε-bearing machine
    #[error("{operand} operand of {op:?} carries epsilon arcs")]
    EpsilonBearing { operand: &'static str, op: ProductOp },
}

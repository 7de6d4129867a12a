pub use self::compile::ast::RegexNode;
pub use self::error::FstError;
pub use self::fst::{Arc, Fst};
pub use self::product::ProductOp;
pub use self::symbol::Symbol;

pub mod algebra;
pub mod compile;
pub mod error;
pub mod fst;
pub mod parser;
pub mod product;
pub mod symbol;
pub mod util;

/// parse a surface expression and compile it into a transducer
pub fn compile_expression(expression: &str) -> Result<Fst, FstError> {
    let tree = parser::RegexParser::new().parse_expression(expression)?;
    compile::compile(&tree)
}

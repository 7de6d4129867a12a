use std::fmt;

/// Tagged parse tree for regular-relation expressions.
///
/// The surface parser produces these nodes; embedders with their own syntax
/// can assemble them directly. The evaluator dispatches on the tag and fails
/// cleanly on fragments with the wrong shape, so the tree carries no
/// invariants beyond what the variants express.
#[derive(Debug, Clone, PartialEq)]
pub enum RegexNode {
    /// top-level marker wrapping the statements of one expression
    Statement(Vec<RegexNode>),
    /// leaf token; `0`, `?` and `@` decode to the reserved symbols
    Symbol(String),
    /// `x:y`: consume the first symbol, produce the second
    Mapping(Box<RegexNode>, Box<RegexNode>),
    Concatenation(Vec<RegexNode>),
    Union(Box<RegexNode>, Box<RegexNode>),
    Intersection(Box<RegexNode>, Box<RegexNode>),
    Subtraction(Box<RegexNode>, Box<RegexNode>),
    KleeneStar(Box<RegexNode>),
}

impl RegexNode {
    pub fn symbol(token: &str) -> Self {
        RegexNode::Symbol(token.to_string())
    }

    pub fn mapping(input: &str, output: &str) -> Self {
        RegexNode::Mapping(
            Box::new(RegexNode::symbol(input)),
            Box::new(RegexNode::symbol(output)),
        )
    }
}

impl fmt::Display for RegexNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RegexNode::Statement(children) => {
                for child in children {
                    write!(f, "{}", child)?;
                }
                Ok(())
            }
            RegexNode::Symbol(token) => write!(f, "{}", token),
            RegexNode::Mapping(input, output) => write!(f, "{}:{}", input, output),
            RegexNode::Concatenation(children) => {
                let mut first = true;
                for child in children {
                    if !first {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", child)?;
                    first = false;
                }
                Ok(())
            }
            RegexNode::Union(left, right) => write!(f, "({}|{})", left, right),
            RegexNode::Intersection(left, right) => write!(f, "({}&{})", left, right),
            RegexNode::Subtraction(left, right) => write!(f, "({}-{})", left, right),
            RegexNode::KleeneStar(child) => write!(f, "({})*", child),
        }
    }
}

use log::trace;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::compile::ast::RegexNode;
use crate::error::FstError;

/// PEST based parser for regular-relation expressions. The surface syntax
/// follows the Xerox conventions; the grammar is at `regex.pest`. The parser
/// only builds the tagged parse tree; compilation into a transducer is the
/// evaluator's job, so embedders with their own syntax can skip this module
/// entirely.

#[derive(Parser)]
#[grammar = "parser/regex.pest"]
pub struct RegexParser;

impl RegexParser {
    pub fn new() -> Self {
        Self {}
    }

    pub fn parse_expression(&self, expression: &str) -> Result<RegexNode, FstError> {
        let mut parsed = RegexParser::parse(Rule::Regex, expression)
            .map_err(|err| FstError::Syntax(err.to_string()))?;
        let root = parsed.next().expect("a successful parse yields one Regex pair");

        let mut statements = Vec::new();
        for pair in root.into_inner() {
            match pair.as_rule() {
                Rule::Alternation => statements.push(self.build_alternation(pair)?),
                Rule::EOI => {}
                rule => {
                    trace!("{:?}", pair);
                    return Err(FstError::Syntax(format!("rule {:?} is not recognized here", rule)));
                }
            }
        }

        Ok(RegexNode::Statement(statements))
    }

    fn build_alternation(&self, pair: Pair<Rule>) -> Result<RegexNode, FstError> {
        trace!("Alternation: {:?}", pair);
        let mut inner = pair.into_inner();
        let first = inner
            .next()
            .ok_or_else(|| FstError::Syntax("an alternation needs at least one sequence".to_string()))?;
        let mut node = self.build_sequence(first)?;

        // the binary operators share one precedence level and fold left
        while let Some(operator) = inner.next() {
            let operand = inner.next().ok_or_else(|| {
                FstError::Syntax(format!("operator {} is missing its right operand", operator.as_str()))
            })?;
            let right = self.build_sequence(operand)?;
            node = match operator.as_str() {
                "|" => RegexNode::Union(Box::new(node), Box::new(right)),
                "&" => RegexNode::Intersection(Box::new(node), Box::new(right)),
                "-" => RegexNode::Subtraction(Box::new(node), Box::new(right)),
                other => {
                    return Err(FstError::Syntax(format!("operator {} is not recognized", other)))
                }
            };
        }

        Ok(node)
    }

    fn build_sequence(&self, pair: Pair<Rule>) -> Result<RegexNode, FstError> {
        trace!("Sequence: {:?}", pair);
        let mut children = Vec::new();
        for quantified in pair.into_inner() {
            children.push(self.build_quantified(quantified)?);
        }

        if children.len() == 1 {
            Ok(children.remove(0))
        } else {
            Ok(RegexNode::Concatenation(children))
        }
    }

    fn build_quantified(&self, pair: Pair<Rule>) -> Result<RegexNode, FstError> {
        let mut inner = pair.into_inner();
        let primary = inner
            .next()
            .ok_or_else(|| FstError::Syntax("a quantified term needs a primary".to_string()))?;
        let node = self.build_primary(primary)?;

        match inner.next() {
            Some(_) => Ok(RegexNode::KleeneStar(Box::new(node))),
            None => Ok(node),
        }
    }

    fn build_primary(&self, pair: Pair<Rule>) -> Result<RegexNode, FstError> {
        let inner = pair
            .into_inner()
            .next()
            .ok_or_else(|| FstError::Syntax("a primary is a mapping or a group".to_string()))?;

        match inner.as_rule() {
            Rule::Mapping => self.build_mapping(inner),
            Rule::Group => {
                let alternation = inner.into_inner().next().ok_or_else(|| {
                    FstError::Syntax("a group wraps exactly one alternation".to_string())
                })?;
                self.build_alternation(alternation)
            }
            rule => Err(FstError::Syntax(format!("a primary cannot start with {:?}", rule))),
        }
    }

    fn build_mapping(&self, pair: Pair<Rule>) -> Result<RegexNode, FstError> {
        let mut inner = pair.into_inner();
        let input = inner
            .next()
            .ok_or_else(|| FstError::Syntax("a mapping needs at least one symbol".to_string()))?;

        match inner.next() {
            Some(output) => Ok(RegexNode::Mapping(
                Box::new(RegexNode::symbol(input.as_str())),
                Box::new(RegexNode::symbol(output.as_str())),
            )),
            None => Ok(RegexNode::symbol(input.as_str())),
        }
    }
}

//! Guard expressions
//!
//! Guards are a restricted boolean language over event attributes:
//! literals, whitelisted identifiers (at most one `.member` level),
//! comparisons and boolean operators. There are no function calls, no
//! assignment and no arithmetic. Anything else is rejected while parsing,
//! so every [`GuardExpr`] that exists is well-formed and type-checked.
//!
//! ```text
//! amount > 0 and currency in ['USD', 'CAD']
//! not is_reversal or payload.source == 'manual'
//! ```

mod eval;
mod lexer;
mod parser;
mod vocabulary;

use std::fmt;

use crate::domain::value_objects::{AttrValue, AttributeSource};

pub use parser::{parse_guard, MAX_NESTING};
pub use vocabulary::{GuardVocabulary, BUILTIN_ATTRIBUTES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
}

impl CmpOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::In => "in",
            CmpOp::NotIn => "not in",
        }
    }

    pub fn is_ordering(&self) -> bool {
        matches!(self, CmpOp::Lt | CmpOp::Le | CmpOp::Gt | CmpOp::Ge)
    }

    pub fn is_membership(&self) -> bool {
        matches!(self, CmpOp::In | CmpOp::NotIn)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    And,
    Or,
    Not,
}

impl BoolOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoolOp::And => "and",
            BoolOp::Or => "or",
            BoolOp::Not => "not",
        }
    }
}

/// Guard syntax tree. The set of node kinds is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardExpr {
    Literal(AttrValue),
    /// Only valid as the right operand of `in` / `not in`.
    List(Vec<AttrValue>),
    Identifier(String),
    Comparison {
        op: CmpOp,
        left: Box<GuardExpr>,
        right: Box<GuardExpr>,
    },
    /// `Not` has exactly one operand; `And`/`Or` have two or more.
    Boolean { op: BoolOp, operands: Vec<GuardExpr> },
}

impl GuardExpr {
    /// Identifiers referenced anywhere in the expression.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_identifiers(&mut out);
        out
    }

    fn collect_identifiers<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            GuardExpr::Identifier(name) => out.push(name),
            GuardExpr::Comparison { left, right, .. } => {
                left.collect_identifiers(out);
                right.collect_identifiers(out);
            }
            GuardExpr::Boolean { operands, .. } => {
                for operand in operands {
                    operand.collect_identifiers(out);
                }
            }
            GuardExpr::Literal(_) | GuardExpr::List(_) => {}
        }
    }
}

/// Canonical rendering: fully parenthesised, single spaces. Two guards that
/// differ only in whitespace or redundant parentheses render identically.
impl fmt::Display for GuardExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardExpr::Literal(value) => write!(f, "{}", value),
            GuardExpr::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            GuardExpr::Identifier(name) => f.write_str(name),
            GuardExpr::Comparison { op, left, right } => {
                write!(f, "({} {} {})", left, op.as_str(), right)
            }
            GuardExpr::Boolean {
                op: BoolOp::Not,
                operands,
            } => {
                f.write_str("(not")?;
                for operand in operands {
                    write!(f, " {}", operand)?;
                }
                f.write_str(")")
            }
            GuardExpr::Boolean { op, operands } => {
                f.write_str("(")?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", op.as_str())?;
                    }
                    write!(f, "{}", operand)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error("empty guard expression")]
    Empty,

    #[error("syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("disallowed construct at offset {offset}: {construct}")]
    Disallowed {
        offset: usize,
        construct: &'static str,
    },

    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("type error: {0}")]
    Type(String),
}

/// A parsed guard ready for evaluation, with its original source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledGuard {
    source: String,
    expr: GuardExpr,
}

impl CompiledGuard {
    pub fn new(source: impl Into<String>, expr: GuardExpr) -> Self {
        Self {
            source: source.into(),
            expr,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &GuardExpr {
        &self.expr
    }

    pub fn canonical(&self) -> String {
        self.expr.to_string()
    }

    pub fn evaluate(&self, attributes: &dyn AttributeSource) -> bool {
        self.expr.evaluate(attributes)
    }
}

//! Instruction records stored in the node table.
//!
//! A compiled program is a flat table of [`Node`]s. Nodes refer to each
//! other only through [`Address`]es, which are positions in that table.
//!
//! | kind | payload |
//! |------|---------|
//! | `fact` | argument template (variables numbered per fact) |
//! | `clause` | body addresses (facts and defs, in insertion order), functor |
//! | `def` | body address, head argument template, variable count |
//! | `call` | callee clause address, argument template, functor |
//! | `and` / `or` | two child addresses |
//! | `not` | one child address |
//! | `placeholder` | nothing yet; reserved by a forward reference |

use crate::ast::{Atom, Term};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable index of a node in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(usize);

impl Address {
    pub const fn new(index: usize) -> Self {
        Address(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Argument template stored in `fact`, `def` and `call` nodes.
///
/// Variables are replaced by their dense per-clause index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arg {
    Var(usize),
    Integer(i64),
    Compound { functor: String, args: Vec<Arg> },
}

impl Arg {
    /// Rebuild a term, turning each variable index into `var(index)`
    pub fn to_term(&self, var: &mut impl FnMut(usize) -> Term) -> Term {
        match self {
            Arg::Var(index) => var(*index),
            Arg::Integer(n) => Term::Integer(*n),
            Arg::Compound { functor, args } => Term::Compound(Atom::new(
                functor.clone(),
                args.iter().map(|a| a.to_term(var)).collect(),
            )),
        }
    }
}

/// One instruction record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Fact {
        args: Vec<Arg>,
    },
    Clause {
        bodies: Vec<Address>,
        functor: String,
    },
    Def {
        body: Address,
        head_args: Vec<Arg>,
        variable_count: usize,
    },
    Call {
        callee: Address,
        args: Vec<Arg>,
        functor: String,
    },
    And {
        children: (Address, Address),
    },
    Or {
        children: (Address, Address),
    },
    Not {
        child: Address,
    },
    Placeholder,
}

impl Node {
    /// An empty clause list for `functor`
    pub fn empty_clause(functor: impl Into<String>) -> Self {
        Node::Clause {
            bodies: Vec::new(),
            functor: functor.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Fact { .. } => "fact",
            Node::Clause { .. } => "clause",
            Node::Def { .. } => "def",
            Node::Call { .. } => "call",
            Node::And { .. } => "and",
            Node::Or { .. } => "or",
            Node::Not { .. } => "not",
            Node::Placeholder => "placeholder",
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Node::Placeholder)
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Arg]) -> fmt::Result {
    write!(f, "[")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{arg}")?;
    }
    write!(f, "]")
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Var(index) => write!(f, "#{index}"),
            Arg::Integer(n) => write!(f, "{n}"),
            Arg::Compound { functor, args } if args.is_empty() => write!(f, "{functor}"),
            Arg::Compound { functor, args } => {
                write!(f, "{functor}")?;
                write_args(f, args)
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Fact { args } => {
                write!(f, "fact ")?;
                write_args(f, args)
            }
            Node::Clause { bodies, functor } => {
                write!(f, "clause {functor} [")?;
                for (i, body) in bodies.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{body}")?;
                }
                write!(f, "]")
            }
            Node::Def {
                body,
                head_args,
                variable_count,
            } => {
                write!(f, "def body={body} head=")?;
                write_args(f, head_args)?;
                write!(f, " vars={variable_count}")
            }
            Node::Call {
                callee,
                args,
                functor,
            } => {
                write!(f, "call {functor} -> {callee} ")?;
                write_args(f, args)
            }
            Node::And { children: (l, r) } => write!(f, "and {l} {r}"),
            Node::Or { children: (l, r) } => write!(f, "or {l} {r}"),
            Node::Not { child } => write!(f, "not {child}"),
            Node::Placeholder => write!(f, "<empty>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_display() {
        let arg = Arg::Compound {
            functor: "s".to_string(),
            args: vec![
                Arg::Integer(0),
                Arg::Compound {
                    functor: "z".to_string(),
                    args: vec![],
                },
                Arg::Var(3),
            ],
        };
        assert_eq!(arg.to_string(), "s[0, z, #3]");
    }

    #[test]
    fn test_arg_to_term_names_variables() {
        let arg = Arg::Compound {
            functor: "f".to_string(),
            args: vec![Arg::Var(1), Arg::Integer(2), Arg::Var(0)],
        };
        let term = arg.to_term(&mut |i| Term::var(format!("V{i}")));
        assert_eq!(term.to_string(), "f(V1, 2, V0)");
    }

    #[test]
    fn test_node_display() {
        let call = Node::Call {
            callee: Address::new(0),
            args: vec![Arg::Var(0), Arg::Var(2)],
            functor: "parent".to_string(),
        };
        assert_eq!(call.to_string(), "call parent -> 0 [#0, #2]");
        assert_eq!(Node::Placeholder.to_string(), "<empty>");
        assert_eq!(
            Node::And {
                children: (Address::new(3), Address::new(4))
            }
            .to_string(),
            "and 3 4"
        );
    }

    #[test]
    fn test_node_serializes_with_kind_tag() {
        let node = Node::Not {
            child: Address::new(5),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json, serde_json::json!({"type": "not", "child": 5}));

        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
        assert_eq!(back.kind(), "not");
    }
}

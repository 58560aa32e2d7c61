//! Compiler: translates facts and clauses into node-table entries.
//!
//! Sub-formulas are compiled bottom-up, so every node only refers to
//! addresses that already exist, except `call` nodes, whose callee may be a
//! placeholder reserved through the predicate index.
//!
//! ## Example
//!
//! `grandparent(X, Z) :- parent(X, Y), parent(Y, Z).` compiles to
//!
//! ```text
//! 3: call parent -> 1 [#0, #1]
//! 4: call parent -> 1 [#1, #2]
//! 5: and 3 4
//! 6: def body=5 head=[#0, #2] vars=3
//! 7: clause grandparent [6]
//! ```

use crate::ast::{Atom, Formula, Signature};
use crate::error::{ClauseDbError, ClauseDbResult};
use crate::node::{Address, Node};
use crate::node_table::NodeTable;
use crate::predicate_index::PredicateIndex;
use crate::var_context::VarContext;

/// Borrowed view of a database's table and index for one submission
pub struct Compiler<'a> {
    table: &'a mut NodeTable,
    index: &'a mut PredicateIndex,
}

impl<'a> Compiler<'a> {
    pub fn new(table: &'a mut NodeTable, index: &'a mut PredicateIndex) -> Self {
        Compiler { table, index }
    }

    /// Add a fact (a clause with no body); returns the address of its
    /// predicate's clause node. Variables are numbered like a clause's.
    pub fn add_fact(&mut self, term: &Atom) -> ClauseDbResult<Address> {
        let args = VarContext::new().substitute_all(&term.args);

        let fact = self.table.append(Node::Fact { args });
        let clause = self.attach(&term.signature(), fact)?;
        tracing::debug!(signature = %term.signature(), %fact, %clause, "fact_added");
        Ok(clause)
    }

    /// Add `head :- body`; returns the address of its predicate's clause node
    pub fn add_clause(&mut self, head: &Atom, body: &Formula) -> ClauseDbResult<Address> {
        // Reject bad shapes before anything is appended.
        check_body(body)?;

        let mut vars = VarContext::new();
        let body_node = self.compile_body(body, &mut vars)?;
        let head_args = vars.substitute_all(&head.args);
        let variable_count = vars.drain().len();

        let def = self.table.append(Node::Def {
            body: body_node,
            head_args,
            variable_count,
        });
        let clause = self.attach(&head.signature(), def)?;
        tracing::debug!(
            signature = %head.signature(),
            %def,
            %clause,
            variable_count,
            "clause_added"
        );
        Ok(clause)
    }

    fn attach(&mut self, signature: &Signature, body: Address) -> ClauseDbResult<Address> {
        let clause = self.index.lookup_or_define(self.table, signature)?;
        self.table.push_body(clause, body)?;
        Ok(clause)
    }

    fn compile_body(&mut self, formula: &Formula, vars: &mut VarContext) -> ClauseDbResult<Address> {
        let node = match formula {
            Formula::Atom(atom) => {
                let args = vars.substitute_all(&atom.args);
                let callee = self.index.lookup_or_reserve(self.table, &atom.signature());
                Node::Call {
                    callee,
                    args,
                    functor: atom.functor.clone(),
                }
            }
            Formula::And(l, r) => {
                let l = self.compile_body(l, vars)?;
                let r = self.compile_body(r, vars)?;
                Node::And { children: (l, r) }
            }
            Formula::Or(l, r) => {
                let l = self.compile_body(l, vars)?;
                let r = self.compile_body(r, vars)?;
                Node::Or { children: (l, r) }
            }
            Formula::Not(child) => Node::Not {
                child: self.compile_body(child, vars)?,
            },
            Formula::Clause(clause) => return Err(clause_in_body(&clause.head)),
        };
        let address = self.table.append(node);
        tracing::trace!(%address, kind = formula.kind(), "body_node_compiled");
        Ok(address)
    }
}

fn check_body(formula: &Formula) -> ClauseDbResult<()> {
    match formula {
        Formula::Atom(_) => Ok(()),
        Formula::And(l, r) | Formula::Or(l, r) => {
            check_body(l)?;
            check_body(r)
        }
        Formula::Not(child) => check_body(child),
        Formula::Clause(clause) => Err(clause_in_body(&clause.head)),
    }
}

fn clause_in_body(head: &Atom) -> ClauseDbError {
    ClauseDbError::malformed(format!(
        "clause for {} found where a body formula was expected",
        head.signature()
    ))
}

//! Decompiler: rebuilds facts and clauses from node-table addresses.
//!
//! Variables are re-synthesized from their indices as `{prefix}{index}`
//! (`V0`, `V1`, ... by default), so a decompiled clause equals the original
//! up to a systematic renaming of variables.
//!
//! Negation is not decompiled: a `not` node fails with `UndefinedReference`
//! rather than being rebuilt approximately.

use crate::ast::{Atom, Clause, Formula, Term};
use crate::error::{ClauseDbError, ClauseDbResult};
use crate::node::{Address, Arg, Node};
use crate::node_table::NodeStore;

pub const DEFAULT_VAR_PREFIX: &str = "V";

/// Reads formulas back out of any [`NodeStore`]
pub struct Decompiler<'a, S: NodeStore + ?Sized> {
    store: &'a S,
    var_prefix: &'a str,
}

impl<'a, S: NodeStore + ?Sized> Clone for Decompiler<'a, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, S: NodeStore + ?Sized> Copy for Decompiler<'a, S> {}

impl<'a, S: NodeStore + ?Sized> Decompiler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self::with_var_prefix(store, DEFAULT_VAR_PREFIX)
    }

    pub fn with_var_prefix(store: &'a S, var_prefix: &'a str) -> Self {
        Decompiler { store, var_prefix }
    }

    /// Rebuild the fact, clause, call or connective at `address`.
    ///
    /// `fact` and `def` nodes do not store their functor; without `functor`
    /// it is taken from the clause node that lists `address` as a body.
    pub fn extract(&self, address: Address, functor: Option<&str>) -> ClauseDbResult<Formula> {
        self.extract_with(address, functor, None)
    }

    /// Every fact and clause in table order
    pub fn iter(&self) -> Clauses<'a, S> {
        Clauses {
            decompiler: *self,
            next_node: 0,
            current: None,
        }
    }

    /// Decompile every body of the clause node at `address`
    pub fn extract_all(&self, address: Address) -> ClauseDbResult<Vec<Formula>> {
        match self.store.get(address)? {
            Node::Clause { bodies, functor } => bodies
                .iter()
                .map(|body| self.extract(*body, Some(functor.as_str())))
                .collect(),
            Node::Placeholder => Err(ClauseDbError::undefined(
                address,
                "predicate is referenced but never defined",
            )),
            other => Err(ClauseDbError::undefined(
                address,
                format!("expected a clause node, found a {} node", other.kind()),
            )),
        }
    }

    fn var(&self, index: usize) -> Term {
        Term::var(format!("{}{index}", self.var_prefix))
    }

    fn extract_with(
        &self,
        address: Address,
        functor: Option<&str>,
        alphabet: Option<&[Term]>,
    ) -> ClauseDbResult<Formula> {
        match self.store.get(address)? {
            Node::Fact { args } => {
                let functor = self.functor_of(address, functor)?;
                // a fact's variables are its own: fresh {prefix}{i} names
                let args = self.instantiate(address, args, None)?;
                Ok(Formula::Atom(Atom::new(functor, args)))
            }
            Node::Def {
                body,
                head_args,
                variable_count,
            } => {
                let functor = self.functor_of(address, functor)?;
                let alphabet: Vec<Term> = (0..*variable_count).map(|i| self.var(i)).collect();
                let head_args = self.instantiate(address, head_args, Some(alphabet.as_slice()))?;
                let head = Atom::new(functor, head_args);
                let body = self.extract_with(*body, None, Some(alphabet.as_slice()))?;
                Ok(Formula::Clause(Box::new(Clause::new(head, body))))
            }
            Node::Call {
                callee,
                args,
                functor,
            } => {
                if self.store.get(*callee)?.is_placeholder() {
                    return Err(ClauseDbError::undefined(
                        *callee,
                        format!("{functor}/{} is called but never defined", args.len()),
                    ));
                }
                let args = self.instantiate(address, args, alphabet)?;
                Ok(Formula::Atom(Atom::new(functor.clone(), args)))
            }
            Node::And { children: (l, r) } => Ok(Formula::and(
                self.extract_with(*l, None, alphabet)?,
                self.extract_with(*r, None, alphabet)?,
            )),
            Node::Or { children: (l, r) } => Ok(Formula::or(
                self.extract_with(*l, None, alphabet)?,
                self.extract_with(*r, None, alphabet)?,
            )),
            Node::Not { .. } => Err(ClauseDbError::undefined(
                address,
                "negation cannot be decompiled",
            )),
            Node::Clause { .. } => Err(ClauseDbError::undefined(
                address,
                "clause node holds several definitions; extract its bodies instead",
            )),
            Node::Placeholder => Err(ClauseDbError::undefined(
                address,
                "placeholder for an undefined predicate",
            )),
        }
    }

    /// Terms for `args`; with an alphabet every index must fall inside it
    fn instantiate(
        &self,
        address: Address,
        args: &[Arg],
        alphabet: Option<&[Term]>,
    ) -> ClauseDbResult<Vec<Term>> {
        let mut missing = None;
        let terms: Vec<Term> = args
            .iter()
            .map(|arg| {
                arg.to_term(&mut |i| match alphabet {
                    None => self.var(i),
                    Some(names) => names.get(i).cloned().unwrap_or_else(|| {
                        missing.get_or_insert(i);
                        self.var(i)
                    }),
                })
            })
            .collect();
        match (missing, alphabet) {
            (Some(index), Some(names)) => Err(ClauseDbError::undefined(
                address,
                format!("variable #{index} outside the clause's {} variables", names.len()),
            )),
            _ => Ok(terms),
        }
    }

    fn functor_of<'f>(&self, address: Address, functor: Option<&'f str>) -> ClauseDbResult<&'f str>
    where
        'a: 'f,
    {
        if let Some(functor) = functor {
            return Ok(functor);
        }
        let store: &'a S = self.store;
        (0..store.len())
            .find_map(|i| match store.get(Address::new(i)) {
                Ok(Node::Clause { bodies, functor }) if bodies.contains(&address) => {
                    Some(functor.as_str())
                }
                _ => None,
            })
            .ok_or_else(|| ClauseDbError::undefined(address, "no clause node owns this definition"))
    }
}

/// Lazy walk over every clause node's bodies, in table then insertion order.
///
/// Calling [`Decompiler::iter`] again restarts the walk over the current table.
pub struct Clauses<'a, S: NodeStore + ?Sized> {
    decompiler: Decompiler<'a, S>,
    next_node: usize,
    current: Option<(&'a str, &'a [Address])>,
}

impl<'a, S: NodeStore + ?Sized> Iterator for Clauses<'a, S> {
    type Item = ClauseDbResult<Formula>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((functor, bodies)) = self.current {
                if let Some((first, rest)) = bodies.split_first() {
                    self.current = Some((functor, rest));
                    return Some(self.decompiler.extract(*first, Some(functor)));
                }
                self.current = None;
            }

            let store = self.decompiler.store;
            if self.next_node >= store.len() {
                return None;
            }
            let address = Address::new(self.next_node);
            self.next_node += 1;
            match store.get(address) {
                Ok(Node::Clause { bodies, functor }) => {
                    self.current = Some((functor.as_str(), bodies.as_slice()));
                }
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_table::NodeTable;

    fn sample_table() -> NodeTable {
        let mut table = NodeTable::new();
        // parent(tom, bob).
        table.append(Node::Fact {
            args: vec![
                Arg::Compound { functor: "tom".into(), args: vec![] },
                Arg::Compound { functor: "bob".into(), args: vec![] },
            ],
        });
        table.append(Node::Clause {
            bodies: vec![Address::new(0)],
            functor: "parent".into(),
        });
        // anc(X, Y) :- parent(X, Y).
        table.append(Node::Call {
            callee: Address::new(1),
            args: vec![Arg::Var(0), Arg::Var(1)],
            functor: "parent".into(),
        });
        table.append(Node::Def {
            body: Address::new(2),
            head_args: vec![Arg::Var(0), Arg::Var(1)],
            variable_count: 2,
        });
        table.append(Node::Clause {
            bodies: vec![Address::new(3)],
            functor: "anc".into(),
        });
        table
    }

    #[test]
    fn test_extract_fact_resolves_owner_functor() {
        let table = sample_table();
        let decompiler = Decompiler::new(&table);
        let fact = decompiler.extract(Address::new(0), None).unwrap();
        assert_eq!(fact.to_string(), "parent(tom, bob)");
        let renamed = decompiler.extract(Address::new(0), Some("mother")).unwrap();
        assert_eq!(renamed.to_string(), "mother(tom, bob)");
    }

    #[test]
    fn test_extract_fact_with_variables() {
        let mut table = sample_table();
        let fact = table.append(Node::Fact {
            args: vec![Arg::Var(0), Arg::Integer(1), Arg::Var(0)],
        });
        table.append(Node::Clause {
            bodies: vec![fact],
            functor: "same".into(),
        });
        let decompiler = Decompiler::with_var_prefix(&table, "_G");
        let extracted = decompiler.extract(fact, None).unwrap();
        assert_eq!(extracted.to_string(), "same(_G0, 1, _G0)");
    }

    #[test]
    fn test_extract_def() {
        let table = sample_table();
        let decompiler = Decompiler::new(&table);
        let clause = decompiler.extract(Address::new(3), None).unwrap();
        assert_eq!(clause.to_string(), "anc(V0, V1) :- parent(V0, V1)");
    }

    #[test]
    fn test_extract_call_standalone() {
        let table = sample_table();
        let decompiler = Decompiler::with_var_prefix(&table, "_");
        let call = decompiler.extract(Address::new(2), None).unwrap();
        assert_eq!(call.to_string(), "parent(_0, _1)");
    }

    #[test]
    fn test_extract_clause_node_is_rejected() {
        let table = sample_table();
        let decompiler = Decompiler::new(&table);
        let err = decompiler.extract(Address::new(1), None).unwrap_err();
        assert!(matches!(err, ClauseDbError::UndefinedReference { .. }));
        assert_eq!(decompiler.extract_all(Address::new(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_extract_not_is_unsupported() {
        let mut table = sample_table();
        let not = table.append(Node::Not {
            child: Address::new(2),
        });
        let err = Decompiler::new(&table).extract(not, None).unwrap_err();
        assert_eq!(
            err,
            ClauseDbError::UndefinedReference {
                address: not,
                reason: "negation cannot be decompiled".to_string()
            }
        );
    }

    #[test]
    fn test_def_with_variable_outside_alphabet() {
        let mut table = sample_table();
        let def = table.append(Node::Def {
            body: Address::new(2),
            head_args: vec![Arg::Var(5)],
            variable_count: 2,
        });
        let err = Decompiler::new(&table).extract(def, Some("bad")).unwrap_err();
        assert!(matches!(err, ClauseDbError::UndefinedReference { address, .. } if address == def));
    }

    #[test]
    fn test_iter_is_restartable() {
        let table = sample_table();
        let decompiler = Decompiler::new(&table);
        let first: Vec<String> = decompiler.iter().map(|f| f.unwrap().to_string()).collect();
        let second: Vec<String> = decompiler.iter().map(|f| f.unwrap().to_string()).collect();
        assert_eq!(first, vec!["parent(tom, bob)", "anc(V0, V1) :- parent(V0, V1)"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_out_of_range() {
        let table = NodeTable::new();
        let err = Decompiler::new(&table).extract(Address::new(3), None).unwrap_err();
        assert!(matches!(err, ClauseDbError::OutOfRange { .. }));
    }
}

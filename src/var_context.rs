//! Variable numbering for one clause compilation.
//!
//! Variables are numbered 0, 1, 2, ... in first-occurrence order. The context
//! also records which indices were touched since the last [`VarContext::drain`].
//! A context belongs to exactly one top-level compilation and is dropped
//! afterwards.

use crate::ast::Term;
use crate::node::Arg;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct VarContext {
    indices: HashMap<String, usize>,
    touched: Vec<usize>,
    touched_set: HashSet<usize>,
}

impl VarContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index for `name`, allocating the next one on first occurrence
    pub fn index_of(&mut self, name: &str) -> usize {
        let next = self.indices.len();
        let index = *self.indices.entry(name.to_string()).or_insert(next);
        if self.touched_set.insert(index) {
            self.touched.push(index);
        }
        index
    }

    /// Replace every variable in `term` by its index
    pub fn substitute(&mut self, term: &Term) -> Arg {
        match term {
            Term::Variable(name) => Arg::Var(self.index_of(name)),
            Term::Integer(n) => Arg::Integer(*n),
            Term::Compound(atom) => Arg::Compound {
                functor: atom.functor.clone(),
                args: self.substitute_all(&atom.args),
            },
        }
    }

    pub fn substitute_all(&mut self, terms: &[Term]) -> Vec<Arg> {
        terms.iter().map(|t| self.substitute(t)).collect()
    }

    /// Take the indices touched since the last drain, in first-touch order,
    /// and reset the record
    pub fn drain(&mut self) -> Vec<usize> {
        self.touched_set.clear();
        std::mem::take(&mut self.touched)
    }

    /// Number of distinct variables numbered so far
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Atom;

    #[test]
    fn test_first_occurrence_numbering() {
        let mut vars = VarContext::new();
        assert_eq!(vars.index_of("Y"), 0);
        assert_eq!(vars.index_of("X"), 1);
        assert_eq!(vars.index_of("Y"), 0);
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_substitute_nested() {
        let mut vars = VarContext::new();
        let term = Term::Compound(Atom::new(
            "f",
            vec![Term::var("A"), Term::Integer(3), Term::var("A")],
        ));
        assert_eq!(
            vars.substitute(&term),
            Arg::Compound {
                functor: "f".to_string(),
                args: vec![Arg::Var(0), Arg::Integer(3), Arg::Var(0)],
            }
        );
    }

    #[test]
    fn test_drain_takes_and_resets() {
        let mut vars = VarContext::new();
        vars.substitute_all(&[Term::var("A"), Term::var("B")]);
        assert_eq!(vars.drain(), vec![0, 1]);
        assert!(vars.drain().is_empty());

        // numbering survives a drain, only the touch record is reset
        vars.substitute_all(&[Term::var("B"), Term::var("C")]);
        assert_eq!(vars.drain(), vec![1, 2]);
        assert_eq!(vars.len(), 3);
    }
}

//! Builder Patterns for AST Construction
//!
//! Provides fluent APIs for constructing AST nodes, particularly useful for tests.
//!
//! ## Example
//!
//! ```rust
//! use clausedb::ast::builders::{AtomBuilder, ClauseBuilder};
//!
//! // Build a fact: parent(tom, bob)
//! let fact = AtomBuilder::new("parent")
//!     .constant("tom")
//!     .constant("bob")
//!     .build();
//!
//! // Build a clause: grandparent(X, Z) :- parent(X, Y), parent(Y, Z).
//! // Without any body atoms the builder yields a plain fact instead.
//! let clause = ClauseBuilder::new("grandparent")
//!     .head_vars(["X", "Z"])
//!     .body_atom("parent", ["X", "Y"])
//!     .body_atom("parent", ["Y", "Z"])
//!     .build();
//!
//! assert_eq!(fact.to_string(), "parent(tom, bob)");
//! assert_eq!(
//!     clause.to_string(),
//!     "grandparent(X, Z) :- parent(X, Y), parent(Y, Z)"
//! );
//! ```

use super::{Atom, Clause, Formula, Term};

// AtomBuilder
/// Builder for constructing Atom instances
#[derive(Debug, Clone)]
pub struct AtomBuilder {
    functor: String,
    args: Vec<Term>,
}

impl AtomBuilder {
    pub fn new(functor: impl Into<String>) -> Self {
        AtomBuilder {
            functor: functor.into(),
            args: Vec::new(),
        }
    }

    /// Add a variable argument
    pub fn var(mut self, name: impl Into<String>) -> Self {
        self.args.push(Term::var(name));
        self
    }

    /// Add a symbolic constant argument
    pub fn constant(mut self, name: impl Into<String>) -> Self {
        self.args.push(Term::constant(name));
        self
    }

    /// Add an integer argument
    pub fn int(mut self, value: i64) -> Self {
        self.args.push(Term::Integer(value));
        self
    }

    /// Add an arbitrary term argument
    pub fn arg(mut self, term: impl Into<Term>) -> Self {
        self.args.push(term.into());
        self
    }

    pub fn build(self) -> Atom {
        Atom::new(self.functor, self.args)
    }
}

// ClauseBuilder
/// Builder for facts and for clauses whose body is a conjunction of atoms.
///
/// Arguments given as strings are read Prolog-style: a leading uppercase
/// letter or underscore makes a variable, anything else a constant.
#[derive(Debug, Clone)]
pub struct ClauseBuilder {
    head: AtomBuilder,
    body: Vec<Formula>,
}

impl ClauseBuilder {
    pub fn new(functor: impl Into<String>) -> Self {
        ClauseBuilder {
            head: AtomBuilder::new(functor),
            body: Vec::new(),
        }
    }

    pub fn head_vars<I, S>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for v in vars {
            self.head = self.head.var(v);
        }
        self
    }

    pub fn head_arg(mut self, term: impl Into<Term>) -> Self {
        self.head = self.head.arg(term);
        self
    }

    /// Conjoin `functor(args...)` to the body
    pub fn body_atom<I, S>(mut self, functor: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args = args.into_iter().map(|a| term_from_str(a.as_ref())).collect();
        self.body.push(Formula::Atom(Atom::new(functor, args)));
        self
    }

    /// Conjoin an arbitrary formula to the body
    pub fn body(mut self, formula: impl Into<Formula>) -> Self {
        self.body.push(formula.into());
        self
    }

    /// Build the formula: a fact when no body was given, a clause otherwise
    pub fn build(self) -> Formula {
        let head = self.head.build();
        match Formula::conjunction(self.body) {
            Some(body) => Formula::Clause(Box::new(Clause::new(head, body))),
            None => Formula::Atom(head),
        }
    }
}

fn term_from_str(s: &str) -> Term {
    if let Ok(n) = s.parse::<i64>() {
        return Term::Integer(n);
    }
    match s.chars().next() {
        Some(c) if c.is_uppercase() || c == '_' => Term::var(s),
        _ => Term::constant(s),
    }
}

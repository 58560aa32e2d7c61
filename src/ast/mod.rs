//! # Logic Program AST - Terms, Formulas and Clauses
//!
//! The term and formula types consumed by the clause compiler and produced
//! by the decompiler.
//!
//! ## Builders
//!
//! For programmatic construction of AST nodes, see the [`builders`] module
//! which provides fluent APIs like `AtomBuilder` and `ClauseBuilder`.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

pub mod builders;

// ============================================================================
// Core AST Types
// ============================================================================

/// A variable, integer or compound term
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Variable(String), // e.g., "X", "Y"
    Integer(i64),     // e.g., 0, 42
    /// Functor applied to arguments. A zero-arity compound is a symbolic
    /// constant such as `tom`.
    Compound(Atom),
}

impl Term {
    /// Create a variable term
    pub fn var(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    /// Create a symbolic constant (zero-arity compound)
    pub fn constant(name: impl Into<String>) -> Self {
        Term::Compound(Atom::new(name, Vec::new()))
    }

    /// Check if this term is a variable
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Get variable name if this is a variable
    pub fn as_variable(&self) -> Option<&str> {
        if let Term::Variable(name) = self {
            Some(name)
        } else {
            None
        }
    }

    /// True when no variable occurs anywhere inside the term
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Integer(_) => true,
            Term::Compound(atom) => atom.is_ground(),
        }
    }

    /// Substitute variables bound in `env`; unbound variables are kept.
    pub fn apply(&self, env: &HashMap<String, Term>) -> Term {
        match self {
            Term::Variable(name) => env.get(name).cloned().unwrap_or_else(|| self.clone()),
            Term::Integer(_) => self.clone(),
            Term::Compound(atom) => Term::Compound(atom.apply(env)),
        }
    }

    fn collect_variables<'a>(&'a self, seen: &mut HashSet<&'a str>, out: &mut Vec<&'a str>) {
        match self {
            Term::Variable(name) => {
                if seen.insert(name) {
                    out.push(name);
                }
            }
            Term::Integer(_) => {}
            Term::Compound(atom) => {
                for arg in &atom.args {
                    arg.collect_variables(seen, out);
                }
            }
        }
    }
}

impl From<Atom> for Term {
    fn from(atom: Atom) -> Self {
        Term::Compound(atom)
    }
}

/// A functor applied to an argument list, e.g. `parent(tom, bob)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Atom {
    pub functor: String,
    pub args: Vec<Term>,
}

impl Atom {
    /// Create a new atom
    pub fn new(functor: impl Into<String>, args: Vec<Term>) -> Self {
        Atom {
            functor: functor.into(),
            args,
        }
    }

    /// Get the arity (number of arguments) of this atom
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// The predicate signature `functor/arity`
    pub fn signature(&self) -> Signature {
        Signature::new(self.functor.clone(), self.arity())
    }

    pub fn is_ground(&self) -> bool {
        self.args.iter().all(Term::is_ground)
    }

    /// Variables in first-occurrence order, without duplicates
    pub fn variables(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for arg in &self.args {
            arg.collect_variables(&mut seen, &mut out);
        }
        out
    }

    /// Substitute variables bound in `env` throughout the arguments
    pub fn apply(&self, env: &HashMap<String, Term>) -> Atom {
        Atom {
            functor: self.functor.clone(),
            args: self.args.iter().map(|t| t.apply(env)).collect(),
        }
    }
}

/// A clause: head atom plus body formula
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clause {
    pub head: Atom,
    pub body: Formula,
}

impl Clause {
    pub fn new(head: Atom, body: impl Into<Formula>) -> Self {
        Clause {
            head,
            body: body.into(),
        }
    }
}

/// Formula combinators over atoms
///
/// `Clause` is included so that a whole program can be expressed as a list of
/// formulas; it is only legal at the top level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formula {
    Atom(Atom),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Not(Box<Formula>),
    Clause(Box<Clause>),
}

impl Formula {
    pub fn and(left: impl Into<Formula>, right: impl Into<Formula>) -> Self {
        Formula::And(Box::new(left.into()), Box::new(right.into()))
    }

    pub fn or(left: impl Into<Formula>, right: impl Into<Formula>) -> Self {
        Formula::Or(Box::new(left.into()), Box::new(right.into()))
    }

    pub fn not(child: impl Into<Formula>) -> Self {
        Formula::Not(Box::new(child.into()))
    }

    /// Right-nested conjunction of `parts`; `None` when empty
    pub fn conjunction<I>(parts: I) -> Option<Formula>
    where
        I: IntoIterator,
        I::Item: Into<Formula>,
        I::IntoIter: DoubleEndedIterator,
    {
        parts
            .into_iter()
            .rev()
            .map(Into::<Formula>::into)
            .reduce(|acc, f| Formula::and(f, acc))
    }

    /// Short name of the formula shape, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Formula::Atom(_) => "atom",
            Formula::And(_, _) => "and",
            Formula::Or(_, _) => "or",
            Formula::Not(_) => "not",
            Formula::Clause(_) => "clause",
        }
    }

    /// Rename every variable to `_G{n}` in first-occurrence order.
    ///
    /// Two formulas are variants of each other (equal up to a systematic
    /// variable renaming) exactly when their canonical forms are equal.
    pub fn canonical(&self) -> Formula {
        let mut names: HashMap<String, Term> = HashMap::new();
        self.canonicalize(&mut names)
    }

    /// True if `self` equals `other` up to a systematic renaming of variables
    pub fn is_variant_of(&self, other: &Formula) -> bool {
        self.canonical() == other.canonical()
    }

    fn canonicalize(&self, names: &mut HashMap<String, Term>) -> Formula {
        match self {
            Formula::Atom(atom) => Formula::Atom(canonical_atom(atom, names)),
            Formula::And(l, r) => {
                let l = l.canonicalize(names);
                Formula::and(l, r.canonicalize(names))
            }
            Formula::Or(l, r) => {
                let l = l.canonicalize(names);
                Formula::or(l, r.canonicalize(names))
            }
            Formula::Not(f) => Formula::not(f.canonicalize(names)),
            Formula::Clause(clause) => {
                let head = canonical_atom(&clause.head, names);
                Formula::Clause(Box::new(Clause::new(head, clause.body.canonicalize(names))))
            }
        }
    }
}

fn canonical_atom(atom: &Atom, names: &mut HashMap<String, Term>) -> Atom {
    for var in atom.variables() {
        if !names.contains_key(var) {
            let fresh = Term::var(format!("_G{}", names.len()));
            names.insert(var.to_string(), fresh);
        }
    }
    atom.apply(names)
}

impl From<Atom> for Formula {
    fn from(atom: Atom) -> Self {
        Formula::Atom(atom)
    }
}

impl From<Clause> for Formula {
    fn from(clause: Clause) -> Self {
        Formula::Clause(Box::new(clause))
    }
}

/// Predicate signature: functor name paired with argument count
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Signature {
    pub functor: String,
    pub arity: usize,
}

impl Signature {
    pub fn new(functor: impl Into<String>, arity: usize) -> Self {
        Signature {
            functor: functor.into(),
            arity,
        }
    }
}

/// Error parsing a `functor/arity` signature string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid predicate signature '{input}': expected functor/arity")]
pub struct ParseSignatureError {
    pub input: String,
}

impl FromStr for Signature {
    type Err = ParseSignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSignatureError {
            input: s.to_string(),
        };
        let (functor, arity) = s.rsplit_once('/').ok_or_else(err)?;
        let functor = functor.trim();
        if functor.is_empty() {
            return Err(err());
        }
        let arity = arity.trim().parse().map_err(|_| err())?;
        Ok(Signature::new(functor, arity))
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.functor, self.arity)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(name) => write!(f, "{name}"),
            Term::Integer(n) => write!(f, "{n}"),
            Term::Compound(atom) => write!(f, "{atom}"),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.functor)?;
        if self.args.is_empty() {
            return Ok(());
        }
        write!(f, "(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :- {}", self.head, self.body)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Atom(atom) => write!(f, "{atom}"),
            Formula::And(l, r) => write!(f, "{l}, {r}"),
            Formula::Or(l, r) => write!(f, "({l}; {r})"),
            Formula::Not(child) => match child.as_ref() {
                Formula::Atom(atom) => write!(f, "\\+ {atom}"),
                other => write!(f, "\\+ ({other})"),
            },
            Formula::Clause(clause) => write!(f, "{clause}"),
        }
    }
}

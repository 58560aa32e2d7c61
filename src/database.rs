//! Clause database: the compiled program.
//!
//! Owns the node table and the predicate index. Addresses it returns are only
//! meaningful for the instance that produced them.
//!
//! ```rust
//! use clausedb::ast::builders::{AtomBuilder, ClauseBuilder};
//! use clausedb::{ClauseDb, Signature};
//!
//! let mut db = ClauseDb::new();
//! db.add_fact(&AtomBuilder::new("parent").constant("tom").constant("bob").build())?;
//! let rule = ClauseBuilder::new("grandparent")
//!     .head_vars(["X", "Z"])
//!     .body_atom("parent", ["X", "Y"])
//!     .body_atom("parent", ["Y", "Z"])
//!     .build();
//! db.add(&rule)?;
//!
//! assert!(db.find(&Signature::new("grandparent", 2)).is_some());
//! let listing: Vec<String> = db
//!     .iter()
//!     .map(|f| f.map(|f| f.to_string()))
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(
//!     listing,
//!     vec![
//!         "parent(tom, bob)",
//!         "grandparent(V0, V2) :- parent(V0, V1), parent(V1, V2)",
//!     ]
//! );
//! # Ok::<(), clausedb::ClauseDbError>(())
//! ```

use crate::ast::{Atom, Formula, Signature};
use crate::compiler::Compiler;
use crate::config::CompilerConfig;
use crate::decompiler::{Clauses, Decompiler};
use crate::error::{ClauseDbError, ClauseDbResult};
use crate::node::{Address, Node};
use crate::node_table::{NodeStore, NodeTable};
use crate::predicate_index::PredicateIndex;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A compiled logic program
#[derive(Debug, Clone)]
pub struct ClauseDb {
    table: NodeTable,
    index: PredicateIndex,
    var_prefix: String,
}

impl ClauseDb {
    pub fn new() -> Self {
        Self::with_config(&CompilerConfig::default())
    }

    pub fn with_config(config: &CompilerConfig) -> Self {
        ClauseDb {
            table: NodeTable::with_capacity(config.initial_capacity),
            index: PredicateIndex::new(),
            var_prefix: config.var_prefix.clone(),
        }
    }

    fn compiler(&mut self) -> Compiler<'_> {
        Compiler::new(&mut self.table, &mut self.index)
    }

    /// Add a fact; returns its predicate's clause-node address
    pub fn add_fact(&mut self, term: &Atom) -> ClauseDbResult<Address> {
        self.compiler().add_fact(term)
    }

    /// Add `head :- body`; returns its predicate's clause-node address
    pub fn add_clause(&mut self, head: &Atom, body: &Formula) -> ClauseDbResult<Address> {
        self.compiler().add_clause(head, body)
    }

    /// Add a top-level formula: an atom is a fact, a clause is a clause
    pub fn add(&mut self, formula: &Formula) -> ClauseDbResult<Address> {
        match formula {
            Formula::Atom(atom) => self.add_fact(atom),
            Formula::Clause(clause) => self.add_clause(&clause.head, &clause.body),
            other => Err(ClauseDbError::malformed(format!(
                "expected a fact or a clause at top level, found {} formula",
                other.kind()
            ))),
        }
    }

    /// Add formulas in order, stopping at the first failure
    pub fn add_program<'f, I>(&mut self, program: I) -> ClauseDbResult<Vec<Address>>
    where
        I: IntoIterator<Item = &'f Formula>,
    {
        program.into_iter().map(|f| self.add(f)).collect()
    }

    /// Clause-node (or reserved) address for `signature`
    pub fn find(&self, signature: &Signature) -> Option<Address> {
        self.index.lookup(signature)
    }

    /// True once at least one fact or clause was added for `signature`
    pub fn is_defined(&self, signature: &Signature) -> bool {
        self.find(signature)
            .and_then(|a| self.table.get(a).ok())
            .is_some_and(|node| matches!(node, Node::Clause { .. }))
    }

    pub fn get_node(&self, address: Address) -> ClauseDbResult<&Node> {
        self.table.get(address)
    }

    /// Decompiler over this database's table
    pub fn decompiler(&self) -> Decompiler<'_, NodeTable> {
        Decompiler::with_var_prefix(&self.table, &self.var_prefix)
    }

    /// Rebuild the fact, clause or body formula at `address`
    pub fn extract(&self, address: Address, functor: Option<&str>) -> ClauseDbResult<Formula> {
        self.decompiler().extract(address, functor)
    }

    /// Every fact and clause, in table order then insertion order
    pub fn iter(&self) -> Clauses<'_, NodeTable> {
        self.decompiler().iter()
    }

    /// All definitions of one predicate, in insertion order
    pub fn definitions(&self, signature: &Signature) -> ClauseDbResult<Vec<Formula>> {
        match self.find(signature) {
            Some(address) if self.is_defined(signature) => {
                self.decompiler().extract_all(address)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Known signatures (defined or only referenced) in address order
    pub fn predicates(&self) -> Vec<(Signature, Address)> {
        self.index
            .signatures()
            .into_iter()
            .map(|(s, a)| (s.clone(), a))
            .collect()
    }

    /// `(address, node)` pairs in table order
    pub fn nodes(&self) -> impl Iterator<Item = (Address, &Node)> + '_ {
        self.table.iter()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for ClauseDb {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a ClauseDb {
    type Item = ClauseDbResult<Formula>;
    type IntoIter = Clauses<'a, NodeTable>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ClauseDb {
    /// One `address: node` line per entry, then the signature index
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (address, node) in self.table.iter() {
            writeln!(f, "{address}: {node}")?;
        }
        let heads: Vec<String> = self
            .index
            .signatures()
            .into_iter()
            .map(|(s, a)| format!("{s} => {a}"))
            .collect();
        write!(f, "{{{}}}", heads.join(", "))
    }
}

impl Serialize for ClauseDb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let heads: BTreeMap<String, Address> = self
            .index
            .signatures()
            .into_iter()
            .map(|(s, a)| (s.to_string(), a))
            .collect();
        let mut state = serializer.serialize_struct("ClauseDb", 2)?;
        state.serialize_field("nodes", &self.table)?;
        state.serialize_field("heads", &heads)?;
        state.end()
    }
}

//! Thread-safe wrapper around [`ClauseDb`].
//!
//! Uses `parking_lot::RwLock` (no poisoning). Every write holds the write lock
//! for the whole submission, so placeholder reservation and promotion happen
//! in one critical section and readers only ever see a signature as either
//! undefined or defined.

use crate::ast::{Atom, Formula, Signature};
use crate::database::ClauseDb;
use crate::error::ClauseDbResult;
use crate::node::{Address, Node};
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable handle to one shared clause database
#[derive(Debug, Clone, Default)]
pub struct SharedClauseDb {
    db: Arc<RwLock<ClauseDb>>,
}

impl SharedClauseDb {
    pub fn new(db: ClauseDb) -> Self {
        SharedClauseDb {
            db: Arc::new(RwLock::new(db)),
        }
    }

    pub fn add_fact(&self, term: &Atom) -> ClauseDbResult<Address> {
        self.db.write().add_fact(term)
    }

    pub fn add_clause(&self, head: &Atom, body: &Formula) -> ClauseDbResult<Address> {
        self.db.write().add_clause(head, body)
    }

    pub fn add(&self, formula: &Formula) -> ClauseDbResult<Address> {
        self.db.write().add(formula)
    }

    pub fn find(&self, signature: &Signature) -> Option<Address> {
        self.db.read().find(signature)
    }

    /// Copy of the node at `address`
    pub fn get_node(&self, address: Address) -> ClauseDbResult<Node> {
        self.db.read().get_node(address).cloned()
    }

    pub fn extract(&self, address: Address, functor: Option<&str>) -> ClauseDbResult<Formula> {
        self.db.read().extract(address, functor)
    }

    pub fn definitions(&self, signature: &Signature) -> ClauseDbResult<Vec<Formula>> {
        self.db.read().definitions(signature)
    }

    /// Decompile the whole database under a single read lock
    pub fn snapshot(&self) -> ClauseDbResult<Vec<Formula>> {
        self.db.read().iter().collect()
    }

    pub fn len(&self) -> usize {
        self.db.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.read().is_empty()
    }

    /// Read access to the underlying database.
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, ClauseDb> {
        self.db.read()
    }
}

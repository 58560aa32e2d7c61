//! Predicate Index: signature to clause-node address, with forward declaration.
//!
//! A signature referenced before it is defined gets a placeholder slot, so any
//! number of `call` nodes can point at it. Defining the predicate later
//! promotes that same slot to a `clause` node; the address never changes.
//!
//! Both [`PredicateIndex::lookup_or_reserve`] and
//! [`PredicateIndex::lookup_or_define`] take the table and the index together
//! under one `&mut` borrow, so the check and the update cannot interleave
//! with another writer.

use crate::ast::Signature;
use crate::error::ClauseDbResult;
use crate::node::{Address, Node};
use crate::node_table::{NodeStore, NodeTable};
use std::collections::HashMap;

/// Mapping from predicate signature to its clause-node address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredicateIndex {
    heads: HashMap<Signature, Address>,
}

impl PredicateIndex {
    pub fn new() -> Self {
        PredicateIndex {
            heads: HashMap::new(),
        }
    }

    /// Address for `signature`, never creating anything
    pub fn lookup(&self, signature: &Signature) -> Option<Address> {
        self.heads.get(signature).copied()
    }

    /// Address for `signature`, reserving a placeholder if it is unknown
    pub fn lookup_or_reserve(&mut self, table: &mut NodeTable, signature: &Signature) -> Address {
        if let Some(address) = self.lookup(signature) {
            return address;
        }
        let address = table.append(Node::Placeholder);
        tracing::trace!(%signature, %address, "predicate_reserved");
        self.heads.insert(signature.clone(), address);
        address
    }

    /// Address of the `clause` node for `signature`, creating it or promoting
    /// its placeholder as needed
    pub fn lookup_or_define(
        &mut self,
        table: &mut NodeTable,
        signature: &Signature,
    ) -> ClauseDbResult<Address> {
        match self.lookup(signature) {
            Some(address) => {
                if table.get(address)?.is_placeholder() {
                    table.overwrite(address, Node::empty_clause(signature.functor.clone()))?;
                    tracing::debug!(%signature, %address, "predicate_promoted");
                }
                Ok(address)
            }
            None => {
                let address = table.append(Node::empty_clause(signature.functor.clone()));
                tracing::trace!(%signature, %address, "predicate_defined");
                self.heads.insert(signature.clone(), address);
                Ok(address)
            }
        }
    }

    /// Known signatures ordered by address
    pub fn signatures(&self) -> Vec<(&Signature, Address)> {
        let mut entries: Vec<_> = self.heads.iter().map(|(s, a)| (s, *a)).collect();
        entries.sort_by_key(|(_, a)| *a);
        entries
    }

    pub fn len(&self) -> usize {
        self.heads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }
}

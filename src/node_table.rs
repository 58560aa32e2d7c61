//! Node Table: append-only, address-stable storage for instruction records.
//!
//! Addresses are assigned once at append time and never reused or moved.
//! The only in-place mutation is the upgrade of a placeholder into a
//! `clause` node, and the growth of a `clause` node's body list.

use crate::error::{ClauseDbError, ClauseDbResult};
use crate::node::{Address, Node};
use serde::{Deserialize, Serialize};

/// Read access to a sequence of nodes.
///
/// Decompilation and iteration only need this, so a backing store other
/// than the in-memory [`NodeTable`] can serve the same queries.
pub trait NodeStore {
    /// Number of nodes ever appended
    fn len(&self) -> usize;

    /// The node at `address`, or `OutOfRange`
    fn get(&self, address: Address) -> ClauseDbResult<&Node>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory node table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeTable {
    nodes: Vec<Node>,
}

impl NodeTable {
    pub fn new() -> Self {
        NodeTable { nodes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        NodeTable {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Append a node and return its new address
    pub fn append(&mut self, node: Node) -> Address {
        let address = Address::new(self.nodes.len());
        self.nodes.push(node);
        address
    }

    /// Replace the record at an existing address.
    ///
    /// Only a placeholder may be overwritten, and only by a `clause` node.
    pub(crate) fn overwrite(&mut self, address: Address, node: Node) -> ClauseDbResult<()> {
        let len = self.nodes.len();
        let slot = self
            .nodes
            .get_mut(address.index())
            .ok_or(ClauseDbError::OutOfRange { address, len })?;
        if !slot.is_placeholder() || !matches!(node, Node::Clause { .. }) {
            return Err(ClauseDbError::malformed(format!(
                "cannot overwrite {} node at {address} with {} node",
                slot.kind(),
                node.kind()
            )));
        }
        *slot = node;
        Ok(())
    }

    /// Append `body` to the body list of the `clause` node at `address`
    pub(crate) fn push_body(&mut self, address: Address, body: Address) -> ClauseDbResult<()> {
        let len = self.nodes.len();
        match self.nodes.get_mut(address.index()) {
            Some(Node::Clause { bodies, .. }) => {
                bodies.push(body);
                Ok(())
            }
            Some(other) => Err(ClauseDbError::malformed(format!(
                "node {address} is a {} node, not a clause node",
                other.kind()
            ))),
            None => Err(ClauseDbError::OutOfRange { address, len }),
        }
    }

    /// Iterate `(address, node)` pairs in table order
    pub fn iter(&self) -> impl Iterator<Item = (Address, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (Address::new(i), node))
    }
}

impl NodeStore for NodeTable {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn get(&self, address: Address) -> ClauseDbResult<&Node> {
        self.nodes
            .get(address.index())
            .ok_or(ClauseDbError::OutOfRange {
                address,
                len: self.nodes.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Arg;

    #[test]
    fn test_append_assigns_sequential_addresses() {
        let mut table = NodeTable::new();
        assert!(table.is_empty());
        let a = table.append(Node::Placeholder);
        let b = table.append(Node::Fact { args: vec![] });
        assert_eq!(a, Address::new(0));
        assert_eq!(b, Address::new(1));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_get_out_of_range() {
        let table = NodeTable::new();
        assert_eq!(
            table.get(Address::new(0)),
            Err(ClauseDbError::OutOfRange {
                address: Address::new(0),
                len: 0
            })
        );
    }

    #[test]
    fn test_overwrite_placeholder_keeps_address() {
        let mut table = NodeTable::new();
        let addr = table.append(Node::Placeholder);
        table.overwrite(addr, Node::empty_clause("p")).unwrap();
        assert_eq!(table.get(addr).unwrap(), &Node::empty_clause("p"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_overwrite_rejects_defined_slot() {
        let mut table = NodeTable::new();
        let addr = table.append(Node::Fact {
            args: vec![Arg::Integer(1)],
        });
        let err = table.overwrite(addr, Node::empty_clause("p")).unwrap_err();
        assert!(matches!(err, ClauseDbError::MalformedStructure { .. }));
    }

    #[test]
    fn test_push_body() {
        let mut table = NodeTable::new();
        let clause = table.append(Node::empty_clause("p"));
        let fact = table.append(Node::Fact { args: vec![] });
        table.push_body(clause, fact).unwrap();
        assert_eq!(
            table.get(clause).unwrap(),
            &Node::Clause {
                bodies: vec![fact],
                functor: "p".to_string()
            }
        );
        assert!(table.push_body(fact, clause).is_err());
    }
}

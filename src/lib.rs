//! # ClauseDB - Compiled Clause Database
//!
//! Compiles a logic program (facts and clauses built from terms,
//! conjunction, disjunction and negation) into a flat, address-stable
//! instruction graph that a resolution engine can walk, and decompiles that
//! graph back into clauses.
//!
//! ## Pipeline Architecture
//!
//! ```text
//! Fact / Clause (ast)
//!     ↓
//! [Compiler]          → nodes appended bottom-up (VarContext numbers variables)
//!     ↓
//! [Predicate Index]   → signature → clause node (placeholders for forward refs)
//!     ↓
//! Node Table          → address-stable, append-only
//!     ↓
//! [Decompiler]        → Fact / Clause again, variables renamed V0, V1, ...
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use clausedb::ast::builders::{AtomBuilder, ClauseBuilder};
//! use clausedb::{ClauseDb, Node, Signature};
//!
//! let mut db = ClauseDb::new();
//!
//! // even(N) :- even(M), succ(M, N).   (even/1 is referenced before it exists)
//! let rule = ClauseBuilder::new("even")
//!     .head_vars(["N"])
//!     .body_atom("even", ["M"])
//!     .body_atom("succ", ["M", "N"])
//!     .build();
//! let even = db.add(&rule)?;
//! db.add_fact(&AtomBuilder::new("even").int(0).build())?;
//!
//! assert_eq!(db.find(&Signature::new("even", 1)), Some(even));
//! assert!(matches!(db.get_node(even)?, Node::Clause { bodies, .. } if bodies.len() == 2));
//! # Ok::<(), clausedb::ClauseDbError>(())
//! ```
//!
//! ## Module Organization
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `ast` | Terms, atoms, formulas, clauses (+ builders) |
//! | `node` | Instruction records and addresses |
//! | `node_table` | Append-only node storage, `NodeStore` read seam |
//! | `predicate_index` | Signature → clause node, forward reservation |
//! | `var_context` | Per-clause variable numbering |
//! | `compiler` | Formula → nodes |
//! | `decompiler` | Nodes → formula, whole-database iteration |
//! | `database` | `ClauseDb` façade |
//! | `shared` | `SharedClauseDb` for concurrent writers |
//! | `config` | Layered configuration (figment) |

pub mod ast;
pub mod compiler;
pub mod config;
pub mod database;
pub mod decompiler;
pub mod error;
pub mod node;
pub mod node_table;
pub mod predicate_index;
pub mod shared;
pub mod var_context;

// Re-export public types
pub use crate::ast::{Atom, Clause, Formula, Signature, Term};
pub use config::Config;
pub use database::ClauseDb;
pub use decompiler::{Clauses, Decompiler};
pub use error::{ClauseDbError, ClauseDbResult};
pub use node::{Address, Arg, Node};
pub use node_table::{NodeStore, NodeTable};
pub use predicate_index::PredicateIndex;
pub use shared::SharedClauseDb;
pub use var_context::VarContext;

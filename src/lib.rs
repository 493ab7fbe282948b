// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # kgwalk
//!
//! Walk generation for knowledge-graph embeddings: turns an RDF graph into
//! a gzip-compressed file of token sequences ("walks") ready for word2vec
//! style training.
//!
//! ## Architecture
//!
//! - **Triple index** (`graph`): interned, multi-keyed, read-only after load
//! - **Graph sources** (`graph::source`): RDF files and directories via `oxigraph`
//! - **Walk samplers** (`walk`): random, duplicate-free, mid, weighted mid and text walks
//! - **Light mode** (`scope`): walks for an entity subset over a scoped neighbourhood
//! - **Manager** (`manager`): rayon worker pool writing into a shared gzip sink (`sink`)
//!
//! ## Library usage
//!
//! ```no_run
//! use kgwalk::config::WalkConfig;
//! use kgwalk::graph::source::GraphSource;
//! use kgwalk::manager::WalkGenerationManager;
//! use kgwalk::walk::IndexWalker;
//!
//! let source = GraphSource::open("graph.nt").unwrap();
//! let mut manager =
//!     WalkGenerationManager::new(WalkConfig::default(), Box::new(IndexWalker)).unwrap();
//! manager.load_index(&source).unwrap();
//! let summary = manager.generate(None, "walks.gz".as_ref()).unwrap();
//! println!("{} walks", summary.walks_written);
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod manager;
pub mod registry;
pub mod scope;
pub mod shorten;
pub mod sink;
pub mod symbol;
pub mod walk;

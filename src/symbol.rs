//! Core symbol types for the kgwalk engine.
//!
//! Every identifier that appears in the graph (entity IRIs, predicate IRIs,
//! blank nodes) is interned once in a [`SymbolTable`](crate::registry::SymbolTable)
//! and referred to by a [`SymbolId`] everywhere else. An edge is then three
//! `u32`s instead of three heap strings.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Unique, niche-optimized identifier for an interned graph identifier.
///
/// Uses `NonZeroU32` so that `Option<SymbolId>` is the same size as `SymbolId`.
/// Ids are dense and start at 1, so `get() - 1` is a valid slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct SymbolId(NonZeroU32);

impl SymbolId {
    /// Create a `SymbolId` from a raw `u32`.
    ///
    /// Returns `None` if `raw` is zero.
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(SymbolId)
    }

    /// Get the underlying `u32` value.
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Zero-based slot of this id in a dense table.
    pub(crate) fn slot(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sym:{}", self.0)
    }
}

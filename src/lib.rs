// SPDX-License-Identifier: MIT

//! po-mend — reconcile gettext PO translation catalogs.
//!
//! Two operations make up the core:
//!
//! 1. **Merge**: copy finished translations from a complete catalog into a
//!    structurally matching subset catalog, gated on both catalogs declaring
//!    an identical plural grammar.
//! 2. **Check/fix**: find plural entries whose distinct plural slots carry
//!    the same non-empty translation (a known corruption produced by sloppy
//!    catalog tooling) and optionally repair them from a reference catalog.
//!
//! The library is purely computational: it parses, transforms, and
//! serializes in-memory [`catalog::Catalog`] values. File I/O, overwrite
//! prompting and terminal output live in the binary.

pub mod catalog;
pub mod dupes;
pub mod merge;
pub mod plural;

//! Virtual declaration extraction pipeline.
//!
//! This crate compiles a set of in-memory TypeScript sources down to
//! their `.d.ts` declaration surface without touching the file system.
//! Submitted files are staged in a [`store::VirtualFileStore`]; the
//! package manifest contributes entry points, dependency shims, and
//! compiler option overrides; a tolerant emit pass prints declarations
//! for every parseable file; and the result is filtered to the package's
//! exported surface.
//!
//! The pipeline is total by construction: malformed manifests, missing
//! imports, and syntax damage all degrade into diagnostics on the
//! [`DeclarationResult`] rather than failures.

pub mod emit;
pub mod entry;
pub mod extract;
pub mod filter;
pub mod host;
pub mod manifest;
pub mod printer;
pub mod shim;
pub mod store;

pub use extract::{extract_declarations, DeclarationResult, ExtractOptions, SubmittedFile};

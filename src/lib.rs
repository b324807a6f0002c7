//! # dts-compat
//!
//! Compares two versions of a module's public API surface — expressed as
//! TypeScript declaration source text — and classifies every observed
//! difference by its semantic-versioning impact.
//!
//! The pipeline is strictly left-to-right, leaves first:
//!
//! ```text
//! source text ──► parser ──► ModuleSnapshot
//! (old, new)  ──► differ ──► AnalyzedChange[]
//! (changes, policy) ──► classify ──► Report
//! ```
//!
//! [`compare`] is the only public entry point most callers need:
//!
//! ```rust
//! use dts_compat::{compare, CompareOptions};
//!
//! let report = compare(CompareOptions::new(
//!     "export declare function f(x: string): void;",
//!     "export declare function f(x: string, y: number): void;",
//! ));
//! println!("{}", report.release_type);
//! ```
//!
//! ## Modules
//!
//! - [`types`] — the shared data model: [`types::ExportedSymbol`],
//!   [`types::ModuleSnapshot`], [`types::AnalyzedChange`], [`types::Report`].
//! - [`parser`] — source text to [`types::ModuleSnapshot`].
//! - [`differ`] — two snapshots to a sequence of [`types::AnalyzedChange`].
//! - [`policy`] — the pluggable [`policy::Policy`] trait and its three
//!   built-ins.
//! - [`classify`] — folds a policy over a changeset into a [`types::Report`].
//! - [`compare`] (this module's [`compare`] function) — the public entry
//!   point wiring the above together.

pub mod classify;
pub mod compare;
pub mod differ;
pub mod error;
pub mod parser;
pub mod policy;
pub mod types;

pub use compare::{compare, CompareOptions};
pub use error::CoreError;
pub use types::{
    AnalyzedChange, Change, ChangeCategory, ChangesByImpact, ExportedSymbol, ImpactBucket,
    ModuleSnapshot, Report, ReleaseType, Stats, SymbolKind, SymbolMetadata,
};

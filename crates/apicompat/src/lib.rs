//! # apicompat
//!
//! Binary-compatibility checker for .NET API surfaces.
//!
//! Compares a *contract* assembly set against an *implementation* assembly
//! set and reports every change that would break code compiled against the
//! contract.
//!
//! This is the facade crate that re-exports the core engine and the rule
//! library, and adds the report writer, the JSON surface loader and the
//! [`ApiCompat`] runner.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use apicompat::{ApiCompat, Config};
//!
//! let compat = ApiCompat::builder()
//!     .config(Config::from_file("apicompat.toml".as_ref())?)
//!     .build()?;
//!
//! let status = compat.compare_files(
//!     "contracts.json".as_ref(),
//!     "implementation.json".as_ref(),
//!     std::io::stdout(),
//! )?;
//! std::process::exit(status.code());
//! ```
//!
//! Output looks like:
//!
//! ```text
//! Compat issues with assembly Lib:
//! TypesMustExist: Type 'Lib.Legacy' does not exist in the implementation but it does exist in the contract.
//! Total Issues: 1
//! ```
//!
//! ## Configuration
//!
//! ```toml
//! [mapping]
//! exclude_non_browsable = true
//! group_by_assembly = true
//!
//! [filters]
//! baseline = "apicompat.baseline.txt"
//!
//! [rules.CannotSealType]
//! enabled = false
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

// Re-export core types and traits
pub use apicompat_core::*;

/// Built-in rules and presets.
pub mod rules {
    pub use apicompat_rules::*;
}

pub mod loader;
mod runner;
mod writer;

pub use loader::{load_assembly_set, LoadError};
pub use runner::{ApiCompat, ApiCompatBuilder, ExitStatus, RunError};
pub use writer::{DifferenceWriter, OutputFormat};

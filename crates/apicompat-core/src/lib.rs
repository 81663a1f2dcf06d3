//! # apicompat-core
//!
//! Core framework for checking binary API compatibility between two sets of
//! assemblies: a contract (the surface callers were built against) and an
//! implementation (the candidate that must not break them).
//!
//! This crate provides:
//!
//! - the metadata object model in [`model`], with doc ids from [`docid`]
//! - [`DifferenceRule`] and the [`RuleSet`] registry
//! - [`filters`] deciding which declarations, mappings and findings take part
//! - [`mappings`] aligning the sides into a tree of [`ElementMapping`]s
//! - [`DifferenceTraverser`] walking that tree and reporting [`Difference`]s
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use apicompat_core::filters::{MappingDifferenceFilter, PublicOnlyFilter, SeverityFilter};
//! use apicompat_core::{AssemblySetMapping, DifferenceTraverser, MappingSettings, RuleSet};
//!
//! let filter = Arc::new(PublicOnlyFilter::new());
//! let settings = MappingSettings::new(filter.clone(), Arc::new(RuleSet::from_rules(rules)));
//! let mapping = AssemblySetMapping::between(&settings, &contract, &implementation)?;
//!
//! let mapping_filter = MappingDifferenceFilter::changes_only(filter);
//! let traverser = DifferenceTraverser::new(&mapping_filter, &SeverityFilter::default());
//! let reported = traverser.traverse(&mapping, &mut writer)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod differ;
mod rule;
mod traverser;
mod types;

pub mod docid;
pub mod filters;
pub mod mappings;
pub mod model;

pub use config::{Config, ConfigError, FilterConfig, MappingConfig, RuleConfig};
pub use differ::{occupancy, ElementDiff, ElementDiffer};
pub use filters::{ApiFilter, DifferenceFilter, FilterError, MappingFilter};
pub use mappings::{
    AssemblyMapping, AssemblySetMapping, ElementMapping, MappingError, MappingSettings,
    MemberMapping, NamespaceMapping, TypeMapping,
};
pub use model::{
    AssemblyDefinition, AssemblySet, ConstantValue, CustomAttribute, DeclarationKind,
    DeclaringType, GenericParameter, MemberDefinition, MemberKind, MemberRef, NamespaceDefinition,
    Parameter, ParameterModifier, TypeDefinition, TypeKind, TypeRef, Variance, Visibility,
};
pub use rule::{DifferenceRule, ElementKind, ElementPair, RuleBox, RulePolicy, RuleSet};
pub use traverser::{DifferenceTraverser, DifferenceVisitor};
pub use types::{
    Difference, DifferenceOperands, DifferenceType, Differences, Severity, TypeMismatch,
};

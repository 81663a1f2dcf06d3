//! # apicompat-rules
//!
//! Built-in compatibility rules for apicompat.
//!
//! Every rule compares one aligned pair of declarations (`implementation`,
//! `contract`) and records a difference for each breaking change it finds.
//!
//! ## Available Rules
//!
//! | Name | Level | Description |
//! |------|-------|-------------|
//! | `TypesMustExist` | type | Contract types must exist in the implementation |
//! | `MembersMustExist` | member | Contract members must exist in the implementation |
//! | `CannotRemoveBaseTypeOrInterface` | type | Base types and interfaces must not be dropped |
//! | `CannotSealType` | type, member | Types and virtual members must not become sealed |
//! | `CannotMakeAbstract` | type, member | Concrete types and members must not become abstract |
//! | `CannotMakeMoreVisible` | type, member | Visibility must not narrow |
//! | `CannotRemoveGenerics` | type, member | Variance and constraints of generic parameters must not change |
//! | `CannotRemoveAttribute` | type, member | Included attributes must stay applied |
//! | `DelegatesMustMatch` | type | Delegate signatures must match |
//! | `EnumTypesMustMatch` | type | Enum underlying types must match |
//! | `EnumValuesMustMatch` | member | Enum values must match |
//! | `InterfacesShouldHaveSameMembers` | member | Interfaces must not gain or lose members |
//! | `ParameterModifiersCannotChange` | member | `ref`/`out` and custom modifiers must match |
//! | `TypeCannotChangeClassification` | type | Class, struct, interface and delegate kinds are fixed |
//!
//! ## Usage
//!
//! ```ignore
//! use apicompat_core::{RulePolicy, RuleSet};
//!
//! let rules = RuleSet::new(apicompat_rules::default_rules(), &RulePolicy::new());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cannot_make_abstract;
mod cannot_make_more_visible;
mod cannot_remove_attribute;
mod cannot_remove_base_type_or_interface;
mod cannot_remove_generics;
mod cannot_seal_type;
mod delegates_must_match;
mod enum_types_must_match;
mod enum_values_must_match;
mod interfaces_should_have_same_members;
mod must_exist;
mod parameter_modifiers_cannot_change;
mod presets;
mod type_cannot_change_classification;

#[cfg(test)]
mod testing;

pub use cannot_make_abstract::CannotMakeAbstract;
pub use cannot_make_more_visible::CannotMakeMoreVisible;
pub use cannot_remove_attribute::CannotRemoveAttribute;
pub use cannot_remove_base_type_or_interface::CannotRemoveBaseTypeOrInterface;
pub use cannot_remove_generics::CannotRemoveGenerics;
pub use cannot_seal_type::CannotSealType;
pub use delegates_must_match::DelegatesMustMatch;
pub use enum_types_must_match::EnumTypesMustMatch;
pub use enum_values_must_match::EnumValuesMustMatch;
pub use interfaces_should_have_same_members::InterfacesShouldHaveSameMembers;
pub use must_exist::{MembersMustExist, TypesMustExist};
pub use parameter_modifiers_cannot_change::ParameterModifiersCannotChange;
pub use presets::{all_rules, default_rules, rule_names, Preset};
pub use type_cannot_change_classification::TypeCannotChangeClassification;

/// Re-export core types for convenience.
pub use apicompat_core::{Difference, DifferenceRule, DifferenceType, RuleBox};

//! Rule forbidding a type from changing what kind of type it is.
//!
//! Kinds are `class`, `struct`, `ref struct`, `interface` and `delegate`;
//! enums count as structs. A contract type marked read-only must stay
//! read-only.

use apicompat_core::{DifferenceRule, DifferenceType, Differences, ElementKind, TypeDefinition, TypeKind};

/// Rule name for type-cannot-change-classification.
pub const NAME: &str = "TypeCannotChangeClassification";

/// Compares the kind of matched types.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeCannotChangeClassification;

impl TypeCannotChangeClassification {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn classification(ty: &TypeDefinition) -> &'static str {
    match ty.kind {
        TypeKind::Class => "class",
        TypeKind::Struct | TypeKind::Enum if ty.is_ref_like => "ref struct",
        TypeKind::Struct | TypeKind::Enum => "struct",
        TypeKind::Interface => "interface",
        TypeKind::Delegate => "delegate",
    }
}

impl DifferenceRule for TypeCannotChangeClassification {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "A type must stay a class, struct, ref struct, interface or delegate"
    }

    fn applies_to(&self) -> &'static [ElementKind] {
        &[ElementKind::Type]
    }

    fn diff_types(
        &self,
        differences: &mut Differences<'_>,
        implementation: Option<&TypeDefinition>,
        contract: Option<&TypeDefinition>,
    ) -> DifferenceType {
        let (Some(implementation), Some(contract)) = (implementation, contract) else {
            return DifferenceType::Unknown;
        };

        let before = differences.len();
        let (impl_kind, contract_kind) = (classification(implementation), classification(contract));
        if impl_kind != contract_kind {
            let message = format!(
                "Type '{}' is a {} in the {} but is a {} in the {}.",
                implementation.full_name(),
                impl_kind,
                differences.implementation(),
                contract_kind,
                differences.contract()
            );
            differences.add_incompatible(NAME, message);
        }

        if contract.is_read_only && !implementation.is_read_only {
            let message = format!(
                "Type '{}' is marked as readonly in the {} so it must also be marked readonly in the {}.",
                implementation.full_name(),
                differences.contract(),
                differences.implementation()
            );
            differences.add_incompatible(NAME, message);
        }

        if differences.len() == before {
            DifferenceType::Unknown
        } else {
            DifferenceType::Changed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check_types;

    #[test]
    fn test_class_to_struct_fires() {
        let contract = TypeDefinition::class("N", "Point");
        let implementation = TypeDefinition::structure("N", "Point");

        let outcome = check_types(&TypeCannotChangeClassification, Some(&implementation), Some(&contract));
        assert_eq!(outcome.difference, DifferenceType::Changed);
        assert_eq!(
            outcome.messages(),
            vec!["Type 'N.Point' is a struct in the implementation but is a class in the contract."]
        );
    }

    #[test]
    fn test_struct_to_ref_struct_fires() {
        let contract = TypeDefinition::structure("N", "Span");
        let mut implementation = TypeDefinition::structure("N", "Span");
        implementation.is_ref_like = true;

        let outcome = check_types(&TypeCannotChangeClassification, Some(&implementation), Some(&contract));
        assert_eq!(outcome.ids(), vec![NAME]);
        assert!(outcome.messages()[0].contains("is a ref struct in the implementation"));
    }

    #[test]
    fn test_enum_counts_as_struct() {
        let contract = TypeDefinition::structure("N", "Flags");
        let implementation = TypeDefinition::enumeration("N", "Flags", "System.Int32");

        let outcome = check_types(&TypeCannotChangeClassification, Some(&implementation), Some(&contract));
        assert!(outcome.differences.is_empty());
    }

    #[test]
    fn test_dropping_readonly_fires() {
        let mut contract = TypeDefinition::structure("N", "Point");
        contract.is_read_only = true;
        let implementation = TypeDefinition::structure("N", "Point");

        let outcome = check_types(&TypeCannotChangeClassification, Some(&implementation), Some(&contract));
        assert_eq!(
            outcome.messages(),
            vec!["Type 'N.Point' is marked as readonly in the contract so it must also be marked readonly in the implementation."]
        );
    }

    #[test]
    fn test_adding_readonly_is_accepted() {
        let contract = TypeDefinition::structure("N", "Point");
        let mut implementation = TypeDefinition::structure("N", "Point");
        implementation.is_read_only = true;

        let outcome = check_types(&TypeCannotChangeClassification, Some(&implementation), Some(&contract));
        assert_eq!(outcome.difference, DifferenceType::Unknown);
    }
}

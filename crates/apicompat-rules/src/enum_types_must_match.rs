//! Rule requiring enums to keep their underlying integral type.

use apicompat_core::{DifferenceRule, DifferenceType, Differences, ElementKind, TypeDefinition};

/// Rule name for enum-types-must-match.
pub const NAME: &str = "EnumTypesMustMatch";

/// Compares the underlying type of matched enums.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumTypesMustMatch;

impl EnumTypesMustMatch {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DifferenceRule for EnumTypesMustMatch {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "The underlying type of an enum must not change"
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
        if !implementation.is_enum() || !contract.is_enum() {
            return DifferenceType::Unknown;
        }
        let (Some(impl_type), Some(contract_type)) =
            (&implementation.enum_underlying_type, &contract.enum_underlying_type)
        else {
            return DifferenceType::Unknown;
        };

        if impl_type != contract_type {
            let message = format!(
                "Enum type for '{}' is '{}' in the {} but '{}' in the {}.",
                implementation.full_name(),
                impl_type,
                differences.implementation(),
                contract_type,
                differences.contract()
            );
            differences.add_type_mismatch(NAME, message, &contract_type.name, &impl_type.name);
            return DifferenceType::Changed;
        }

        DifferenceType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check_types;

    #[test]
    fn test_detects_widened_enum() {
        let contract = TypeDefinition::enumeration("N", "Color", "System.Int32");
        let implementation = TypeDefinition::enumeration("N", "Color", "System.Int64");

        let outcome = check_types(&EnumTypesMustMatch, Some(&implementation), Some(&contract));
        assert_eq!(outcome.difference, DifferenceType::Changed);
        insta::assert_snapshot!(
            outcome.messages()[0],
            @"Enum type for 'N.Color' is 'System.Int64' in the implementation but 'System.Int32' in the contract."
        );
    }

    #[test]
    fn test_same_underlying_type() {
        let color = TypeDefinition::enumeration("N", "Color", "System.Byte");
        let outcome = check_types(&EnumTypesMustMatch, Some(&color), Some(&color));
        assert!(outcome.differences.is_empty());
    }

    #[test]
    fn test_ignores_non_enums() {
        let contract = TypeDefinition::enumeration("N", "Color", "System.Int32");
        let implementation = TypeDefinition::class("N", "Color");

        let outcome = check_types(&EnumTypesMustMatch, Some(&implementation), Some(&contract));
        assert_eq!(outcome.difference, DifferenceType::Unknown);
    }
}

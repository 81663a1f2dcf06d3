//! Rule forbidding removal of attribute applications.
//!
//! Only attributes the active filter includes take part; the default
//! public-only filter excludes attributes entirely, so this rule is silent
//! unless attribute comparison is switched on.

use apicompat_core::mappings::AttributesMapping;
use apicompat_core::{CustomAttribute, DifferenceRule, DifferenceType, Differences, MemberRef, TypeDefinition};

/// Rule name for cannot-remove-attribute.
pub const NAME: &str = "CannotRemoveAttribute";

/// Flags attributes applied in the contract but not in the implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannotRemoveAttribute;

impl CannotRemoveAttribute {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn diff_attributes(
    differences: &mut Differences<'_>,
    target: &str,
    implementation: &[CustomAttribute],
    contract: &[CustomAttribute],
) -> DifferenceType {
    let mapping = AttributesMapping::between(contract, implementation);
    let mut removed = Vec::new();
    for attribute in mapping.iter() {
        if let (Some(contract_attribute), None) = (attribute.element(0), attribute.element(1)) {
            if differences.filter().include_attribute(contract_attribute) {
                removed.push(contract_attribute);
            }
        }
    }

    for attribute in &removed {
        let message = format!(
            "Attribute '{}' exists on '{}' in the {} but not the {}.",
            attribute.attribute_type,
            target,
            differences.contract(),
            differences.implementation()
        );
        differences.add_incompatible(NAME, message);
    }

    if removed.is_empty() {
        DifferenceType::Unknown
    } else {
        DifferenceType::Changed
    }
}

impl DifferenceRule for CannotRemoveAttribute {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Included attributes of the contract must stay applied"
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
        diff_attributes(
            differences,
            &implementation.full_name(),
            &implementation.attributes,
            &contract.attributes,
        )
    }

    fn diff_members(
        &self,
        differences: &mut Differences<'_>,
        implementation: Option<MemberRef<'_>>,
        contract: Option<MemberRef<'_>>,
    ) -> DifferenceType {
        let (Some(implementation), Some(contract)) = (implementation, contract) else {
            return DifferenceType::Unknown;
        };
        diff_attributes(
            differences,
            &implementation.full_name(),
            &implementation.member.attributes,
            &contract.member.attributes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check_types, run_with};
    use apicompat_core::filters::{AttributesFilter, PublicOnlyFilter};
    use apicompat_core::ElementPair;

    fn serializable() -> TypeDefinition {
        TypeDefinition::class("N", "Payload")
            .with_attribute(CustomAttribute::new("System.SerializableAttribute"))
            .with_attribute(CustomAttribute::new("System.ObsoleteAttribute").with_argument("\"old\""))
    }

    #[test]
    fn test_removed_attribute_fires() {
        let contract = serializable();
        let implementation = TypeDefinition::class("N", "Payload")
            .with_attribute(CustomAttribute::new("System.ObsoleteAttribute"));

        let outcome = check_types(&CannotRemoveAttribute, Some(&implementation), Some(&contract));
        assert_eq!(outcome.difference, DifferenceType::Changed);
        assert_eq!(
            outcome.messages(),
            vec!["Attribute 'System.SerializableAttribute' exists on 'N.Payload' in the contract but not the implementation."]
        );
    }

    #[test]
    fn test_added_attribute_is_accepted() {
        let contract = TypeDefinition::class("N", "Payload");
        let implementation = serializable();

        let outcome = check_types(&CannotRemoveAttribute, Some(&implementation), Some(&contract));
        assert!(outcome.differences.is_empty());
    }

    #[test]
    fn test_filtered_attributes_are_ignored() {
        let contract = serializable();
        let implementation = TypeDefinition::class("N", "Payload");
        let pair = ElementPair::Type {
            contract: Some(&contract),
            implementation: Some(&implementation),
        };

        let outcome = run_with(&CannotRemoveAttribute, &PublicOnlyFilter::new(), &pair);
        assert!(outcome.differences.is_empty());

        let outcome = run_with(&CannotRemoveAttribute, &AttributesFilter::new(true), &pair);
        assert_eq!(outcome.differences.len(), 2);
    }
}

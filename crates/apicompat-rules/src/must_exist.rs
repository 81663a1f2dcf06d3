//! Rules requiring every contract type and member to exist in the
//! implementation.
//!
//! Members are only compared once their containing type exists on both
//! sides, so a removed type is reported once, by [`TypesMustExist`].

use apicompat_core::{DifferenceRule, DifferenceType, Differences, ElementKind, MemberRef, TypeDefinition};

/// Rule name for types-must-exist.
pub const TYPES_NAME: &str = "TypesMustExist";

/// Rule name for members-must-exist.
pub const MEMBERS_NAME: &str = "MembersMustExist";

/// Flags contract types missing from the implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypesMustExist;

impl TypesMustExist {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DifferenceRule for TypesMustExist {
    fn name(&self) -> &'static str {
        TYPES_NAME
    }

    fn description(&self) -> &'static str {
        "Every contract type must exist in the implementation"
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
        let (None, Some(contract)) = (implementation, contract) else {
            return DifferenceType::Unknown;
        };
        let message = format!(
            "Type '{}' does not exist in the {} but it does exist in the {}.",
            contract.full_name(),
            differences.implementation(),
            differences.contract()
        );
        differences.add_incompatible(TYPES_NAME, message);
        DifferenceType::Removed
    }
}

/// Flags contract members missing from the implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MembersMustExist;

impl MembersMustExist {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DifferenceRule for MembersMustExist {
    fn name(&self) -> &'static str {
        MEMBERS_NAME
    }

    fn description(&self) -> &'static str {
        "Every contract member must exist in the implementation"
    }

    fn applies_to(&self) -> &'static [ElementKind] {
        &[ElementKind::Member]
    }

    fn diff_members(
        &self,
        differences: &mut Differences<'_>,
        implementation: Option<MemberRef<'_>>,
        contract: Option<MemberRef<'_>>,
    ) -> DifferenceType {
        let (None, Some(contract)) = (implementation, contract) else {
            return DifferenceType::Unknown;
        };
        if contract.is_infrastructure() {
            return DifferenceType::Unknown;
        }
        let message = format!(
            "Member '{}' does not exist in the {} but it does exist in the {}.",
            contract.full_name(),
            differences.implementation(),
            differences.contract()
        );
        differences.add_incompatible(MEMBERS_NAME, message);
        DifferenceType::Removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check_members, check_types, first_member};
    use apicompat_core::MemberDefinition;

    #[test]
    fn test_missing_type() {
        let contract = TypeDefinition::class("N", "Gone");
        let outcome = check_types(&TypesMustExist, None, Some(&contract));
        assert_eq!(outcome.difference, DifferenceType::Removed);
        assert_eq!(
            outcome.messages(),
            vec!["Type 'N.Gone' does not exist in the implementation but it does exist in the contract."]
        );
    }

    #[test]
    fn test_added_type_is_not_reported() {
        let implementation = TypeDefinition::class("N", "New");
        let outcome = check_types(&TypesMustExist, Some(&implementation), None);
        assert_eq!(outcome.difference, DifferenceType::Unknown);
        assert!(outcome.differences.is_empty());
    }

    #[test]
    fn test_missing_member() {
        let contract = TypeDefinition::class("N", "Kept").with_member(MemberDefinition::field("count", "System.Int32"));
        let outcome = check_members(&MembersMustExist, None, Some(first_member(&contract)));
        assert_eq!(outcome.difference, DifferenceType::Removed);
        assert_eq!(
            outcome.messages(),
            vec!["Member 'N.Kept.count' does not exist in the implementation but it does exist in the contract."]
        );
    }

    #[test]
    fn test_present_member() {
        let ty = TypeDefinition::class("N", "Kept").with_member(MemberDefinition::method("Run"));
        let member = first_member(&ty);
        let outcome = check_members(&MembersMustExist, Some(member), Some(member));
        assert!(outcome.differences.is_empty());
    }
}

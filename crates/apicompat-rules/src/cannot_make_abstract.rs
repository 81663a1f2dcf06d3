//! Rule forbidding a concrete type or member from becoming abstract.
//!
//! # Rationale
//!
//! Types deriving from a now-abstract type no longer compile against it, and
//! callers that instantiate it fail at run time. A member that becomes
//! abstract leaves every existing subclass without an implementation.

use apicompat_core::{DifferenceRule, DifferenceType, Differences, MemberRef, TypeDefinition};

/// Rule name for cannot-make-abstract.
pub const NAME: &str = "CannotMakeAbstract";

/// Difference id reported for members.
pub const MEMBER_ID: &str = "CannotMakeMemberAbstract";

/// Difference id reported for types.
pub const TYPE_ID: &str = "CannotMakeTypeAbstract";

/// Flags types and members that are abstract in the implementation only.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannotMakeAbstract;

impl CannotMakeAbstract {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DifferenceRule for CannotMakeAbstract {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "A type or member must not become abstract"
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

        // Interfaces are abstract on both sides by construction.
        if implementation.is_abstract && !contract.is_abstract && !implementation.is_interface() {
            let message = format!(
                "Type '{}' is abstract in the {} but is not abstract in the {}.",
                implementation.full_name(),
                differences.implementation(),
                differences.contract()
            );
            differences.add_incompatible(TYPE_ID, message);
            return DifferenceType::Changed;
        }

        DifferenceType::Unknown
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

        if implementation.member.is_abstract && !contract.member.is_abstract {
            let message = format!(
                "Member '{}' is abstract in the {} but is not abstract in the {}.",
                implementation.full_name(),
                differences.implementation(),
                differences.contract()
            );
            differences.add_incompatible(MEMBER_ID, message);
            return DifferenceType::Changed;
        }

        DifferenceType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check_members, check_types, first_member};
    use apicompat_core::MemberDefinition;

    #[test]
    fn test_detects_abstract_type() {
        let contract = TypeDefinition::class("N", "Shape");
        let implementation = TypeDefinition::class("N", "Shape").abstract_();

        let outcome = check_types(&CannotMakeAbstract, Some(&implementation), Some(&contract));
        assert_eq!(outcome.difference, DifferenceType::Changed);
        assert_eq!(outcome.ids(), vec![TYPE_ID]);
        assert_eq!(
            outcome.messages(),
            vec!["Type 'N.Shape' is abstract in the implementation but is not abstract in the contract."]
        );
    }

    #[test]
    fn test_allows_removing_abstract() {
        let contract = TypeDefinition::class("N", "Shape").abstract_();
        let implementation = TypeDefinition::class("N", "Shape");

        let outcome = check_types(&CannotMakeAbstract, Some(&implementation), Some(&contract));
        assert_eq!(outcome.difference, DifferenceType::Unknown);
        assert!(outcome.differences.is_empty());
    }

    #[test]
    fn test_detects_abstract_member() {
        let contract = TypeDefinition::class("N", "Shape").with_member(MemberDefinition::method("Area").virtual_());
        let implementation =
            TypeDefinition::class("N", "Shape").with_member(MemberDefinition::method("Area").abstract_());

        let outcome = check_members(
            &CannotMakeAbstract,
            Some(first_member(&implementation)),
            Some(first_member(&contract)),
        );
        assert_eq!(outcome.difference, DifferenceType::Changed);
        assert_eq!(outcome.ids(), vec![MEMBER_ID]);
    }

    #[test]
    fn test_ignores_one_sided_pairs() {
        let ty = TypeDefinition::class("N", "Shape").abstract_();
        let outcome = check_types(&CannotMakeAbstract, Some(&ty), None);
        assert_eq!(outcome.difference, DifferenceType::Unknown);
    }
}

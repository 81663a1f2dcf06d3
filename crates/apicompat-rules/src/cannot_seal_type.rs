//! Rule forbidding types and members from becoming effectively sealed.
//!
//! A type is effectively sealed when it is `sealed` or when none of its
//! instance constructors can be reached from another assembly. A member is
//! effectively sealed when it is not virtual or is a sealed override.

use apicompat_core::{DifferenceRule, DifferenceType, Differences, MemberRef, TypeDefinition};

/// Rule name for cannot-seal-type.
pub const NAME: &str = "CannotSealType";

/// Difference id reported for members.
pub const MEMBER_ID: &str = "CannotSealMember";

/// Flags types and overridable members that can no longer be derived from or
/// overridden.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannotSealType;

impl CannotSealType {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DifferenceRule for CannotSealType {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "An unsealed type or overridable member must not become sealed"
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

        if implementation.is_effectively_sealed() && !contract.is_effectively_sealed() {
            let message = format!(
                "Type '{}' is sealed in the {} but not sealed in the {}.",
                implementation.full_name(),
                differences.implementation(),
                differences.contract()
            );
            differences.add_incompatible(NAME, message);
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

        // Nobody outside the assembly can override members of a sealed type or
        // of an interface, so sealing them changes nothing.
        let containing_type = contract.containing_type;
        if containing_type.is_interface() || containing_type.is_effectively_sealed() {
            return DifferenceType::Unknown;
        }

        if implementation.member.is_effectively_sealed() && !contract.member.is_effectively_sealed() {
            let message = format!(
                "Member '{}' is sealed in the {} but not sealed in the {}.",
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
    use apicompat_core::{MemberDefinition, Visibility};

    #[test]
    fn test_detects_sealed_type() {
        let contract = TypeDefinition::class("N", "Handler");
        let implementation = TypeDefinition::class("N", "Handler").sealed();

        let outcome = check_types(&CannotSealType, Some(&implementation), Some(&contract));
        assert_eq!(outcome.difference, DifferenceType::Changed);
        assert_eq!(
            outcome.messages(),
            vec!["Type 'N.Handler' is sealed in the implementation but not sealed in the contract."]
        );
    }

    #[test]
    fn test_detects_hidden_constructors() {
        let contract = TypeDefinition::class("N", "Handler").with_member(MemberDefinition::constructor());
        let implementation = TypeDefinition::class("N", "Handler")
            .with_member(MemberDefinition::constructor().with_visibility(Visibility::Assembly));

        let outcome = check_types(&CannotSealType, Some(&implementation), Some(&contract));
        assert_eq!(outcome.ids(), vec![NAME]);
    }

    #[test]
    fn test_allows_unsealing() {
        let contract = TypeDefinition::class("N", "Handler").sealed();
        let implementation = TypeDefinition::class("N", "Handler");

        let outcome = check_types(&CannotSealType, Some(&implementation), Some(&contract));
        assert!(outcome.differences.is_empty());
    }

    #[test]
    fn test_structs_are_sealed_on_both_sides() {
        let ty = TypeDefinition::structure("N", "Point");
        let outcome = check_types(&CannotSealType, Some(&ty), Some(&ty));
        assert_eq!(outcome.difference, DifferenceType::Unknown);
    }

    #[test]
    fn test_detects_member_made_non_virtual() {
        let contract = TypeDefinition::class("N", "Handler").with_member(MemberDefinition::method("Run").virtual_());
        let implementation = TypeDefinition::class("N", "Handler").with_member(MemberDefinition::method("Run"));

        let outcome = check_members(
            &CannotSealType,
            Some(first_member(&implementation)),
            Some(first_member(&contract)),
        );
        assert_eq!(outcome.ids(), vec![MEMBER_ID]);
        assert_eq!(
            outcome.messages(),
            vec!["Member 'N.Handler.Run()' is sealed in the implementation but not sealed in the contract."]
        );
    }

    #[test]
    fn test_members_of_sealed_types_are_ignored() {
        let contract = TypeDefinition::class("N", "Handler")
            .sealed()
            .with_member(MemberDefinition::method("Run").virtual_());
        let implementation = TypeDefinition::class("N", "Handler")
            .sealed()
            .with_member(MemberDefinition::method("Run").virtual_().sealed());

        let outcome = check_members(
            &CannotSealType,
            Some(first_member(&implementation)),
            Some(first_member(&contract)),
        );
        assert!(outcome.differences.is_empty());
    }
}

//! Rule requiring interfaces to keep exactly the same members.
//!
//! Adding a member to an interface breaks every implementer; removing one
//! breaks every caller. Either direction is reported.

use apicompat_core::{DifferenceRule, DifferenceType, Differences, ElementKind, MemberRef};

/// Rule name for interfaces-should-have-same-members.
pub const NAME: &str = "InterfacesShouldHaveSameMembers";

/// Flags interface members present on one side only.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterfacesShouldHaveSameMembers;

impl InterfacesShouldHaveSameMembers {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DifferenceRule for InterfacesShouldHaveSameMembers {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Interface members must not be added or removed"
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
        match (implementation, contract) {
            (None, Some(contract)) if contract.containing_type.is_interface() => {
                let message = format!(
                    "Contract interface member '{}' is not in the {}.",
                    contract.full_name(),
                    differences.implementation()
                );
                differences.add_incompatible(NAME, message);
                DifferenceType::Removed
            }
            (Some(implementation), None) if implementation.containing_type.is_interface() => {
                let message = format!(
                    "Implementation interface member '{}' is not in the {}.",
                    implementation.full_name(),
                    differences.contract()
                );
                differences.add_incompatible(NAME, message);
                DifferenceType::Added
            }
            _ => DifferenceType::Unknown,
        }
    }
}

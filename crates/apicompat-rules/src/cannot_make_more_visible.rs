//! Rule guarding the `protected` surface of types and members.
//!
//! # Detected Patterns
//!
//! - Implementation is `protected` while the contract is not `protected` or
//!   `protected internal`.
//! - Contract is `protected` (or `protected internal`) while the
//!   implementation is no longer reachable from other assemblies.
//!
//! A `public` declaration on either side is always accepted, even when the
//! other side is private.

use apicompat_core::{DifferenceRule, DifferenceType, Differences, MemberRef, TypeDefinition, Visibility};

/// Rule name for cannot-make-more-visible.
pub const NAME: &str = "CannotMakeMoreVisible";

/// Compares declared visibility of matched types and members.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannotMakeMoreVisible;

impl CannotMakeMoreVisible {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn is_incompatible(implementation: Visibility, contract: Visibility) -> bool {
    if implementation == Visibility::Public || contract == Visibility::Public {
        return false;
    }
    if implementation == Visibility::Family && !contract.is_family() {
        return true;
    }
    contract.is_family() && !implementation.is_visible_outside_assembly()
}

impl DifferenceRule for CannotMakeMoreVisible {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Protected visibility must be kept between contract and implementation"
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
        if !is_incompatible(implementation.visibility, contract.visibility) {
            return DifferenceType::Unknown;
        }

        let message = format!(
            "Visibility of type '{}' is '{}' in the {} but '{}' in the {}.",
            implementation.full_name(),
            implementation.visibility,
            differences.implementation(),
            contract.visibility,
            differences.contract()
        );
        differences.add_incompatible(NAME, message);
        DifferenceType::Changed
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
        let (impl_visibility, contract_visibility) =
            (implementation.member.visibility, contract.member.visibility);
        if !is_incompatible(impl_visibility, contract_visibility) {
            return DifferenceType::Unknown;
        }

        let message = format!(
            "Visibility of member '{}' is '{}' in the {} but '{}' in the {}.",
            implementation.full_name(),
            impl_visibility,
            differences.implementation(),
            contract_visibility,
            differences.contract()
        );
        differences.add_incompatible(NAME, message);
        DifferenceType::Changed
    }
}

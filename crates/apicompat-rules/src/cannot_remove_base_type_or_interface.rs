//! Rule forbidding removal of a base type or an implemented interface.
//!
//! Base types are compared in order: every contract ancestor must appear in
//! the implementation's chain after the previously matched one, so inserting
//! a new intermediate ancestor is accepted but dropping one is not.
//! Interfaces are compared as a set, ignoring interfaces that are not visible
//! outside their assembly.

use std::collections::HashSet;

use apicompat_core::{DifferenceRule, DifferenceType, Differences, ElementKind, TypeDefinition, TypeRef};

/// Rule name for cannot-remove-base-type-or-interface.
pub const NAME: &str = "CannotRemoveBaseTypeOrInterface";

/// Compares ancestors and implemented interfaces of matched types.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannotRemoveBaseTypeOrInterface;

impl CannotRemoveBaseTypeOrInterface {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn removed_base_type(
        differences: &mut Differences<'_>,
        implementation: &TypeDefinition,
        contract: &TypeDefinition,
    ) -> bool {
        // Interfaces only take part in the interface check.
        if implementation.is_interface() || contract.is_interface() {
            return false;
        }

        let implementation_bases = &implementation.base_types;
        let mut last_index = 0;
        for base in &contract.base_types {
            let found = implementation_bases[last_index.min(implementation_bases.len())..]
                .iter()
                .position(|candidate| candidate == base);
            match found {
                Some(offset) => last_index += offset,
                None => {
                    let message = format!(
                        "Type '{}' does not inherit from base type '{}' in the {} but it does in the {}.",
                        contract.full_name(),
                        base,
                        differences.implementation(),
                        differences.contract()
                    );
                    differences.add_incompatible(NAME, message);
                    return true;
                }
            }
        }
        false
    }

    fn removed_interface(
        differences: &mut Differences<'_>,
        implementation: &TypeDefinition,
        contract: &TypeDefinition,
    ) -> bool {
        let implementation_interfaces: HashSet<&TypeRef> = implementation.interfaces.iter().collect();

        for interface in &contract.interfaces {
            if !interface.visible_outside_assembly {
                continue;
            }
            if !implementation_interfaces.contains(interface) {
                let message = format!(
                    "Type '{}' does not implement interface '{}' in the {} but it does in the {}.",
                    contract.full_name(),
                    interface,
                    differences.implementation(),
                    differences.contract()
                );
                differences.add_incompatible(NAME, message);
                return true;
            }
        }
        false
    }
}

impl DifferenceRule for CannotRemoveBaseTypeOrInterface {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Base types and public interfaces of the contract must be kept"
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

        if Self::removed_base_type(differences, implementation, contract)
            || Self::removed_interface(differences, implementation, contract)
        {
            return DifferenceType::Changed;
        }
        DifferenceType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::check_types;

    fn with_chain(chain: &[&str]) -> TypeDefinition {
        let mut ty = TypeDefinition::class("N", "Derived");
        ty.base_types = chain.iter().map(|name| TypeRef::new(*name)).collect();
        ty
    }

    #[test]
    fn test_dropped_ancestor_fires_once() {
        let contract = with_chain(&["N.Base2", "N.Base1", "System.Object"]);
        let implementation = with_chain(&["N.Base2", "System.Object"]);

        let outcome = check_types(&CannotRemoveBaseTypeOrInterface, Some(&implementation), Some(&contract));
        assert_eq!(outcome.difference, DifferenceType::Changed);
        assert_eq!(outcome.differences.len(), 1);
        assert_eq!(
            outcome.messages(),
            vec!["Type 'N.Derived' does not inherit from base type 'N.Base1' in the implementation but it does in the contract."]
        );
    }

    #[test]
    fn test_dropped_ancestor_in_root_first_order() {
        let contract = with_chain(&["System.Object", "N.Base1", "N.Base2"]);
        let implementation = with_chain(&["System.Object", "N.Base2"]);

        let outcome = check_types(&CannotRemoveBaseTypeOrInterface, Some(&implementation), Some(&contract));
        assert_eq!(outcome.differences.len(), 1);
        assert!(outcome.messages()[0].contains("'N.Base1'"));
    }

    #[test]
    fn test_inserted_ancestor_is_accepted() {
        let contract = with_chain(&["System.Object", "N.Base1", "N.Base2"]);
        let implementation = with_chain(&["System.Object", "N.Base1", "N.Base1a", "N.Base2"]);

        let outcome = check_types(&CannotRemoveBaseTypeOrInterface, Some(&implementation), Some(&contract));
        assert_eq!(outcome.difference, DifferenceType::Unknown);
        assert!(outcome.differences.is_empty());
    }

    #[test]
    fn test_interfaces_compare_as_set() {
        let contract = TypeDefinition::class("N", "List")
            .with_interface(TypeRef::new("System.Collections.IEnumerable"))
            .with_interface(TypeRef::new("System.IDisposable"));
        let implementation = TypeDefinition::class("N", "List")
            .with_interface(TypeRef::new("System.IDisposable"))
            .with_interface(TypeRef::new("System.Collections.IEnumerable"));

        let outcome = check_types(&CannotRemoveBaseTypeOrInterface, Some(&implementation), Some(&contract));
        assert!(outcome.differences.is_empty());
    }

    #[test]
    fn test_removed_interface_fires() {
        let contract = TypeDefinition::class("N", "List").with_interface(TypeRef::new("System.IDisposable"));
        let implementation = TypeDefinition::class("N", "List");

        let outcome = check_types(&CannotRemoveBaseTypeOrInterface, Some(&implementation), Some(&contract));
        assert_eq!(
            outcome.messages(),
            vec!["Type 'N.List' does not implement interface 'System.IDisposable' in the implementation but it does in the contract."]
        );
    }

    #[test]
    fn test_internal_interface_is_ignored() {
        let contract = TypeDefinition::class("N", "List").with_interface(TypeRef::internal("N.IInternal"));
        let implementation = TypeDefinition::class("N", "List");

        let outcome = check_types(&CannotRemoveBaseTypeOrInterface, Some(&implementation), Some(&contract));
        assert!(outcome.differences.is_empty());
    }

    #[test]
    fn test_interface_types_skip_base_chain() {
        let mut contract = TypeDefinition::interface("N", "IThing");
        contract.base_types = vec![TypeRef::new("N.Odd")];
        let implementation = TypeDefinition::interface("N", "IThing");

        let outcome = check_types(&CannotRemoveBaseTypeOrInterface, Some(&implementation), Some(&contract));
        assert!(outcome.differences.is_empty());
    }
}

//! Rule requiring parameters to keep their passing convention and custom
//! modifiers.
//!
//! # Detected Patterns
//!
//! - A parameter switches between by-value, `ref` and `out`.
//! - A custom modifier (e.g. `IsConst`, `IsVolatile`) is added or removed.

use std::collections::HashSet;

use apicompat_core::{
    DifferenceRule, DifferenceType, Differences, ElementKind, MemberKind, MemberRef, TypeRef,
};

/// Rule name for parameter-modifiers-cannot-change.
pub const NAME: &str = "ParameterModifiersCannotChange";

/// Compares parameters of matched methods position by position.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterModifiersCannotChange;

impl ParameterModifiersCannotChange {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn print_custom_modifiers(modifiers: &[TypeRef]) -> String {
    if modifiers.is_empty() {
        return "<no custom modifiers>".to_string();
    }
    modifiers
        .iter()
        .map(|m| m.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_method(member: &MemberRef<'_>) -> bool {
    matches!(member.member.kind, MemberKind::Method | MemberKind::Constructor)
}

impl DifferenceRule for ParameterModifiersCannotChange {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Parameters must keep in/ref/out and custom modifiers"
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
        let (Some(implementation), Some(contract)) = (implementation, contract) else {
            return DifferenceType::Unknown;
        };
        if !is_method(&implementation) || !is_method(&contract) {
            return DifferenceType::Unknown;
        }

        let impl_params = &implementation.member.parameters;
        let contract_params = &contract.member.parameters;
        assert_eq!(
            impl_params.len(),
            contract_params.len(),
            "matched methods '{}' have different parameter counts",
            implementation.full_name()
        );

        let mut matched = true;
        for (impl_param, contract_param) in impl_params.iter().zip(contract_params) {
            let (impl_modifier, contract_modifier) = (impl_param.modifier(), contract_param.modifier());
            if impl_modifier != contract_modifier {
                let message = format!(
                    "Modifiers on parameter '{}' on method '{}' are '{}' in the {} but '{}' in the {}.",
                    impl_param.name,
                    implementation.full_name(),
                    impl_modifier,
                    differences.implementation(),
                    contract_modifier,
                    differences.contract()
                );
                differences.add_incompatible(NAME, message);
                matched = false;
            }

            if impl_param.is_modified() || contract_param.is_modified() {
                let impl_set: HashSet<&TypeRef> = impl_param.custom_modifiers.iter().collect();
                let contract_set: HashSet<&TypeRef> = contract_param.custom_modifiers.iter().collect();
                if impl_set != contract_set {
                    let message = format!(
                        "Custom modifiers on parameter '{}' on method '{}' are '{}' in the {} but '{}' in the {}.",
                        impl_param.name,
                        implementation.full_name(),
                        print_custom_modifiers(&impl_param.custom_modifiers),
                        differences.implementation(),
                        print_custom_modifiers(&contract_param.custom_modifiers),
                        differences.contract()
                    );
                    differences.add_incompatible(NAME, message);
                    matched = false;
                }
            }
        }

        if matched {
            DifferenceType::Unknown
        } else {
            DifferenceType::Changed
        }
    }
}

//! Rule comparing generic parameter variance and constraints.
//!
//! # Detected Patterns
//!
//! - `CannotChangeVariance`: the variance of a parameter differs.
//! - `CannotChangeGenericConstraints`: the constraint set of a parameter
//!   differs. Constraints compare as a sorted list of `struct`, `class`,
//!   `new()` and type names; `System.ValueType` is dropped when `struct` is
//!   present since it is implied.
//!
//! Pairs whose parameter lists have different lengths are skipped: they
//! cannot have been matched by the same doc id in the first place.

use apicompat_core::{
    DifferenceRule, DifferenceType, Differences, GenericParameter, MemberKind, MemberRef,
    TypeDefinition,
};

/// Rule name for cannot-remove-generics.
pub const NAME: &str = "CannotRemoveGenerics";

/// Difference id for a changed variance.
pub const VARIANCE_ID: &str = "CannotChangeVariance";

/// Difference id for a changed constraint set.
pub const CONSTRAINTS_ID: &str = "CannotChangeGenericConstraints";

const VALUE_TYPE: &str = "System.ValueType";

/// Compares generic parameters of matched types and methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannotRemoveGenerics;

impl CannotRemoveGenerics {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn constraints(parameter: &GenericParameter) -> String {
    let mut constraints = Vec::new();
    if parameter.must_be_value_type {
        constraints.push("struct".to_string());
    } else {
        if parameter.must_be_reference_type {
            constraints.push("class".to_string());
        }
        if parameter.must_have_default_constructor {
            constraints.push("new()".to_string());
        }
    }
    for constraint in &parameter.constraints {
        if parameter.must_be_value_type && constraint.name == VALUE_TYPE {
            continue;
        }
        constraints.push(constraint.name.clone());
    }
    constraints.sort();
    constraints.join(",")
}

fn diff_parameters(
    differences: &mut Differences<'_>,
    target: &str,
    implementation: &[GenericParameter],
    contract: &[GenericParameter],
) -> DifferenceType {
    if implementation.len() != contract.len() {
        return DifferenceType::Unknown;
    }

    let before = differences.len();
    for (impl_param, contract_param) in implementation.iter().zip(contract) {
        if impl_param.variance != contract_param.variance {
            let message = format!(
                "Variance on generic parameter '{}' for '{}' is '{}' in the {} but '{}' in the {}.",
                impl_param.name,
                target,
                impl_param.variance,
                differences.implementation(),
                contract_param.variance,
                differences.contract()
            );
            differences.add_incompatible(VARIANCE_ID, message);
        }

        let impl_constraints = constraints(impl_param);
        let contract_constraints = constraints(contract_param);
        if impl_constraints != contract_constraints {
            let message = format!(
                "Constraints for generic parameter '{}' for '{}' is '{}' in the {} but '{}' in the {}.",
                impl_param.name,
                target,
                impl_constraints,
                differences.implementation(),
                contract_constraints,
                differences.contract()
            );
            differences.add_incompatible(CONSTRAINTS_ID, message);
        }
    }

    if differences.len() == before {
        DifferenceType::Unknown
    } else {
        DifferenceType::Changed
    }
}

impl DifferenceRule for CannotRemoveGenerics {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Generic parameter variance and constraints must not change"
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
        diff_parameters(
            differences,
            &implementation.full_name(),
            &implementation.generic_parameters,
            &contract.generic_parameters,
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
        if implementation.member.kind != MemberKind::Method || contract.member.kind != MemberKind::Method {
            return DifferenceType::Unknown;
        }
        diff_parameters(
            differences,
            &implementation.full_name(),
            &implementation.member.generic_parameters,
            &contract.member.generic_parameters,
        )
    }
}

//! Rule requiring delegate signatures to match exactly.
//!
//! # Detected Patterns
//!
//! - `DelegateReturnTypesMustMatch`: the `Invoke` return type differs.
//! - `DelegateParamNameMustMatch`: a parameter was renamed.
//! - `DelegateParamTypeMustMatch`: a parameter type differs, or the
//!   parameter lists have different lengths.
//!
//! A delegate without an `Invoke` method is not compared: the rule records a
//! warning and leaves the delegate's classification alone.

use apicompat_core::{
    DifferenceRule, DifferenceType, Differences, ElementKind, MemberDefinition, TypeDefinition,
};
use tracing::warn;

/// Rule name for delegates-must-match.
pub const NAME: &str = "DelegatesMustMatch";

/// Difference id for a changed return type.
pub const RETURN_TYPE_ID: &str = "DelegateReturnTypesMustMatch";

/// Difference id for a renamed parameter.
pub const PARAM_NAME_ID: &str = "DelegateParamNameMustMatch";

/// Difference id for a changed parameter type.
pub const PARAM_TYPE_ID: &str = "DelegateParamTypeMustMatch";

/// Compares the `Invoke` signatures of matched delegates.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelegatesMustMatch;

impl DelegatesMustMatch {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn return_types_match(
        differences: &mut Differences<'_>,
        delegate: &TypeDefinition,
        implementation: &MemberDefinition,
        contract: &MemberDefinition,
    ) -> bool {
        let (Some(impl_return), Some(contract_return)) = (&implementation.return_type, &contract.return_type) else {
            return true;
        };
        if impl_return == contract_return {
            return true;
        }

        let message = format!(
            "Return type on delegate '{}' is '{}' in the {} but '{}' in the {}.",
            delegate.full_name(),
            impl_return,
            differences.implementation(),
            contract_return,
            differences.contract()
        );
        differences.add_type_mismatch(RETURN_TYPE_ID, message, &contract_return.name, &impl_return.name);
        false
    }

    fn parameters_match(
        differences: &mut Differences<'_>,
        delegate: &TypeDefinition,
        implementation: &MemberDefinition,
        contract: &MemberDefinition,
    ) -> bool {
        if implementation.parameters.len() != contract.parameters.len() {
            let impl_types = parameter_types(implementation);
            let contract_types = parameter_types(contract);
            let message = format!(
                "Parameter types on delegate '{}' are '({})' in the {} but '({})' in the {}.",
                delegate.full_name(),
                impl_types,
                differences.implementation(),
                contract_types,
                differences.contract()
            );
            differences.add_type_mismatch(PARAM_TYPE_ID, message, &contract_types, &impl_types);
            return false;
        }

        let mut matched = true;
        for (impl_param, contract_param) in implementation.parameters.iter().zip(&contract.parameters) {
            if impl_param.name != contract_param.name {
                let message = format!(
                    "Parameter name on delegate '{}' is '{}' in the {} but '{}' in the {}.",
                    delegate.full_name(),
                    impl_param.name,
                    differences.implementation(),
                    contract_param.name,
                    differences.contract()
                );
                differences.add_incompatible(PARAM_NAME_ID, message);
                matched = false;
            }

            if impl_param.parameter_type != contract_param.parameter_type {
                let message = format!(
                    "Type for parameter '{}' on delegate '{}' is '{}' in the {} but '{}' in the {}.",
                    impl_param.name,
                    delegate.full_name(),
                    impl_param.parameter_type,
                    differences.implementation(),
                    contract_param.parameter_type,
                    differences.contract()
                );
                differences.add_type_mismatch(
                    PARAM_TYPE_ID,
                    message,
                    &contract_param.parameter_type.name,
                    &impl_param.parameter_type.name,
                );
                matched = false;
            }
        }
        matched
    }
}

fn parameter_types(method: &MemberDefinition) -> String {
    method
        .parameters
        .iter()
        .map(|p| p.parameter_type.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl DifferenceRule for DelegatesMustMatch {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Delegate return and parameter types and parameter names must match"
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
        if !implementation.is_delegate() || !contract.is_delegate() {
            return DifferenceType::Unknown;
        }

        let (Some(impl_invoke), Some(contract_invoke)) = (implementation.invoke_method(), contract.invoke_method())
        else {
            warn!(delegate = %implementation.full_name(), "Delegate without an Invoke method");
            differences.add_warning(
                NAME,
                format!("Delegate '{}' has no Invoke method and was not compared.", implementation.full_name()),
            );
            return DifferenceType::Unknown;
        };

        let returns_match = Self::return_types_match(differences, implementation, impl_invoke, contract_invoke);
        let params_match = Self::parameters_match(differences, implementation, impl_invoke, contract_invoke);
        if returns_match && params_match {
            DifferenceType::Unknown
        } else {
            DifferenceType::Changed
        }
    }
}

//! Rule requiring enum members to keep their values.
//!
//! Values compare through their canonical string form, so `Red = 1` declared
//! as `int` on one side and `long` on the other is not a difference.
//!
//! A field without a constant is not compared: the rule records a warning and
//! leaves the field's classification alone.

use apicompat_core::{
    DifferenceRule, DifferenceType, Differences, ElementKind, MemberKind, MemberRef,
};
use tracing::warn;

/// Rule name for enum-values-must-match.
pub const NAME: &str = "EnumValuesMustMatch";

/// Compares the constant of matched enum fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumValuesMustMatch;

impl EnumValuesMustMatch {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn underlying_type_name<'a>(field: &MemberRef<'a>) -> &'a str {
    if let Some(underlying) = &field.containing_type.enum_underlying_type {
        return &underlying.name;
    }
    field.member.constant.as_ref().map_or("", |c| c.type_name())
}

impl DifferenceRule for EnumValuesMustMatch {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Enum members must keep their values"
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
        if !implementation.containing_type.is_enum() || !contract.containing_type.is_enum() {
            return DifferenceType::Unknown;
        }
        if implementation.member.kind != MemberKind::Field || contract.member.kind != MemberKind::Field {
            return DifferenceType::Unknown;
        }

        let (Some(impl_value), Some(contract_value)) = (&implementation.member.constant, &contract.member.constant)
        else {
            warn!(field = %implementation.full_name(), "Enum field without a constant value");
            differences.add_warning(
                NAME,
                format!("Enum field '{}' has no constant value and was not compared.", implementation.full_name()),
            );
            return DifferenceType::Unknown;
        };

        if impl_value.canonical_string() != contract_value.canonical_string() {
            let message = format!(
                "Enum value '{}' is ({}){} in the {} but ({}){} in the {}.",
                implementation.full_name(),
                underlying_type_name(&implementation),
                impl_value,
                differences.implementation(),
                underlying_type_name(&contract),
                contract_value,
                differences.contract()
            );
            differences.add_incompatible(NAME, message);
            return DifferenceType::Changed;
        }

        DifferenceType::Unknown
    }
}

//! Helpers for running a single rule over a hand-built pair.

use apicompat_core::filters::IncludeAllFilter;
use apicompat_core::{
    ApiFilter, Difference, DifferenceOperands, DifferenceRule, DifferenceType, Differences,
    ElementPair, MemberRef, TypeDefinition,
};

pub(crate) struct Outcome {
    pub difference: DifferenceType,
    pub differences: Vec<Difference>,
}

impl Outcome {
    pub fn ids(&self) -> Vec<&str> {
        self.differences.iter().map(|d| d.id.as_str()).collect()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.differences.iter().map(|d| d.message.as_str()).collect()
    }
}

pub(crate) fn run_with(
    rule: &dyn DifferenceRule,
    filter: &dyn ApiFilter,
    pair: &ElementPair<'_>,
) -> Outcome {
    let operands = DifferenceOperands::default();
    let mut differences = Differences::new(pair.doc_id(), &operands, filter);
    let difference = rule.diff(&mut differences, pair);
    Outcome {
        difference,
        differences: differences.into_items(),
    }
}

pub(crate) fn check_types(
    rule: &dyn DifferenceRule,
    implementation: Option<&TypeDefinition>,
    contract: Option<&TypeDefinition>,
) -> Outcome {
    let pair = ElementPair::Type {
        contract,
        implementation,
    };
    run_with(rule, &IncludeAllFilter, &pair)
}

pub(crate) fn check_members(
    rule: &dyn DifferenceRule,
    implementation: Option<MemberRef<'_>>,
    contract: Option<MemberRef<'_>>,
) -> Outcome {
    let pair = ElementPair::Member {
        contract,
        implementation,
    };
    run_with(rule, &IncludeAllFilter, &pair)
}

/// First member of `ty` as a handle.
pub(crate) fn first_member(ty: &TypeDefinition) -> MemberRef<'_> {
    ty.member_refs().next().expect("type has no members")
}

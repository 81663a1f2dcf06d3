//! Rule presets.

use crate::{
    CannotMakeAbstract, CannotMakeMoreVisible, CannotRemoveAttribute,
    CannotRemoveBaseTypeOrInterface, CannotRemoveGenerics, CannotSealType, DelegatesMustMatch,
    EnumTypesMustMatch, EnumValuesMustMatch, InterfacesShouldHaveSameMembers, MembersMustExist,
    ParameterModifiersCannotChange, TypeCannotChangeClassification, TypesMustExist,
};
use apicompat_core::RuleBox;

/// Preset rule selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// The rules a plain compatibility run registers.
    #[default]
    Default,
    /// Every rule in the library.
    All,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Default => default_rules(),
            Self::All => all_rules(),
        }
    }
}

/// Returns the rules registered by a plain run, in dispatch order.
///
/// `CannotRemoveGenerics` is left out: generic constraint comparison is
/// opt-in through [`Preset::All`].
#[must_use]
pub fn default_rules() -> Vec<RuleBox> {
    vec![
        Box::new(TypesMustExist::new()),
        Box::new(MembersMustExist::new()),
        Box::new(CannotRemoveBaseTypeOrInterface::new()),
        Box::new(CannotSealType::new()),
        Box::new(CannotMakeAbstract::new()),
        Box::new(CannotMakeMoreVisible::new()),
        Box::new(CannotRemoveAttribute::new()),
        Box::new(DelegatesMustMatch::new()),
        Box::new(EnumTypesMustMatch::new()),
        Box::new(EnumValuesMustMatch::new()),
        Box::new(InterfacesShouldHaveSameMembers::new()),
        Box::new(ParameterModifiersCannotChange::new()),
        Box::new(TypeCannotChangeClassification::new()),
    ]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    let mut rules = default_rules();
    rules.push(Box::new(CannotRemoveGenerics::new()));
    rules
}

/// Returns the names of all available rules, sorted.
#[must_use]
pub fn rule_names() -> Vec<&'static str> {
    let mut names: Vec<_> = all_rules().iter().map(|r| r.name()).collect();
    names.sort_unstable();
    names
}

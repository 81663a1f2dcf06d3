//! Rule trait and the static rule registry.

use std::collections::HashSet;

use tracing::debug;

use crate::model::{AssemblyDefinition, MemberRef, NamespaceDefinition, TypeDefinition};
use crate::types::{DifferenceType, Differences};

/// The level of the mapping tree an element pair belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Assembly pair.
    Assembly,
    /// Namespace pair.
    Namespace,
    /// Type pair.
    Type,
    /// Member pair.
    Member,
}

impl ElementKind {
    const ALL: [Self; 4] = [Self::Assembly, Self::Namespace, Self::Type, Self::Member];

    /// Every level, top-down.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn index(self) -> usize {
        match self {
            Self::Assembly => 0,
            Self::Namespace => 1,
            Self::Type => 2,
            Self::Member => 3,
        }
    }
}

/// A same-level pair of elements handed to rules.
///
/// Either side may be absent: the contract side is `None` for additions and the
/// implementation side is `None` for removals.
#[derive(Debug, Clone, Copy)]
pub enum ElementPair<'a> {
    /// Two assemblies.
    Assembly {
        /// Contract assembly.
        contract: Option<&'a AssemblyDefinition>,
        /// Implementation assembly.
        implementation: Option<&'a AssemblyDefinition>,
    },
    /// Two namespaces.
    Namespace {
        /// Contract namespace.
        contract: Option<&'a NamespaceDefinition>,
        /// Implementation namespace.
        implementation: Option<&'a NamespaceDefinition>,
    },
    /// Two types.
    Type {
        /// Contract type.
        contract: Option<&'a TypeDefinition>,
        /// Implementation type.
        implementation: Option<&'a TypeDefinition>,
    },
    /// Two members.
    Member {
        /// Contract member.
        contract: Option<MemberRef<'a>>,
        /// Implementation member.
        implementation: Option<MemberRef<'a>>,
    },
}

impl ElementPair<'_> {
    /// Level of this pair.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Assembly { .. } => ElementKind::Assembly,
            Self::Namespace { .. } => ElementKind::Namespace,
            Self::Type { .. } => ElementKind::Type,
            Self::Member { .. } => ElementKind::Member,
        }
    }

    /// Identifier of the pair, taken from the contract side when present.
    #[must_use]
    pub fn doc_id(&self) -> String {
        match self {
            Self::Assembly {
                contract,
                implementation,
            } => contract
                .or(*implementation)
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            Self::Namespace {
                contract,
                implementation,
            } => contract
                .or(*implementation)
                .map(|n| format!("N:{}", n.name))
                .unwrap_or_default(),
            Self::Type {
                contract,
                implementation,
            } => contract
                .or(*implementation)
                .map(TypeDefinition::doc_id)
                .unwrap_or_default(),
            Self::Member {
                contract,
                implementation,
            } => contract
                .or(*implementation)
                .map(|m| m.doc_id())
                .unwrap_or_default(),
        }
    }
}

/// A single compatibility check.
///
/// Rules receive an implementation/contract pair, append zero or more
/// differences to the collector and return how they classify the pair.
/// A rule that does not apply returns [`DifferenceType::Unknown`]; a rule that
/// returns [`DifferenceType::Changed`] must have recorded a difference.
/// A rule that cannot evaluate a pair may record a [`Severity::Warning`](crate::Severity::Warning)
/// difference, but returns [`DifferenceType::Unknown`]: warnings never change
/// how the pair is classified.
///
/// Rules must not depend on each other's side effects.
///
/// # Example
///
/// ```ignore
/// use apicompat_core::{DifferenceRule, DifferenceType, Differences, TypeDefinition};
///
/// pub struct CannotMakeTypeStatic;
///
/// impl DifferenceRule for CannotMakeTypeStatic {
///     fn name(&self) -> &'static str { "CannotMakeTypeStatic" }
///
///     fn diff_types(
///         &self,
///         differences: &mut Differences<'_>,
///         implementation: Option<&TypeDefinition>,
///         contract: Option<&TypeDefinition>,
///     ) -> DifferenceType {
///         let (Some(implementation), Some(contract)) = (implementation, contract) else {
///             return DifferenceType::Unknown;
///         };
///         // ...
///         DifferenceType::Unknown
///     }
/// }
/// ```
pub trait DifferenceRule: Send + Sync {
    /// Returns the rule identifier used in difference records (e.g. "CannotSealType").
    fn name(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// The element levels this rule is dispatched for.
    fn applies_to(&self) -> &'static [ElementKind] {
        &[ElementKind::Type, ElementKind::Member]
    }

    /// Whether this rule is only enforced when servicing MDIL images.
    fn is_mdil_servicing_rule(&self) -> bool {
        false
    }

    /// Evaluates one pair.
    ///
    /// The default implementation forwards type and member pairs to
    /// [`Self::diff_types`] and [`Self::diff_members`].
    fn diff(&self, differences: &mut Differences<'_>, pair: &ElementPair<'_>) -> DifferenceType {
        match *pair {
            ElementPair::Type {
                contract,
                implementation,
            } => self.diff_types(differences, implementation, contract),
            ElementPair::Member {
                contract,
                implementation,
            } => self.diff_members(differences, implementation, contract),
            ElementPair::Assembly { .. } | ElementPair::Namespace { .. } => {
                DifferenceType::Unknown
            }
        }
    }

    /// Evaluates a type pair.
    fn diff_types(
        &self,
        _differences: &mut Differences<'_>,
        _implementation: Option<&TypeDefinition>,
        _contract: Option<&TypeDefinition>,
    ) -> DifferenceType {
        DifferenceType::Unknown
    }

    /// Evaluates a member pair.
    fn diff_members(
        &self,
        _differences: &mut Differences<'_>,
        _implementation: Option<MemberRef<'_>>,
        _contract: Option<MemberRef<'_>>,
    ) -> DifferenceType {
        DifferenceType::Unknown
    }
}

/// Type alias for boxed `DifferenceRule` trait objects.
pub type RuleBox = Box<dyn DifferenceRule>;

/// Decides which registered rules take part in a run.
#[derive(Debug, Clone, Default)]
pub struct RulePolicy {
    /// Keep MDIL servicing rules. They are dropped otherwise.
    pub enforce_mdil_rules: bool,
    /// Names of rules switched off by configuration.
    pub disabled: HashSet<String>,
}

impl RulePolicy {
    /// Creates a policy that keeps every non-MDIL rule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps MDIL servicing rules.
    #[must_use]
    pub fn enforce_mdil_rules(mut self, enforce: bool) -> Self {
        self.enforce_mdil_rules = enforce;
        self
    }

    /// Switches a rule off by name.
    #[must_use]
    pub fn disable(mut self, name: impl Into<String>) -> Self {
        self.disabled.insert(name.into());
        self
    }

    /// Returns true if the rule should be registered.
    #[must_use]
    pub fn allows(&self, rule: &dyn DifferenceRule) -> bool {
        if rule.is_mdil_servicing_rule() && !self.enforce_mdil_rules {
            return false;
        }
        !self.disabled.contains(rule.name())
    }
}

/// The registry of active rules, indexed by element level.
///
/// Built once from explicit constructor calls; dispatch order is registration
/// order.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<RuleBox>,
    by_kind: [Vec<usize>; 4],
}

impl RuleSet {
    /// Registers every rule the policy allows.
    #[must_use]
    pub fn new(rules: Vec<RuleBox>, policy: &RulePolicy) -> Self {
        let mut set = Self::default();
        for rule in rules {
            if policy.allows(rule.as_ref()) {
                set.register(rule);
            } else {
                debug!(rule = rule.name(), "Rule skipped by policy");
            }
        }
        set
    }

    /// Registers every rule unconditionally.
    #[must_use]
    pub fn from_rules(rules: Vec<RuleBox>) -> Self {
        let mut set = Self::default();
        for rule in rules {
            set.register(rule);
        }
        set
    }

    fn register(&mut self, rule: RuleBox) {
        let index = self.rules.len();
        for kind in rule.applies_to() {
            self.by_kind[kind.index()].push(index);
        }
        self.rules.push(rule);
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Names of the registered rules in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Rules dispatched for the given level, in registration order.
    pub fn rules_for(&self, kind: ElementKind) -> impl Iterator<Item = &dyn DifferenceRule> {
        self.by_kind[kind.index()]
            .iter()
            .map(move |&i| self.rules[i].as_ref())
    }

    /// Runs every applicable rule over the pair and merges their results.
    pub fn diff(&self, differences: &mut Differences<'_>, pair: &ElementPair<'_>) -> DifferenceType {
        let mut result = DifferenceType::Unknown;
        for rule in self.rules_for(pair.kind()) {
            let before = differences.len();
            let outcome = rule.diff(differences, pair);
            debug_assert!(
                outcome != DifferenceType::Changed || differences.len() > before,
                "rule {} reported Changed without recording a difference",
                rule.name()
            );
            result = result.merge(outcome);
        }
        result
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::IncludeAllFilter;
    use crate::types::DifferenceOperands;

    struct FlagAbstract;

    impl DifferenceRule for FlagAbstract {
        fn name(&self) -> &'static str {
            "FlagAbstract"
        }

        fn description(&self) -> &'static str {
            "A test rule"
        }

        fn applies_to(&self) -> &'static [ElementKind] {
            &[ElementKind::Type]
        }

        fn diff_types(
            &self,
            differences: &mut Differences<'_>,
            implementation: Option<&TypeDefinition>,
            _contract: Option<&TypeDefinition>,
        ) -> DifferenceType {
            match implementation {
                Some(ty) if ty.is_abstract => {
                    differences.add_incompatible(self.name(), "abstract");
                    DifferenceType::Changed
                }
                _ => DifferenceType::Unknown,
            }
        }
    }

    struct MdilOnly;

    impl DifferenceRule for MdilOnly {
        fn name(&self) -> &'static str {
            "MdilOnly"
        }

        fn is_mdil_servicing_rule(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_rule_trait_defaults() {
        let rule = MdilOnly;
        assert_eq!(rule.description(), "");
        assert_eq!(rule.applies_to(), &[ElementKind::Type, ElementKind::Member]);
    }

    #[test]
    fn policy_drops_mdil_rules_unless_enforced() {
        let set = RuleSet::new(vec![Box::new(FlagAbstract), Box::new(MdilOnly)], &RulePolicy::new());
        assert_eq!(set.names(), vec!["FlagAbstract"]);

        let set = RuleSet::new(
            vec![Box::new(FlagAbstract), Box::new(MdilOnly)],
            &RulePolicy::new().enforce_mdil_rules(true),
        );
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn policy_drops_disabled_rules() {
        let set = RuleSet::new(
            vec![Box::new(FlagAbstract)],
            &RulePolicy::new().disable("FlagAbstract"),
        );
        assert!(set.is_empty());
    }

    #[test]
    fn dispatch_is_keyed_by_level() {
        let set = RuleSet::from_rules(vec![Box::new(FlagAbstract), Box::new(MdilOnly)]);
        assert_eq!(set.rules_for(ElementKind::Type).count(), 2);
        assert_eq!(set.rules_for(ElementKind::Member).count(), 1);
        assert_eq!(set.rules_for(ElementKind::Namespace).count(), 0);
    }

    #[test]
    fn rule_set_merges_results() {
        let set = RuleSet::from_rules(vec![Box::new(FlagAbstract)]);
        let operands = DifferenceOperands::default();
        let filter = IncludeAllFilter;
        let ty = TypeDefinition::class("N", "T").abstract_();
        let pair = ElementPair::Type {
            contract: Some(&ty),
            implementation: Some(&ty),
        };
        let mut diffs = Differences::new(pair.doc_id(), &operands, &filter);

        assert_eq!(set.diff(&mut diffs, &pair), DifferenceType::Changed);
        assert_eq!(diffs.items()[0].target, "T:N.T");
    }
}

use std::sync::Arc;

use crate::filters::ApiFilter;
use crate::rule::RuleSet;
use crate::types::DifferenceOperands;

/// Settings shared by every mapping in one alignment pass.
#[derive(Clone)]
pub struct MappingSettings {
    /// Declarations rejected by this filter never enter a mapping.
    pub filter: Arc<dyn ApiFilter>,
    /// Rules run against each mapped pair.
    pub rules: Arc<RuleSet>,
    /// Side names used in messages.
    pub operands: DifferenceOperands,
    /// Map types forwarded to other assemblies.
    pub include_forwarded_types: bool,
    /// Keep one child mapping per assembly instead of merging namespaces.
    pub group_by_assembly: bool,
    /// Number of sides; 2 for a contract/implementation comparison.
    pub element_count: usize,
}

impl MappingSettings {
    /// Creates two-sided settings that group by assembly and include
    /// forwarded types.
    #[must_use]
    pub fn new(filter: Arc<dyn ApiFilter>, rules: Arc<RuleSet>) -> Self {
        Self {
            filter,
            rules,
            operands: DifferenceOperands::default(),
            include_forwarded_types: true,
            group_by_assembly: true,
            element_count: 2,
        }
    }

    /// Sets the side names.
    #[must_use]
    pub fn with_operands(mut self, operands: DifferenceOperands) -> Self {
        self.operands = operands;
        self
    }

    /// Sets whether forwarded types are mapped.
    #[must_use]
    pub fn include_forwarded_types(mut self, include: bool) -> Self {
        self.include_forwarded_types = include;
        self
    }

    /// Sets whether assemblies are kept apart.
    #[must_use]
    pub fn group_by_assembly(mut self, group: bool) -> Self {
        self.group_by_assembly = group;
        self
    }

    /// Sets the number of sides.
    ///
    /// # Panics
    ///
    /// Panics if `count` is less than two.
    #[must_use]
    pub fn element_count(mut self, count: usize) -> Self {
        assert!(count >= 2, "a comparison needs at least two sides");
        self.element_count = count;
        self
    }
}

impl std::fmt::Debug for MappingSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingSettings")
            .field("rules", &self.rules)
            .field("operands", &self.operands)
            .field("include_forwarded_types", &self.include_forwarded_types)
            .field("group_by_assembly", &self.group_by_assembly)
            .field("element_count", &self.element_count)
            .finish_non_exhaustive()
    }
}

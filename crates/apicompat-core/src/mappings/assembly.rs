use std::ops::Deref;

use indexmap::IndexMap;
use tracing::debug;

use super::{ElementMapping, MappingError, MappingSettings, NamespaceMapping};
use crate::model::{AssemblyDefinition, AssemblySet};

/// Alignment of one assembly across the sides, with its namespaces.
#[derive(Debug)]
pub struct AssemblyMapping<'a> {
    mapping: ElementMapping<'a, &'a AssemblyDefinition>,
    namespaces: IndexMap<String, NamespaceMapping<'a>>,
}

impl<'a> AssemblyMapping<'a> {
    /// Creates an empty assembly mapping.
    #[must_use]
    pub fn new(settings: &'a MappingSettings) -> Self {
        Self {
            mapping: ElementMapping::new(settings, false),
            namespaces: IndexMap::new(),
        }
    }

    /// Places the assembly of side `index` and aligns its included namespaces.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::Duplicate`] if the side already holds an
    /// assembly of this name, or a type repeats inside it.
    pub fn add_mapping(
        &mut self,
        index: usize,
        assembly: &'a AssemblyDefinition,
    ) -> Result<(), MappingError> {
        self.mapping.add_mapping(index, assembly)?;
        let settings = self.mapping.settings();
        for namespace in &assembly.namespaces {
            if !settings.filter.include_namespace(namespace) {
                continue;
            }
            self.namespaces
                .entry(namespace.name.clone())
                .or_insert_with(|| NamespaceMapping::new(settings, false))
                .add_mapping(index, namespace)?;
        }
        Ok(())
    }

    /// Namespace mappings in first-seen order.
    pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceMapping<'a>> {
        self.namespaces.values()
    }

    /// Name of the assembly, preferring the contract side.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.mapping
            .representative()
            .map_or("", |assembly| assembly.name.as_str())
    }
}

impl<'a> Deref for AssemblyMapping<'a> {
    type Target = ElementMapping<'a, &'a AssemblyDefinition>;

    fn deref(&self) -> &Self::Target {
        &self.mapping
    }
}

/// Root of the mapping tree: one assembly set per side.
///
/// With `group_by_assembly` the children are assembly mappings keyed by
/// assembly name. Otherwise every assembly's namespaces are merged into one
/// namespace level, and a type defined in several assemblies of one side
/// collapses to the last one seen.
#[derive(Debug)]
pub struct AssemblySetMapping<'a> {
    mapping: ElementMapping<'a, &'a AssemblySet>,
    assemblies: IndexMap<String, AssemblyMapping<'a>>,
    namespaces: IndexMap<String, NamespaceMapping<'a>>,
}

impl<'a> AssemblySetMapping<'a> {
    /// Creates an empty root.
    #[must_use]
    pub fn new(settings: &'a MappingSettings) -> Self {
        Self {
            mapping: ElementMapping::new(settings, false),
            assemblies: IndexMap::new(),
            namespaces: IndexMap::new(),
        }
    }

    /// Aligns a contract set (side 0) with an implementation set (side 1).
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::Duplicate`] if either set repeats a declaration.
    pub fn between(
        settings: &'a MappingSettings,
        contract: &'a AssemblySet,
        implementation: &'a AssemblySet,
    ) -> Result<Self, MappingError> {
        let mut mapping = Self::new(settings);
        mapping.add_mapping(0, contract)?;
        mapping.add_mapping(1, implementation)?;
        debug!(
            assemblies = mapping.assemblies.len(),
            namespaces = mapping.namespace_count(),
            "Built assembly set mapping"
        );
        Ok(mapping)
    }

    /// Places the set of side `index`.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::Duplicate`] if the side is already occupied or
    /// repeats a declaration.
    pub fn add_mapping(&mut self, index: usize, set: &'a AssemblySet) -> Result<(), MappingError> {
        self.mapping.add_mapping(index, set)?;
        let settings = self.mapping.settings();

        for assembly in &set.assemblies {
            if settings.group_by_assembly {
                self.assemblies
                    .entry(assembly.name.clone())
                    .or_insert_with(|| AssemblyMapping::new(settings))
                    .add_mapping(index, assembly)?;
            } else {
                for namespace in &assembly.namespaces {
                    if !settings.filter.include_namespace(namespace) {
                        continue;
                    }
                    self.namespaces
                        .entry(namespace.name.clone())
                        .or_insert_with(|| NamespaceMapping::new(settings, true))
                        .add_mapping(index, namespace)?;
                }
            }
        }
        Ok(())
    }

    /// Assembly mappings (empty unless grouping by assembly).
    pub fn assemblies(&self) -> impl Iterator<Item = &AssemblyMapping<'a>> {
        self.assemblies.values()
    }

    /// Merged namespace mappings (empty when grouping by assembly).
    pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceMapping<'a>> {
        self.namespaces.values()
    }

    /// Name of the set on side `index`.
    #[must_use]
    pub fn set_name(&self, index: usize) -> &'a str {
        self.mapping
            .element(index)
            .map_or("", |set| set.name.as_str())
    }

    fn namespace_count(&self) -> usize {
        self.namespaces.len()
            + self
                .assemblies
                .values()
                .map(|a| a.namespaces.len())
                .sum::<usize>()
    }
}

impl<'a> Deref for AssemblySetMapping<'a> {
    type Target = ElementMapping<'a, &'a AssemblySet>;

    fn deref(&self) -> &Self::Target {
        &self.mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::PublicOnlyFilter;
    use crate::model::TypeDefinition;
    use crate::rule::RuleSet;
    use crate::types::DifferenceType;
    use std::sync::Arc;

    fn sets() -> (AssemblySet, AssemblySet) {
        let contract = AssemblySet::new("ref")
            .with_assembly(
                AssemblyDefinition::new("System.Runtime")
                    .with_type(TypeDefinition::class("System", "Object"))
                    .with_type(TypeDefinition::class("System", "Gone")),
            )
            .with_assembly(
                AssemblyDefinition::new("System.Collections")
                    .with_type(TypeDefinition::class("System.Collections", "Stack")),
            );
        let implementation = AssemblySet::new("lib")
            .with_assembly(
                AssemblyDefinition::new("System.Collections")
                    .with_type(TypeDefinition::class("System.Collections", "Stack")),
            )
            .with_assembly(
                AssemblyDefinition::new("System.Runtime")
                    .with_type(TypeDefinition::class("System", "Object"))
                    .with_type(TypeDefinition::class("System.Collections", "Queue")),
            );
        (contract, implementation)
    }

    fn settings(group: bool) -> MappingSettings {
        MappingSettings::new(Arc::new(PublicOnlyFilter::new()), Arc::new(RuleSet::default()))
            .group_by_assembly(group)
    }

    #[test]
    fn grouped_mapping_keeps_contract_order() {
        let (contract, implementation) = sets();
        let settings = settings(true);
        let mapping = AssemblySetMapping::between(&settings, &contract, &implementation).unwrap();

        let names: Vec<_> = mapping.assemblies().map(AssemblyMapping::name).collect();
        assert_eq!(names, vec!["System.Runtime", "System.Collections"]);
        assert_eq!(mapping.namespaces().count(), 0);
        assert_eq!(mapping.set_name(0), "ref");
        assert_eq!(mapping.set_name(1), "lib");

        let runtime = mapping.assemblies().next().unwrap();
        let namespaces: Vec<_> = runtime.namespaces().map(|n| n.representative().unwrap().name.as_str()).collect();
        assert_eq!(namespaces, vec!["System", "System.Collections"]);
        let system = runtime.namespaces().next().unwrap();
        let kinds: Vec<_> = system.types().map(|t| t.difference()).collect();
        assert_eq!(kinds, vec![DifferenceType::Unchanged, DifferenceType::Removed]);
    }

    #[test]
    fn ungrouped_mapping_merges_namespaces() {
        let (contract, implementation) = sets();
        let settings = settings(false);
        let mapping = AssemblySetMapping::between(&settings, &contract, &implementation).unwrap();

        assert_eq!(mapping.assemblies().count(), 0);
        let collections = mapping
            .namespaces()
            .find(|n| n.representative().is_some_and(|ns| ns.name == "System.Collections"))
            .unwrap();
        let types: Vec<_> = collections
            .types()
            .map(|t| (t.representative().unwrap().name.as_str(), t.difference()))
            .collect();
        assert_eq!(
            types,
            vec![("Stack", DifferenceType::Unchanged), ("Queue", DifferenceType::Added)]
        );
    }

    #[test]
    fn duplicate_assembly_on_one_side_is_an_error() {
        let set = AssemblySet::new("dup")
            .with_assembly(AssemblyDefinition::new("A"))
            .with_assembly(AssemblyDefinition::new("A"));
        let settings = settings(true);
        assert!(AssemblySetMapping::between(&settings, &set, &AssemblySet::new("other")).is_err());
    }

    #[test]
    fn mapping_is_deterministic() {
        let (contract, implementation) = sets();
        let settings = settings(true);
        let render = || {
            let mapping = AssemblySetMapping::between(&settings, &contract, &implementation).unwrap();
            format!("{mapping:?}")
        };
        assert_eq!(render(), render());
    }
}

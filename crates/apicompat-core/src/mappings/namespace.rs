use std::ops::Deref;

use indexmap::IndexMap;

use super::{ElementMapping, MappingError, MappingSettings, TypeMapping};
use crate::model::NamespaceDefinition;

/// Alignment of one namespace across the sides, with its types.
///
/// A namespace may be added several times for the same side (once per
/// assembly when assemblies are merged); its types accumulate.
#[derive(Debug)]
pub struct NamespaceMapping<'a> {
    mapping: ElementMapping<'a, &'a NamespaceDefinition>,
    types: IndexMap<String, TypeMapping<'a>>,
    allow_duplicate_types: bool,
}

impl<'a> NamespaceMapping<'a> {
    /// Creates an empty namespace mapping. `allow_duplicate_types` is handed
    /// down to the type mappings.
    #[must_use]
    pub fn new(settings: &'a MappingSettings, allow_duplicate_types: bool) -> Self {
        Self {
            mapping: ElementMapping::new(settings, true),
            types: IndexMap::new(),
            allow_duplicate_types,
        }
    }

    /// Places the namespace of side `index` and aligns its included types.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::Duplicate`] if a type repeats on one side and
    /// duplicates are not allowed.
    pub fn add_mapping(
        &mut self,
        index: usize,
        namespace: &'a NamespaceDefinition,
    ) -> Result<(), MappingError> {
        self.mapping.add_mapping(index, namespace)?;

        let settings = self.mapping.settings();
        let allow_duplicates = self.allow_duplicate_types;
        for ty in namespace.types(settings.include_forwarded_types) {
            if !settings.filter.include_type(ty) {
                continue;
            }
            self.types
                .entry(ty.doc_id())
                .or_insert_with(|| TypeMapping::new(settings, allow_duplicates))
                .add_mapping(index, ty)?;
        }
        Ok(())
    }

    /// Type mappings in first-seen order.
    pub fn types(&self) -> impl Iterator<Item = &TypeMapping<'a>> {
        self.types.values()
    }

    /// Type mapping by doc id.
    #[must_use]
    pub fn type_mapping(&self, doc_id: &str) -> Option<&TypeMapping<'a>> {
        self.types.get(doc_id)
    }
}

impl<'a> Deref for NamespaceMapping<'a> {
    type Target = ElementMapping<'a, &'a NamespaceDefinition>;

    fn deref(&self) -> &Self::Target {
        &self.mapping
    }
}

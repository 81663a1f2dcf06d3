//! Structural alignment of two (or more) assembly sets.
//!
//! Each mapping holds one slot per side: slot 0 is the contract, slot 1 the
//! implementation, further slots extend the comparison to more sides. Children
//! (namespaces, types, members) are keyed by doc id, which is built from
//! namespace, containing type, name and generic arity, so the same declaration
//! loaded twice lands in the same mapping. Children are kept in insertion
//! order, seeded by the contract side, which makes traversal deterministic.

mod assembly;
mod attributes;
mod member;
mod namespace;
mod settings;
mod type_mapping;

use std::cell::OnceCell;

use crate::differ::{occupancy, ElementDiff, ElementDiffer};
use crate::model::{AssemblyDefinition, AssemblySet, CustomAttribute, MemberRef, NamespaceDefinition, TypeDefinition};
use crate::rule::ElementPair;
use crate::types::{Difference, DifferenceType};

pub use assembly::{AssemblyMapping, AssemblySetMapping};
pub use attributes::{AttributeMapping, AttributesMapping};
pub use member::MemberMapping;
pub use namespace::NamespaceMapping;
pub use settings::MappingSettings;
pub use type_mapping::TypeMapping;

/// Errors raised while aligning sides.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// A side supplied the same declaration twice and duplicates are not allowed.
    #[error("Duplicate element '{name}' on side {side}")]
    Duplicate {
        /// Side index.
        side: usize,
        /// Name of the repeated declaration.
        name: String,
    },
}

/// Anything that can occupy a mapping slot.
pub trait Element: Copy {
    /// Name used in diagnostics.
    fn mapping_name(&self) -> String;
}

/// A slot element that rules can be run against.
pub trait MappedElement<'a>: Element {
    /// Builds the rule input for a contract/implementation pair.
    fn element_pair(contract: Option<Self>, implementation: Option<Self>) -> ElementPair<'a>;
}

impl Element for &AssemblySet {
    fn mapping_name(&self) -> String {
        self.name.clone()
    }
}

impl Element for &AssemblyDefinition {
    fn mapping_name(&self) -> String {
        self.name.clone()
    }
}

impl<'a> MappedElement<'a> for &'a AssemblyDefinition {
    fn element_pair(contract: Option<Self>, implementation: Option<Self>) -> ElementPair<'a> {
        ElementPair::Assembly {
            contract,
            implementation,
        }
    }
}

impl Element for &NamespaceDefinition {
    fn mapping_name(&self) -> String {
        self.name.clone()
    }
}

impl<'a> MappedElement<'a> for &'a NamespaceDefinition {
    fn element_pair(contract: Option<Self>, implementation: Option<Self>) -> ElementPair<'a> {
        ElementPair::Namespace {
            contract,
            implementation,
        }
    }
}

impl Element for &TypeDefinition {
    fn mapping_name(&self) -> String {
        self.full_name()
    }
}

impl<'a> MappedElement<'a> for &'a TypeDefinition {
    fn element_pair(contract: Option<Self>, implementation: Option<Self>) -> ElementPair<'a> {
        ElementPair::Type {
            contract,
            implementation,
        }
    }
}

impl Element for MemberRef<'_> {
    fn mapping_name(&self) -> String {
        self.full_name()
    }
}

impl<'a> MappedElement<'a> for MemberRef<'a> {
    fn element_pair(contract: Option<Self>, implementation: Option<Self>) -> ElementPair<'a> {
        ElementPair::Member {
            contract,
            implementation,
        }
    }
}

impl Element for &CustomAttribute {
    fn mapping_name(&self) -> String {
        self.attribute_type.name.clone()
    }
}

/// One aligned element: a slot per side, each holding the declaration from that
/// side or nothing.
///
/// The classification is computed lazily on first request and cached; adding a
/// further element resets the cache.
pub struct ElementMapping<'a, T> {
    settings: &'a MappingSettings,
    elements: Vec<Option<T>>,
    allow_duplicate_matching_adds: bool,
    diff: OnceCell<ElementDiff>,
}

impl<'a, T: Element> ElementMapping<'a, T> {
    /// Creates an empty mapping with one slot per configured side.
    #[must_use]
    pub fn new(settings: &'a MappingSettings, allow_duplicate_matching_adds: bool) -> Self {
        Self {
            settings,
            elements: vec![None; settings.element_count],
            allow_duplicate_matching_adds,
            diff: OnceCell::new(),
        }
    }

    /// Places `element` into slot `index`.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::Duplicate`] if the slot is already occupied and
    /// duplicates are not allowed. When they are, the new element replaces the
    /// old one.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a valid side index.
    pub fn add_mapping(&mut self, index: usize, element: T) -> Result<(), MappingError> {
        assert!(
            index < self.elements.len(),
            "side {index} out of range for a {}-way mapping",
            self.elements.len()
        );
        if self.elements[index].is_some() && !self.allow_duplicate_matching_adds {
            return Err(MappingError::Duplicate {
                side: index,
                name: element.mapping_name(),
            });
        }
        self.elements[index] = Some(element);
        self.diff.take();
        Ok(())
    }

    /// Element on side `index`, if present.
    #[must_use]
    pub fn element(&self, index: usize) -> Option<T> {
        self.elements.get(index).copied().flatten()
    }

    /// All slots.
    #[must_use]
    pub fn elements(&self) -> &[Option<T>] {
        &self.elements
    }

    /// Number of sides.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// The first present element, preferring the contract side.
    #[must_use]
    pub fn representative(&self) -> Option<T> {
        self.elements.iter().find_map(|e| *e)
    }

    /// Returns true if every side holds an element.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elements.iter().all(Option::is_some)
    }

    /// Whether repeated elements on one side replace each other.
    #[must_use]
    pub fn allows_duplicate_matching_adds(&self) -> bool {
        self.allow_duplicate_matching_adds
    }

    /// Classification from slot occupancy alone.
    #[must_use]
    pub fn occupancy(&self) -> DifferenceType {
        occupancy(&self.elements)
    }

    /// Settings shared by the whole mapping tree.
    #[must_use]
    pub fn settings(&self) -> &'a MappingSettings {
        self.settings
    }
}

impl<'a, T: MappedElement<'a>> ElementMapping<'a, T> {
    fn element_diff(&self) -> &ElementDiff {
        self.diff
            .get_or_init(|| ElementDiffer::new(self.settings).diff(&self.elements))
    }

    /// Classification combining slot occupancy with the rule results.
    #[must_use]
    pub fn difference(&self) -> DifferenceType {
        self.element_diff().difference
    }

    /// Differences recorded by the rules for this element.
    #[must_use]
    pub fn differences(&self) -> &[Difference] {
        &self.element_diff().differences
    }
}

impl<T: Element> std::fmt::Debug for ElementMapping<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<Option<String>> = self
            .elements
            .iter()
            .map(|e| e.map(|e| e.mapping_name()))
            .collect();
        f.debug_struct("ElementMapping")
            .field("elements", &names)
            .field("allow_duplicate_matching_adds", &self.allow_duplicate_matching_adds)
            .finish_non_exhaustive()
    }
}

//! Attribute sub-mappings.
//!
//! Built for every mapped type and member regardless of what the active filter
//! thinks of the attributes, so rules can still reason about attribute changes
//! and apply the filter themselves.

use indexmap::IndexMap;

use crate::differ::occupancy;
use crate::model::CustomAttribute;
use crate::types::DifferenceType;

/// The applications of one attribute type across the sides.
#[derive(Debug, Clone)]
pub struct AttributeMapping<'a> {
    elements: Vec<Option<&'a CustomAttribute>>,
}

impl<'a> AttributeMapping<'a> {
    fn new(element_count: usize) -> Self {
        Self {
            elements: vec![None; element_count],
        }
    }

    /// Application on side `index`, if present.
    #[must_use]
    pub fn element(&self, index: usize) -> Option<&'a CustomAttribute> {
        self.elements.get(index).copied().flatten()
    }

    /// The first present application, preferring the contract side.
    #[must_use]
    pub fn representative(&self) -> Option<&'a CustomAttribute> {
        self.elements.iter().find_map(|e| *e)
    }

    /// Classification from occupancy.
    #[must_use]
    pub fn difference(&self) -> DifferenceType {
        occupancy(&self.elements)
    }
}

/// Attribute applications of one element, aligned by attribute type.
///
/// Repeated applications of the same type on one side collapse to the last one.
#[derive(Debug, Clone)]
pub struct AttributesMapping<'a> {
    element_count: usize,
    attributes: IndexMap<&'a str, AttributeMapping<'a>>,
}

impl<'a> AttributesMapping<'a> {
    /// Creates an empty mapping with `element_count` sides.
    #[must_use]
    pub fn new(element_count: usize) -> Self {
        Self {
            element_count,
            attributes: IndexMap::new(),
        }
    }

    /// Aligns a contract and an implementation attribute list.
    #[must_use]
    pub fn between(contract: &'a [CustomAttribute], implementation: &'a [CustomAttribute]) -> Self {
        let mut mapping = Self::new(2);
        mapping.add_mapping(0, contract);
        mapping.add_mapping(1, implementation);
        mapping
    }

    /// Adds the attributes of side `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a valid side index.
    pub fn add_mapping(&mut self, index: usize, attributes: &'a [CustomAttribute]) {
        assert!(index < self.element_count, "side {index} out of range");
        for attribute in attributes {
            let count = self.element_count;
            self.attributes
                .entry(attribute.attribute_type.name.as_str())
                .or_insert_with(|| AttributeMapping::new(count))
                .elements[index] = Some(attribute);
        }
    }

    /// Aligned attribute types in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &AttributeMapping<'a>> {
        self.attributes.values()
    }

    /// Mapping for one attribute type.
    #[must_use]
    pub fn get(&self, attribute_type: &str) -> Option<&AttributeMapping<'a>> {
        self.attributes.get(attribute_type)
    }

    /// Number of distinct attribute types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns true if neither side has attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

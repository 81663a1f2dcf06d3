use std::ops::Deref;

use super::{AttributesMapping, ElementMapping, MappingError, MappingSettings};
use crate::model::MemberRef;

/// Alignment of one member across the sides.
#[derive(Debug)]
pub struct MemberMapping<'a> {
    mapping: ElementMapping<'a, MemberRef<'a>>,
    attributes: AttributesMapping<'a>,
}

impl<'a> MemberMapping<'a> {
    /// Creates an empty member mapping.
    #[must_use]
    pub fn new(settings: &'a MappingSettings, allow_duplicate_matching_adds: bool) -> Self {
        Self {
            mapping: ElementMapping::new(settings, allow_duplicate_matching_adds),
            attributes: AttributesMapping::new(settings.element_count),
        }
    }

    /// Places the member of side `index`.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::Duplicate`] if the side already holds this member.
    pub fn add_mapping(&mut self, index: usize, member: MemberRef<'a>) -> Result<(), MappingError> {
        self.mapping.add_mapping(index, member)?;
        self.attributes.add_mapping(index, &member.member.attributes);
        Ok(())
    }

    /// Attribute applications aligned across the sides.
    #[must_use]
    pub fn attributes(&self) -> &AttributesMapping<'a> {
        &self.attributes
    }
}

impl<'a> Deref for MemberMapping<'a> {
    type Target = ElementMapping<'a, MemberRef<'a>>;

    fn deref(&self) -> &Self::Target {
        &self.mapping
    }
}

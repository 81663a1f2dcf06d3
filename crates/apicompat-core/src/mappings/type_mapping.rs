use std::ops::Deref;

use indexmap::IndexMap;

use super::{AttributesMapping, ElementMapping, MappingError, MappingSettings, MemberMapping};
use crate::model::{MemberKind, TypeDefinition};

/// Alignment of one type across the sides, with its members.
///
/// Accessors are left out; they are compared through their property or event.
/// Delegate members are left out too; the delegate rule compares signatures.
#[derive(Debug)]
pub struct TypeMapping<'a> {
    mapping: ElementMapping<'a, &'a TypeDefinition>,
    members: IndexMap<String, MemberMapping<'a>>,
    attributes: AttributesMapping<'a>,
}

impl<'a> TypeMapping<'a> {
    /// Creates an empty type mapping.
    #[must_use]
    pub fn new(settings: &'a MappingSettings, allow_duplicate_matching_adds: bool) -> Self {
        Self {
            mapping: ElementMapping::new(settings, allow_duplicate_matching_adds),
            members: IndexMap::new(),
            attributes: AttributesMapping::new(settings.element_count),
        }
    }

    /// Places the type of side `index` and aligns its members.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::Duplicate`] if the side already holds this type
    /// or one of its members and duplicates are not allowed.
    pub fn add_mapping(&mut self, index: usize, ty: &'a TypeDefinition) -> Result<(), MappingError> {
        self.mapping.add_mapping(index, ty)?;
        self.attributes.add_mapping(index, &ty.attributes);

        if ty.is_delegate() {
            return Ok(());
        }

        let settings = self.mapping.settings();
        let allow_duplicates = self.mapping.allows_duplicate_matching_adds();
        for member in ty.member_refs() {
            if member.member.kind == MemberKind::Accessor || !settings.filter.include_member(member) {
                continue;
            }
            self.members
                .entry(member.doc_id())
                .or_insert_with(|| MemberMapping::new(settings, allow_duplicates))
                .add_mapping(index, member)?;
        }
        Ok(())
    }

    /// Member mappings in first-seen order.
    pub fn members(&self) -> impl Iterator<Item = &MemberMapping<'a>> {
        self.members.values()
    }

    /// Member mapping by doc id.
    #[must_use]
    pub fn member(&self, doc_id: &str) -> Option<&MemberMapping<'a>> {
        self.members.get(doc_id)
    }

    /// Attribute applications aligned across the sides.
    #[must_use]
    pub fn attributes(&self) -> &AttributesMapping<'a> {
        &self.attributes
    }

    /// Members are compared only when the type exists on every side and is not
    /// a delegate.
    #[must_use]
    pub fn should_diff_members(&self) -> bool {
        self.mapping.is_complete()
            && self
                .mapping
                .representative()
                .is_some_and(|ty| !ty.is_delegate())
    }
}

impl<'a> Deref for TypeMapping<'a> {
    type Target = ElementMapping<'a, &'a TypeDefinition>;

    fn deref(&self) -> &Self::Target {
        &self.mapping
    }
}

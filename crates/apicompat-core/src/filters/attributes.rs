//! Attribute driven filters.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use super::{read_doc_ids, ApiFilter, FilterError};
use crate::model::{CustomAttribute, MemberRef, TypeDefinition};

/// Excludes types and members marked with a given attribute.
///
/// Members of a marked type are excluded with it.
#[derive(Debug, Clone)]
pub struct AttributeMarkedFilter {
    attribute_type: String,
}

impl AttributeMarkedFilter {
    /// Creates a filter for the fully qualified attribute type name.
    #[must_use]
    pub fn new(attribute_type: impl Into<String>) -> Self {
        Self {
            attribute_type: attribute_type.into(),
        }
    }
}

impl ApiFilter for AttributeMarkedFilter {
    fn include_type(&self, ty: &TypeDefinition) -> bool {
        !ty.has_attribute(&self.attribute_type)
    }

    fn include_member(&self, member: MemberRef<'_>) -> bool {
        self.include_type(member.containing_type)
            && !member.member.has_attribute(&self.attribute_type)
    }

    fn include_attribute(&self, _attribute: &CustomAttribute) -> bool {
        true
    }
}

/// Filter dropping Mono stubs: APIs marked `System.MonoTODOAttribute` because
/// they have no real implementation.
#[must_use]
pub fn mono_stub_filter() -> AttributeMarkedFilter {
    AttributeMarkedFilter::new("System.MonoTODOAttribute")
}

/// Wraps another filter and additionally drops listed attribute types.
#[derive(Clone)]
pub struct ExcludeAttributesFilter {
    inner: Arc<dyn ApiFilter>,
    attribute_doc_ids: HashSet<String>,
}

impl ExcludeAttributesFilter {
    /// Creates the wrapper from attribute doc ids (`T:Namespace.NameAttribute`).
    #[must_use]
    pub fn new<I, S>(inner: Arc<dyn ApiFilter>, attribute_doc_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner,
            attribute_doc_ids: attribute_doc_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates the wrapper from a doc id file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_file(inner: Arc<dyn ApiFilter>, path: &Path) -> Result<Self, FilterError> {
        Ok(Self {
            inner,
            attribute_doc_ids: read_doc_ids(path)?,
        })
    }
}

impl ApiFilter for ExcludeAttributesFilter {
    fn include_type(&self, ty: &TypeDefinition) -> bool {
        self.inner.include_type(ty)
    }

    fn include_member(&self, member: MemberRef<'_>) -> bool {
        self.inner.include_member(member)
    }

    fn include_attribute(&self, attribute: &CustomAttribute) -> bool {
        !self.attribute_doc_ids.contains(&attribute.doc_id())
            && self.inner.include_attribute(attribute)
    }
}

impl std::fmt::Debug for ExcludeAttributesFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExcludeAttributesFilter")
            .field("attribute_doc_ids", &self.attribute_doc_ids)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::PublicOnlyFilter;
    use crate::model::MemberDefinition;

    #[test]
    fn mono_stubs_are_excluded() {
        let filter = mono_stub_filter();
        let stub = TypeDefinition::class("N", "Stub")
            .with_attribute(CustomAttribute::new("System.MonoTODOAttribute"));
        let real = TypeDefinition::class("N", "Real").with_member(
            MemberDefinition::method("Todo")
                .with_attribute(CustomAttribute::new("System.MonoTODOAttribute")),
        );

        assert!(!filter.include_type(&stub));
        assert!(filter.include_type(&real));
        assert!(!filter.include_member(real.member_refs().next().unwrap()));
    }

    #[test]
    fn members_of_marked_types_are_excluded() {
        let filter = AttributeMarkedFilter::new("N.HiddenAttribute");
        let ty = TypeDefinition::class("N", "T")
            .with_attribute(CustomAttribute::new("N.HiddenAttribute"))
            .with_member(MemberDefinition::method("M"));
        assert!(!filter.include_member(ty.member_refs().next().unwrap()));
    }

    #[test]
    fn exclude_attributes_wraps_inner_filter() {
        let inner: Arc<dyn ApiFilter> = Arc::new(PublicOnlyFilter::new().exclude_attributes(false));
        let filter = ExcludeAttributesFilter::new(inner, ["T:System.Runtime.CompilerServices.NullableAttribute"]);

        assert!(!filter.include_attribute(&CustomAttribute::new(
            "System.Runtime.CompilerServices.NullableAttribute"
        )));
        assert!(filter.include_attribute(&CustomAttribute::new("System.ObsoleteAttribute")));
        assert!(filter.include_type(&TypeDefinition::class("N", "T")));
    }
}

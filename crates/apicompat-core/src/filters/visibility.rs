//! Visibility based filters.

use super::ApiFilter;
use crate::model::{CustomAttribute, MemberRef, TypeDefinition};

/// Attribute marking a declaration's IDE visibility.
const EDITOR_BROWSABLE: &str = "System.ComponentModel.EditorBrowsableAttribute";

/// Includes every declaration.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncludeAllFilter;

impl ApiFilter for IncludeAllFilter {
    fn include_type(&self, _ty: &TypeDefinition) -> bool {
        true
    }

    fn include_member(&self, _member: MemberRef<'_>) -> bool {
        true
    }

    fn include_attribute(&self, _attribute: &CustomAttribute) -> bool {
        true
    }
}

/// Includes every type and member; attributes are all in or all out.
#[derive(Debug, Clone, Copy)]
pub struct AttributesFilter {
    include_attributes: bool,
}

impl AttributesFilter {
    /// Creates the filter.
    #[must_use]
    pub fn new(include_attributes: bool) -> Self {
        Self { include_attributes }
    }
}

impl ApiFilter for AttributesFilter {
    fn include_type(&self, _ty: &TypeDefinition) -> bool {
        true
    }

    fn include_member(&self, _member: MemberRef<'_>) -> bool {
        true
    }

    fn include_attribute(&self, _attribute: &CustomAttribute) -> bool {
        self.include_attributes
    }
}

/// Includes what other assemblies can see: visible types and their public or
/// protected members.
#[derive(Debug, Clone, Copy)]
pub struct PublicOnlyFilter {
    /// Treat forwarded types as part of the surface.
    pub include_forwarded_types: bool,
    /// Drop every attribute application.
    pub exclude_attributes: bool,
}

impl Default for PublicOnlyFilter {
    fn default() -> Self {
        Self {
            include_forwarded_types: false,
            exclude_attributes: true,
        }
    }
}

impl PublicOnlyFilter {
    /// Creates a filter that drops attributes and forwarded types.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether forwarded types are included.
    #[must_use]
    pub fn include_forwarded_types(mut self, include: bool) -> Self {
        self.include_forwarded_types = include;
        self
    }

    /// Sets whether attributes are dropped.
    #[must_use]
    pub fn exclude_attributes(mut self, exclude: bool) -> Self {
        self.exclude_attributes = exclude;
        self
    }
}

impl ApiFilter for PublicOnlyFilter {
    fn include_type(&self, ty: &TypeDefinition) -> bool {
        if ty.is_forwarded && !self.include_forwarded_types {
            return false;
        }
        ty.is_visible_outside_assembly()
    }

    fn include_member(&self, member: MemberRef<'_>) -> bool {
        if !member.containing_type.is_visible_outside_assembly() {
            return false;
        }
        // Protected members count: derived types in other assemblies see them.
        member.member.visibility.is_visible_outside_assembly()
    }

    fn include_attribute(&self, _attribute: &CustomAttribute) -> bool {
        !self.exclude_attributes
    }
}

/// Public-only filter that also hides declarations marked
/// `[EditorBrowsable(EditorBrowsableState.Never)]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditorBrowsableFilter {
    inner: PublicOnlyFilter,
}

impl EditorBrowsableFilter {
    /// Wraps a public-only filter.
    #[must_use]
    pub fn new(inner: PublicOnlyFilter) -> Self {
        Self { inner }
    }

    fn is_never_browsable(attributes: &[CustomAttribute]) -> bool {
        attributes.iter().any(|a| {
            a.is(EDITOR_BROWSABLE)
                && a
                    .arguments
                    .iter()
                    .any(|arg| arg.ends_with("Never") || arg.trim() == "1")
        })
    }
}

impl ApiFilter for EditorBrowsableFilter {
    fn include_type(&self, ty: &TypeDefinition) -> bool {
        self.inner.include_type(ty) && !Self::is_never_browsable(&ty.attributes)
    }

    fn include_member(&self, member: MemberRef<'_>) -> bool {
        self.inner.include_member(member) && !Self::is_never_browsable(&member.member.attributes)
    }

    fn include_attribute(&self, attribute: &CustomAttribute) -> bool {
        self.inner.include_attribute(attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MemberDefinition, NamespaceDefinition, Visibility};

    fn member_of(ty: &TypeDefinition) -> MemberRef<'_> {
        ty.member_refs().next().unwrap()
    }

    #[test]
    fn public_only_includes_visible_types() {
        let filter = PublicOnlyFilter::new();
        assert!(filter.include_type(&TypeDefinition::class("N", "Public")));
        assert!(!filter.include_type(
            &TypeDefinition::class("N", "Internal").with_visibility(Visibility::Assembly)
        ));
    }

    #[test]
    fn public_only_respects_forwarded_switch() {
        let forwarded = TypeDefinition::class("N", "Moved").forwarded();
        assert!(!PublicOnlyFilter::new().include_type(&forwarded));
        assert!(PublicOnlyFilter::new()
            .include_forwarded_types(true)
            .include_type(&forwarded));
    }

    #[test]
    fn public_only_keeps_protected_members() {
        let filter = PublicOnlyFilter::new();
        for (visibility, expected) in [
            (Visibility::Public, true),
            (Visibility::Family, true),
            (Visibility::FamilyOrAssembly, true),
            (Visibility::FamilyAndAssembly, false),
            (Visibility::Assembly, false),
            (Visibility::Private, false),
        ] {
            let ty = TypeDefinition::class("N", "T")
                .with_member(MemberDefinition::method("M").with_visibility(visibility));
            assert_eq!(filter.include_member(member_of(&ty)), expected, "{visibility}");
        }
    }

    #[test]
    fn public_only_drops_members_of_hidden_types() {
        let ty = TypeDefinition::class("N", "T")
            .with_visibility(Visibility::Assembly)
            .with_member(MemberDefinition::method("M"));
        assert!(!PublicOnlyFilter::new().include_member(member_of(&ty)));
    }

    #[test]
    fn public_only_drops_public_types_nested_in_hidden_ones() {
        let filter = PublicOnlyFilter::new();
        let hidden = TypeDefinition::class("N", "Hidden").with_visibility(Visibility::Assembly);
        let helper = TypeDefinition::class("N", "Helper")
            .nested_in_type(&hidden)
            .with_member(MemberDefinition::method("Run"));
        assert!(!filter.include_type(&helper));
        assert!(!filter.include_member(member_of(&helper)));

        let family = TypeDefinition::class("N", "Base").with_visibility(Visibility::Family);
        let nested = TypeDefinition::class("N", "Nested").nested_in_type(&family);
        assert!(filter.include_type(&nested));
    }

    #[test]
    fn namespace_inclusion_follows_types() {
        let filter = PublicOnlyFilter::new();
        let hidden = NamespaceDefinition::new("N").with_type(
            TypeDefinition::class("N", "Internal").with_visibility(Visibility::Assembly),
        );
        let visible = hidden.clone().with_type(TypeDefinition::class("N", "Public"));
        assert!(!filter.include_namespace(&hidden));
        assert!(filter.include_namespace(&visible));
        assert!(!filter.include_namespace(&NamespaceDefinition::new("Empty")));
    }

    #[test]
    fn attribute_switches() {
        let attribute = CustomAttribute::new("System.ObsoleteAttribute");
        assert!(!PublicOnlyFilter::new().include_attribute(&attribute));
        assert!(PublicOnlyFilter::new()
            .exclude_attributes(false)
            .include_attribute(&attribute));
        assert!(AttributesFilter::new(true).include_attribute(&attribute));
        assert!(!AttributesFilter::new(false).include_attribute(&attribute));
        assert!(IncludeAllFilter.include_attribute(&attribute));
    }

    #[test]
    fn editor_browsable_never_is_hidden() {
        let filter = EditorBrowsableFilter::default();
        let hidden = TypeDefinition::class("N", "Hidden").with_attribute(
            CustomAttribute::new(EDITOR_BROWSABLE)
                .with_argument("System.ComponentModel.EditorBrowsableState.Never"),
        );
        let advanced = TypeDefinition::class("N", "Advanced").with_attribute(
            CustomAttribute::new(EDITOR_BROWSABLE)
                .with_argument("System.ComponentModel.EditorBrowsableState.Advanced"),
        );
        assert!(!filter.include_type(&hidden));
        assert!(filter.include_type(&advanced));
    }
}

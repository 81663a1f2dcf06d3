//! Filters over mapping nodes, deciding what the traverser descends into.

use std::sync::Arc;

use super::ApiFilter;
use crate::mappings::{AssemblyMapping, MemberMapping, NamespaceMapping, TypeMapping};
use crate::types::DifferenceType;

/// Decides which mapping nodes are visited.
pub trait MappingFilter: Send + Sync {
    /// Returns true if the assembly is visited.
    fn include_assembly(&self, assembly: &AssemblyMapping<'_>) -> bool;

    /// Returns true if the namespace is visited.
    fn include_namespace(&self, namespace: &NamespaceMapping<'_>) -> bool;

    /// Returns true if the type is visited.
    fn include_type(&self, ty: &TypeMapping<'_>) -> bool;

    /// Returns true if the member of `containing_type` is visited.
    fn include_member(&self, containing_type: &TypeMapping<'_>, member: &MemberMapping<'_>) -> bool;

    /// Returns true if elements with this classification are of interest.
    fn include_difference(&self, difference: DifferenceType) -> bool;
}

type DifferencePredicate = Box<dyn Fn(DifferenceType) -> bool + Send + Sync>;

/// Visits a node if its own classification is of interest or any visible
/// descendant's is.
pub struct MappingDifferenceFilter {
    include: DifferencePredicate,
    filter: Arc<dyn ApiFilter>,
    include_members: bool,
}

impl MappingDifferenceFilter {
    /// Creates a filter from a classification predicate and the API filter
    /// deciding which side elements count as visible.
    #[must_use]
    pub fn new<F>(include: F, filter: Arc<dyn ApiFilter>) -> Self
    where
        F: Fn(DifferenceType) -> bool + Send + Sync + 'static,
    {
        Self {
            include: Box::new(include),
            filter,
            include_members: true,
        }
    }

    /// Visits everything that is not [`DifferenceType::Unchanged`].
    #[must_use]
    pub fn changes_only(filter: Arc<dyn ApiFilter>) -> Self {
        Self::new(|d| d != DifferenceType::Unchanged, filter)
    }
}

impl MappingFilter for MappingDifferenceFilter {
    fn include_assembly(&self, assembly: &AssemblyMapping<'_>) -> bool {
        if assembly.namespaces().next().is_some() && self.include_difference(assembly.difference()) {
            return true;
        }
        assembly.namespaces().any(|ns| self.include_namespace(ns))
    }

    fn include_namespace(&self, namespace: &NamespaceMapping<'_>) -> bool {
        if namespace.types().next().is_some() && self.include_difference(namespace.difference()) {
            return true;
        }
        namespace.types().any(|ty| self.include_type(ty))
    }

    fn include_type(&self, ty: &TypeMapping<'_>) -> bool {
        let any_included = ty
            .elements()
            .iter()
            .flatten()
            .any(|t| self.filter.include_type(t));
        if !any_included {
            return false;
        }
        if self.include_difference(ty.difference()) {
            return true;
        }
        ty.should_diff_members() && ty.members().any(|m| self.include_member(ty, m))
    }

    fn include_member(&self, _containing_type: &TypeMapping<'_>, member: &MemberMapping<'_>) -> bool {
        if !self.include_members {
            return false;
        }
        let any_included = member
            .elements()
            .iter()
            .flatten()
            .any(|m| self.filter.include_member(*m));
        any_included && self.include_difference(member.difference())
    }

    fn include_difference(&self, difference: DifferenceType) -> bool {
        (self.include)(difference)
    }
}

impl std::fmt::Debug for MappingDifferenceFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingDifferenceFilter")
            .field("include_members", &self.include_members)
            .finish_non_exhaustive()
    }
}

/// A [`MappingDifferenceFilter`] that never visits members.
#[derive(Debug)]
pub struct TypesOnlyMappingFilter {
    inner: MappingDifferenceFilter,
}

impl TypesOnlyMappingFilter {
    /// Restricts `inner` to types.
    #[must_use]
    pub fn new(mut inner: MappingDifferenceFilter) -> Self {
        inner.include_members = false;
        Self { inner }
    }
}

impl MappingFilter for TypesOnlyMappingFilter {
    fn include_assembly(&self, assembly: &AssemblyMapping<'_>) -> bool {
        self.inner.include_assembly(assembly)
    }

    fn include_namespace(&self, namespace: &NamespaceMapping<'_>) -> bool {
        self.inner.include_namespace(namespace)
    }

    fn include_type(&self, ty: &TypeMapping<'_>) -> bool {
        self.inner.include_type(ty)
    }

    fn include_member(&self, _containing_type: &TypeMapping<'_>, _member: &MemberMapping<'_>) -> bool {
        false
    }

    fn include_difference(&self, difference: DifferenceType) -> bool {
        self.inner.include_difference(difference)
    }
}

/// Restricts another filter to types present on both sides, optionally
/// letting added or removed types through.
pub struct CommonTypesMappingFilter {
    base: Box<dyn MappingFilter>,
    include_added_types: bool,
    include_removed_types: bool,
}

impl CommonTypesMappingFilter {
    /// Wraps `base`.
    #[must_use]
    pub fn new(base: Box<dyn MappingFilter>, include_added_types: bool, include_removed_types: bool) -> Self {
        Self {
            base,
            include_added_types,
            include_removed_types,
        }
    }
}

impl MappingFilter for CommonTypesMappingFilter {
    fn include_assembly(&self, assembly: &AssemblyMapping<'_>) -> bool {
        self.base.include_assembly(assembly) && assembly.namespaces().any(|ns| self.include_namespace(ns))
    }

    fn include_namespace(&self, namespace: &NamespaceMapping<'_>) -> bool {
        self.base.include_namespace(namespace) && namespace.types().any(|ty| self.include_type(ty))
    }

    fn include_type(&self, ty: &TypeMapping<'_>) -> bool {
        let included = match ty.difference() {
            DifferenceType::Added => self.include_added_types,
            DifferenceType::Removed => self.include_removed_types,
            _ => true,
        };
        included && self.base.include_type(ty)
    }

    fn include_member(&self, containing_type: &TypeMapping<'_>, member: &MemberMapping<'_>) -> bool {
        self.base.include_member(containing_type, member) && self.include_type(containing_type)
    }

    fn include_difference(&self, difference: DifferenceType) -> bool {
        self.base.include_difference(difference)
    }
}

impl std::fmt::Debug for CommonTypesMappingFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommonTypesMappingFilter")
            .field("include_added_types", &self.include_added_types)
            .field("include_removed_types", &self.include_removed_types)
            .finish_non_exhaustive()
    }
}

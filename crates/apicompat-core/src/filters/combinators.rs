//! Filter combinators.

use std::sync::Arc;

use super::ApiFilter;
use crate::model::{CustomAttribute, MemberRef, NamespaceDefinition, TypeDefinition};

/// Includes a declaration only if both filters include it.
#[derive(Clone)]
pub struct IntersectionFilter {
    left: Arc<dyn ApiFilter>,
    right: Arc<dyn ApiFilter>,
}

impl IntersectionFilter {
    /// Combines two filters.
    #[must_use]
    pub fn new(left: Arc<dyn ApiFilter>, right: Arc<dyn ApiFilter>) -> Self {
        Self { left, right }
    }
}

impl ApiFilter for IntersectionFilter {
    fn include_namespace(&self, namespace: &NamespaceDefinition) -> bool {
        namespace
            .types
            .iter()
            .any(|ty| self.left.include_type(ty) && self.right.include_type(ty))
    }

    fn include_type(&self, ty: &TypeDefinition) -> bool {
        self.left.include_type(ty) && self.right.include_type(ty)
    }

    fn include_member(&self, member: MemberRef<'_>) -> bool {
        self.left.include_member(member) && self.right.include_member(member)
    }

    fn include_attribute(&self, attribute: &CustomAttribute) -> bool {
        self.left.include_attribute(attribute) && self.right.include_attribute(attribute)
    }
}

impl std::fmt::Debug for IntersectionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntersectionFilter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{DocIdExcludeListFilter, PublicOnlyFilter};
    use crate::model::Visibility;

    fn public_minus(doc_id: &str) -> IntersectionFilter {
        IntersectionFilter::new(
            Arc::new(PublicOnlyFilter::new()),
            Arc::new(DocIdExcludeListFilter::new([doc_id])),
        )
    }

    #[test]
    fn intersection_excludes_listed_public_type() {
        let filter = public_minus("T:N.T");
        assert!(!filter.include_type(&TypeDefinition::class("N", "T")));
        for name in ["U", "V", "TT", "T2"] {
            assert!(filter.include_type(&TypeDefinition::class("N", name)), "{name}");
        }
    }

    #[test]
    fn intersection_still_requires_visibility() {
        let filter = public_minus("T:N.T");
        assert!(!filter.include_type(
            &TypeDefinition::class("N", "U").with_visibility(Visibility::Assembly)
        ));
    }

    #[test]
    fn namespace_with_only_excluded_types_disappears() {
        let filter = public_minus("T:N.T");
        let ns = NamespaceDefinition::new("N")
            .with_type(TypeDefinition::class("N", "T"))
            .with_type(TypeDefinition::class("N", "U").with_visibility(Visibility::Assembly));
        assert!(!filter.include_namespace(&ns));
    }
}

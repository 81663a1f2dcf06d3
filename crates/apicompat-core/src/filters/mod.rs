//! Filters deciding which declarations, mappings and differences take part in a
//! comparison.
//!
//! Three families live here:
//!
//! - [`ApiFilter`] answers "should this namespace/type/member/attribute be
//!   considered at all". It is consulted while mappings are built and by rules.
//! - [`MappingFilter`] decides which mapping nodes the traverser descends into.
//! - [`DifferenceFilter`] decides which recorded differences are reported.

mod attributes;
mod combinators;
mod difference;
mod doc_id;
mod mapping;
mod visibility;

use std::sync::Arc;

use crate::model::{CustomAttribute, MemberRef, NamespaceDefinition, TypeDefinition};

pub use attributes::{mono_stub_filter, AttributeMarkedFilter, ExcludeAttributesFilter};
pub use combinators::IntersectionFilter;
pub use difference::{BaselineDifferenceFilter, DifferenceFilter, SeverityFilter};
pub use doc_id::{read_doc_ids, DocIdExcludeListFilter, DocIdIncludeListFilter, REMOVE_USAGES_PREFIX};
pub use mapping::{
    CommonTypesMappingFilter, MappingDifferenceFilter, MappingFilter, TypesOnlyMappingFilter,
};
pub use visibility::{AttributesFilter, EditorBrowsableFilter, IncludeAllFilter, PublicOnlyFilter};

/// Predicate family selecting the declarations that take part in a comparison.
///
/// Every predicate is pure. Namespace inclusion is always derived from type
/// inclusion, so a namespace whose types are all filtered out disappears
/// instead of showing up as an empty difference.
pub trait ApiFilter: Send + Sync {
    /// Returns true if the namespace contains at least one included type.
    fn include_namespace(&self, namespace: &NamespaceDefinition) -> bool {
        namespace.types.iter().any(|ty| self.include_type(ty))
    }

    /// Returns true if the type takes part in the comparison.
    fn include_type(&self, ty: &TypeDefinition) -> bool;

    /// Returns true if the member takes part in the comparison.
    fn include_member(&self, member: MemberRef<'_>) -> bool;

    /// Returns true if the attribute application takes part in the comparison.
    fn include_attribute(&self, attribute: &CustomAttribute) -> bool;
}

impl<F: ApiFilter + ?Sized> ApiFilter for Arc<F> {
    fn include_type(&self, ty: &TypeDefinition) -> bool {
        (**self).include_type(ty)
    }

    fn include_member(&self, member: MemberRef<'_>) -> bool {
        (**self).include_member(member)
    }

    fn include_attribute(&self, attribute: &CustomAttribute) -> bool {
        (**self).include_attribute(attribute)
    }
}

/// Errors reading filter input files.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// IO error reading a doc id list or baseline.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: std::path::PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A baseline file was configured but does not exist.
    #[error("Baseline file {path} was not found")]
    BaselineNotFound {
        /// Configured baseline path.
        path: std::path::PathBuf,
    },
}

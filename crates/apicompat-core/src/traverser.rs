//! Depth-first walk over a mapping tree, reporting differences to a visitor.

use tracing::debug;

use crate::filters::{DifferenceFilter, MappingFilter};
use crate::mappings::{
    AssemblyMapping, AssemblySetMapping, ElementMapping, MappedElement, NamespaceMapping,
    TypeMapping,
};
use crate::types::Difference;

/// Receives the differences found by a [`DifferenceTraverser`].
///
/// When the mapping groups by assembly, every assembly's differences are
/// bracketed by [`enter_assembly`](Self::enter_assembly) and
/// [`leave_assembly`](Self::leave_assembly).
pub trait DifferenceVisitor {
    /// Error returned by the visitor, e.g. an I/O error from a writer.
    type Error;

    /// Called before the differences of an assembly.
    ///
    /// # Errors
    ///
    /// Implementations decide.
    fn enter_assembly(&mut self, name: &str) -> Result<(), Self::Error>;

    /// Called after the differences of an assembly.
    ///
    /// # Errors
    ///
    /// Implementations decide.
    fn leave_assembly(&mut self, name: &str) -> Result<(), Self::Error>;

    /// Called for every reported difference, in traversal order.
    ///
    /// # Errors
    ///
    /// Implementations decide.
    fn visit_difference(&mut self, difference: &Difference) -> Result<(), Self::Error>;
}

/// Walks assemblies, namespaces, types and members, children before the
/// element's own differences.
///
/// A node is entered only if the mapping filter includes it, and a difference
/// is reported only if the difference filter includes it.
pub struct DifferenceTraverser<'f> {
    mapping_filter: &'f dyn MappingFilter,
    difference_filter: &'f dyn DifferenceFilter,
}

impl<'f> DifferenceTraverser<'f> {
    /// Creates a traverser.
    #[must_use]
    pub fn new(
        mapping_filter: &'f dyn MappingFilter,
        difference_filter: &'f dyn DifferenceFilter,
    ) -> Self {
        Self {
            mapping_filter,
            difference_filter,
        }
    }

    /// Walks the whole tree and returns the number of reported differences.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the visitor.
    pub fn traverse<V: DifferenceVisitor>(
        &self,
        mapping: &AssemblySetMapping<'_>,
        visitor: &mut V,
    ) -> Result<usize, V::Error> {
        let mut reported = 0;
        for assembly in mapping.assemblies() {
            reported += self.visit_assembly(assembly, visitor)?;
        }
        for namespace in mapping.namespaces() {
            reported += self.visit_namespace(namespace, visitor)?;
        }
        debug!(reported, "Traversal finished");
        Ok(reported)
    }

    fn visit_assembly<V: DifferenceVisitor>(
        &self,
        assembly: &AssemblyMapping<'_>,
        visitor: &mut V,
    ) -> Result<usize, V::Error> {
        if !self.mapping_filter.include_assembly(assembly) {
            return Ok(0);
        }
        visitor.enter_assembly(assembly.name())?;
        let mut reported = 0;
        for namespace in assembly.namespaces() {
            reported += self.visit_namespace(namespace, visitor)?;
        }
        reported += self.visit_differences(&**assembly, visitor)?;
        visitor.leave_assembly(assembly.name())?;
        Ok(reported)
    }

    fn visit_namespace<V: DifferenceVisitor>(
        &self,
        namespace: &NamespaceMapping<'_>,
        visitor: &mut V,
    ) -> Result<usize, V::Error> {
        if !self.mapping_filter.include_namespace(namespace) {
            return Ok(0);
        }
        let mut reported = 0;
        for ty in namespace.types() {
            reported += self.visit_type(ty, visitor)?;
        }
        reported += self.visit_differences(&**namespace, visitor)?;
        Ok(reported)
    }

    fn visit_type<V: DifferenceVisitor>(
        &self,
        ty: &TypeMapping<'_>,
        visitor: &mut V,
    ) -> Result<usize, V::Error> {
        if !self.mapping_filter.include_type(ty) {
            return Ok(0);
        }
        let mut reported = 0;
        if ty.should_diff_members() {
            for member in ty.members() {
                if self.mapping_filter.include_member(ty, member) {
                    reported += self.visit_differences(&**member, visitor)?;
                }
            }
        }
        reported += self.visit_differences(&**ty, visitor)?;
        Ok(reported)
    }

    fn visit_differences<'a, T, V>(
        &self,
        mapping: &ElementMapping<'a, T>,
        visitor: &mut V,
    ) -> Result<usize, V::Error>
    where
        T: MappedElement<'a>,
        V: DifferenceVisitor,
    {
        let mut reported = 0;
        for difference in mapping.differences() {
            if self.difference_filter.include(difference) {
                visitor.visit_difference(difference)?;
                reported += 1;
            }
        }
        Ok(reported)
    }
}

impl std::fmt::Debug for DifferenceTraverser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DifferenceTraverser").finish_non_exhaustive()
    }
}

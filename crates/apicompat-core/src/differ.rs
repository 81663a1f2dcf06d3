//! Classification of mapped elements.

use crate::mappings::{MappedElement, MappingSettings};
use crate::types::{Difference, DifferenceType, Differences};

/// Classifies a set of slots by occupancy alone.
///
/// - no element: [`DifferenceType::Unknown`]
/// - contract slot empty: [`DifferenceType::Added`]
/// - contract present, another side empty: [`DifferenceType::Removed`]
/// - every side present: [`DifferenceType::Unchanged`]
#[must_use]
pub fn occupancy<T>(elements: &[Option<T>]) -> DifferenceType {
    match elements.split_first() {
        None => DifferenceType::Unknown,
        Some((contract, others)) => {
            if contract.is_none() {
                if others.iter().any(Option::is_some) {
                    DifferenceType::Added
                } else {
                    DifferenceType::Unknown
                }
            } else if others.iter().any(Option::is_none) {
                DifferenceType::Removed
            } else {
                DifferenceType::Unchanged
            }
        }
    }
}

/// Classification and findings for one mapped element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementDiff {
    /// Final classification.
    pub difference: DifferenceType,
    /// Differences recorded by the rules, in rule order.
    pub differences: Vec<Difference>,
}

/// Runs the rule set over a mapped element.
///
/// The contract (slot 0) is compared with every other side in turn. One-sided
/// elements keep their occupancy classification; rules still see them so that
/// removals can be reported. For elements present everywhere the rule results
/// are merged by priority, and any incompatible finding makes the element
/// [`DifferenceType::Changed`]. Warnings never change the classification: a
/// pair whose only findings are warnings stays [`DifferenceType::Unchanged`].
#[derive(Debug, Clone, Copy)]
pub struct ElementDiffer<'s> {
    settings: &'s MappingSettings,
}

impl<'s> ElementDiffer<'s> {
    /// Creates a differ over the rules and filter in `settings`.
    #[must_use]
    pub fn new(settings: &'s MappingSettings) -> Self {
        Self { settings }
    }

    /// Classifies one element.
    #[must_use]
    pub fn diff<'a, T: MappedElement<'a>>(&self, elements: &[Option<T>]) -> ElementDiff {
        let occupied = occupancy(elements);
        if occupied == DifferenceType::Unknown {
            return ElementDiff::default();
        }

        let contract = elements[0];
        let mut differences = Vec::new();
        let mut rule_result = DifferenceType::Unknown;

        for implementation in &elements[1..] {
            if contract.is_none() && implementation.is_none() {
                continue;
            }
            let pair = T::element_pair(contract, *implementation);
            let mut collector = Differences::new(
                pair.doc_id(),
                &self.settings.operands,
                self.settings.filter.as_ref(),
            );
            rule_result = rule_result.merge(self.settings.rules.diff(&mut collector, &pair));
            differences.extend(collector.into_items());
        }

        let difference = if occupied == DifferenceType::Unchanged {
            if differences.iter().any(Difference::is_incompatible) {
                DifferenceType::Changed
            } else {
                occupied.merge(rule_result)
            }
        } else {
            occupied
        };

        ElementDiff {
            difference,
            differences,
        }
    }
}

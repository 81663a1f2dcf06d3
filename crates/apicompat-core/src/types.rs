//! Core types for compatibility differences and their collection.

use serde::{Deserialize, Serialize};

use crate::filters::ApiFilter;

/// Classification of a mapped element.
///
/// The ordinal is a priority: when several rules (or traversal levels) report
/// different classifications for the same element, the higher one wins.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum DifferenceType {
    /// Not yet resolved, or a rule that does not apply.
    #[default]
    Unknown,
    /// Present on every side with no rule firing.
    Unchanged,
    /// Present only on the non-contract sides.
    Added,
    /// Present on the contract side but missing from another side.
    Removed,
    /// Present on every side but at least one rule fired.
    Changed,
}

impl DifferenceType {
    /// Combines two classifications, keeping the higher-priority one.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        self.max(other)
    }
}

impl std::fmt::Display for DifferenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Unchanged => write!(f, "Unchanged"),
            Self::Added => write!(f, "Added"),
            Self::Removed => write!(f, "Removed"),
            Self::Changed => write!(f, "Changed"),
        }
    }
}

/// Severity of a recorded difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational finding.
    Info,
    /// Something looked wrong but could not be evaluated.
    Warning,
    /// A breaking change.
    Incompatible,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Incompatible => write!(f, "incompatible"),
        }
    }
}

/// The two type names involved in a type mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMismatch {
    /// Type on the contract side.
    pub contract: String,
    /// Type on the implementation side.
    pub implementation: String,
}

/// One recorded compatibility finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difference {
    /// Machine readable identifier, e.g. `CannotSealType`.
    pub id: String,
    /// Formatted message naming the element and the differing values.
    pub message: String,
    /// Severity of this finding.
    pub severity: Severity,
    /// Doc id of the element pair that produced the finding.
    pub target: String,
    /// Types involved when the finding is a type mismatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_mismatch: Option<TypeMismatch>,
}

impl Difference {
    /// Creates an incompatible difference.
    #[must_use]
    pub fn incompatible(
        id: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            severity: Severity::Incompatible,
            target: target.into(),
            type_mismatch: None,
        }
    }

    /// Overrides the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Attaches the mismatching types.
    #[must_use]
    pub fn with_type_mismatch(
        mut self,
        contract: impl Into<String>,
        implementation: impl Into<String>,
    ) -> Self {
        self.type_mismatch = Some(TypeMismatch {
            contract: contract.into(),
            implementation: implementation.into(),
        });
        self
    }

    /// Returns true for breaking changes.
    #[must_use]
    pub fn is_incompatible(&self) -> bool {
        self.severity == Severity::Incompatible
    }
}

impl std::fmt::Display for Difference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.id, self.message)
    }
}

/// Names used for the two sides in difference messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifferenceOperands {
    /// Name of the contract side.
    pub contract: String,
    /// Name of the implementation side.
    pub implementation: String,
}

impl Default for DifferenceOperands {
    fn default() -> Self {
        Self {
            contract: "contract".to_string(),
            implementation: "implementation".to_string(),
        }
    }
}

/// Accumulator that rules append differences to while one element pair is
/// being evaluated.
///
/// Also carries the context a rule needs to phrase messages (operand names)
/// and to ignore filtered-out declarations (the active [`ApiFilter`]).
pub struct Differences<'a> {
    items: Vec<Difference>,
    target: String,
    operands: &'a DifferenceOperands,
    filter: &'a dyn ApiFilter,
}

impl<'a> Differences<'a> {
    /// Creates an empty collector for the element identified by `target`.
    #[must_use]
    pub fn new(
        target: impl Into<String>,
        operands: &'a DifferenceOperands,
        filter: &'a dyn ApiFilter,
    ) -> Self {
        Self {
            items: Vec::new(),
            target: target.into(),
            operands,
            filter,
        }
    }

    /// Records an incompatible difference against the current element.
    pub fn add_incompatible(&mut self, id: &str, message: impl Into<String>) {
        let difference = Difference::incompatible(id, self.target.clone(), message);
        self.items.push(difference);
    }

    /// Records an incompatible type mismatch against the current element.
    pub fn add_type_mismatch(
        &mut self,
        id: &str,
        message: impl Into<String>,
        contract: &str,
        implementation: &str,
    ) {
        let difference = Difference::incompatible(id, self.target.clone(), message)
            .with_type_mismatch(contract, implementation);
        self.items.push(difference);
    }

    /// Records a low-severity diagnostic for input a rule could not evaluate.
    pub fn add_warning(&mut self, id: &str, message: impl Into<String>) {
        let difference = Difference::incompatible(id, self.target.clone(), message)
            .with_severity(Severity::Warning);
        self.items.push(difference);
    }

    /// Records a prepared difference.
    pub fn add(&mut self, difference: Difference) {
        self.items.push(difference);
    }

    /// Number of differences recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if any incompatible difference was recorded.
    #[must_use]
    pub fn has_incompatible(&self) -> bool {
        self.items.iter().any(Difference::is_incompatible)
    }

    /// Name of the contract side, for messages.
    #[must_use]
    pub fn contract(&self) -> &str {
        &self.operands.contract
    }

    /// Name of the implementation side, for messages.
    #[must_use]
    pub fn implementation(&self) -> &str {
        &self.operands.implementation
    }

    /// The filter that decided which declarations take part in the comparison.
    #[must_use]
    pub fn filter(&self) -> &dyn ApiFilter {
        self.filter
    }

    /// Recorded differences in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Difference] {
        &self.items
    }

    /// Consumes the collector, returning its differences.
    #[must_use]
    pub fn into_items(self) -> Vec<Difference> {
        self.items
    }
}

impl std::fmt::Debug for Differences<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Differences")
            .field("target", &self.target)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::IncludeAllFilter;

    #[test]
    fn difference_type_priority_order() {
        assert!(DifferenceType::Unknown < DifferenceType::Unchanged);
        assert!(DifferenceType::Added < DifferenceType::Removed);
        assert_eq!(
            DifferenceType::Removed.merge(DifferenceType::Changed),
            DifferenceType::Changed
        );
        assert_eq!(
            DifferenceType::Added.merge(DifferenceType::Unknown),
            DifferenceType::Added
        );
    }

    #[test]
    fn difference_display_is_id_and_message() {
        let diff = Difference::incompatible("CannotSealType", "T:N.T", "Type 'N.T' is sealed.");
        assert_eq!(diff.to_string(), "CannotSealType: Type 'N.T' is sealed.");
    }

    #[test]
    fn collector_tags_differences_with_target() {
        let operands = DifferenceOperands::default();
        let filter = IncludeAllFilter;
        let mut diffs = Differences::new("T:N.T", &operands, &filter);
        assert!(diffs.is_empty());

        diffs.add_incompatible("Rule", "message");
        diffs.add_warning("Rule", "odd input");

        assert_eq!(diffs.len(), 2);
        assert!(diffs.has_incompatible());
        assert_eq!(diffs.items()[0].target, "T:N.T");
        assert_eq!(diffs.items()[1].severity, Severity::Warning);
        assert_eq!(diffs.contract(), "contract");
        assert_eq!(diffs.implementation(), "implementation");
    }

    #[test]
    fn type_mismatch_is_recorded() {
        let operands = DifferenceOperands::default();
        let filter = IncludeAllFilter;
        let mut diffs = Differences::new("T:N.D", &operands, &filter);
        diffs.add_type_mismatch("DelegateReturnTypesMustMatch", "msg", "System.Int32", "System.Int64");
        let mismatch = diffs.items()[0].type_mismatch.as_ref().unwrap();
        assert_eq!(mismatch.contract, "System.Int32");
        assert_eq!(mismatch.implementation, "System.Int64");
    }
}

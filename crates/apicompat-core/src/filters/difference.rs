//! Filters over recorded differences.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use super::FilterError;
use crate::types::{Difference, Severity};

/// Decides whether a recorded difference is reported.
pub trait DifferenceFilter: Send + Sync {
    /// Returns true if the difference should be reported.
    fn include(&self, difference: &Difference) -> bool;
}

/// Reports differences at or above a minimum severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityFilter {
    minimum: Severity,
}

impl SeverityFilter {
    /// Creates a filter with the given minimum severity.
    #[must_use]
    pub fn new(minimum: Severity) -> Self {
        Self { minimum }
    }

    /// Reports breaking changes only.
    #[must_use]
    pub fn incompatible_only() -> Self {
        Self::new(Severity::Incompatible)
    }
}

impl Default for SeverityFilter {
    fn default() -> Self {
        Self::incompatible_only()
    }
}

impl DifferenceFilter for SeverityFilter {
    fn include(&self, difference: &Difference) -> bool {
        difference.severity >= self.minimum
    }
}

/// Suppresses differences listed in a baseline of previously accepted issues.
///
/// Each non-blank, non-`#` line of the baseline is compared against the
/// rendered difference (`Id: message`).
pub struct BaselineDifferenceFilter {
    inner: Box<dyn DifferenceFilter>,
    accepted: HashSet<String>,
}

impl BaselineDifferenceFilter {
    /// Creates a filter from baseline lines.
    #[must_use]
    pub fn new<I, S>(inner: Box<dyn DifferenceFilter>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let accepted = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();
        Self { inner, accepted }
    }

    /// Loads a baseline file.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::BaselineNotFound`] if the file does not exist and
    /// [`FilterError::Io`] if it cannot be read.
    pub fn from_file(inner: Box<dyn DifferenceFilter>, path: &Path) -> Result<Self, FilterError> {
        if !path.exists() {
            return Err(FilterError::BaselineNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| FilterError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let filter = Self::new(inner, content.lines());
        debug!(path = %path.display(), entries = filter.len(), "Loaded baseline");
        Ok(filter)
    }

    /// Number of accepted entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    /// Returns true if the baseline accepts nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

impl DifferenceFilter for BaselineDifferenceFilter {
    fn include(&self, difference: &Difference) -> bool {
        if !self.inner.include(difference) {
            return false;
        }
        !self.accepted.contains(difference.to_string().trim())
    }
}

impl std::fmt::Debug for BaselineDifferenceFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaselineDifferenceFilter")
            .field("accepted", &self.accepted.len())
            .finish_non_exhaustive()
    }
}

//! Doc id allow and deny lists.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use super::{ApiFilter, FilterError};
use crate::model::{CustomAttribute, MemberRef, TypeDefinition};

/// Key prefix that removes an attribute's usages without removing the
/// attribute type itself, e.g. `RemoveUsages:T:System.ObsoleteAttribute`.
pub const REMOVE_USAGES_PREFIX: &str = "RemoveUsages:";

/// Reads a doc id list: one id per line, blank lines and `#` comments ignored.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_doc_ids(path: &Path) -> Result<HashSet<String>, FilterError> {
    let content = std::fs::read_to_string(path).map_err(|e| FilterError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let ids: HashSet<String> = parse_doc_ids(&content).collect();
    debug!(path = %path.display(), count = ids.len(), "Loaded doc id list");
    Ok(ids)
}

fn parse_doc_ids(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
}

fn remove_usages_key(attribute: &CustomAttribute) -> String {
    format!("{REMOVE_USAGES_PREFIX}{}", attribute.doc_id())
}

/// Excludes every declaration whose doc id is listed.
#[derive(Debug, Clone, Default)]
pub struct DocIdExcludeListFilter {
    doc_ids: HashSet<String>,
}

impl DocIdExcludeListFilter {
    /// Creates the filter from a list of doc ids.
    #[must_use]
    pub fn new<I, S>(doc_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            doc_ids: doc_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates the filter from a doc id file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Self, FilterError> {
        Ok(Self {
            doc_ids: read_doc_ids(path)?,
        })
    }
}

impl ApiFilter for DocIdExcludeListFilter {
    fn include_type(&self, ty: &TypeDefinition) -> bool {
        !self.doc_ids.contains(&ty.doc_id())
    }

    fn include_member(&self, member: MemberRef<'_>) -> bool {
        !self.doc_ids.contains(&member.doc_id())
    }

    fn include_attribute(&self, attribute: &CustomAttribute) -> bool {
        if self.doc_ids.contains(&remove_usages_key(attribute)) {
            return false;
        }
        !self.doc_ids.contains(&attribute.doc_id())
    }
}

/// Includes only declarations whose doc id is listed.
#[derive(Debug, Clone, Default)]
pub struct DocIdIncludeListFilter {
    doc_ids: HashSet<String>,
}

impl DocIdIncludeListFilter {
    /// Creates the filter from a list of doc ids.
    #[must_use]
    pub fn new<I, S>(doc_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            doc_ids: doc_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates the filter from a doc id file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Self, FilterError> {
        Ok(Self {
            doc_ids: read_doc_ids(path)?,
        })
    }
}

impl ApiFilter for DocIdIncludeListFilter {
    fn include_type(&self, ty: &TypeDefinition) -> bool {
        self.doc_ids.contains(&ty.doc_id())
    }

    fn include_member(&self, member: MemberRef<'_>) -> bool {
        self.doc_ids.contains(&member.doc_id())
    }

    fn include_attribute(&self, attribute: &CustomAttribute) -> bool {
        if self.doc_ids.contains(&remove_usages_key(attribute)) {
            return false;
        }
        self.doc_ids.contains(&attribute.doc_id())
    }
}

//! Top-level comparison runner.
//!
//! [`ApiCompat`] wires configuration, filters, rules and the report writer
//! together and reports the outcome as an [`ExitStatus`].

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use apicompat_core::filters::{
    BaselineDifferenceFilter, DocIdExcludeListFilter, EditorBrowsableFilter,
    ExcludeAttributesFilter, IntersectionFilter, MappingDifferenceFilter, PublicOnlyFilter,
    SeverityFilter,
};
use apicompat_core::{
    ApiFilter, AssemblySet, AssemblySetMapping, Config, ConfigError, DifferenceFilter,
    DifferenceRule, DifferenceTraverser, FilterError, MappingError, MappingSettings, RuleBox,
    RuleSet,
};
use apicompat_rules::Preset;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::loader::{load_assembly_set, LoadError};
use crate::writer::{DifferenceWriter, OutputFormat};

/// Outcome of a run, suitable as a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// No incompatible differences were reported.
    Clean = 0,
    /// At least one difference was reported.
    IncompatibleChangesFound = 2,
    /// The run could not start: a config, list, baseline or surface file is
    /// missing or malformed.
    ConfigurationError = 3,
}

impl ExitStatus {
    /// Numeric process exit code.
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        Self::from(status as u8)
    }
}

/// Errors that stop a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A doc id list, attribute list or baseline could not be used.
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// A surface file could not be loaded.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// One side repeats a declaration.
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Writing the report failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RunError {
    /// Exit status a host should report for this error.
    #[must_use]
    pub fn exit_status(&self) -> ExitStatus {
        // Every error means the comparison never produced a trustworthy result.
        ExitStatus::ConfigurationError
    }
}

/// Builder for configuring an [`ApiCompat`] run.
#[derive(Default)]
pub struct ApiCompatBuilder {
    rules: Vec<RuleBox>,
    preset: Option<Preset>,
    config: Option<Config>,
    format: OutputFormat,
}

impl ApiCompatBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule.
    #[must_use]
    pub fn rule<R: DifferenceRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds the rules of a preset. Without explicit rules or a preset,
    /// [`Preset::Default`] is used.
    #[must_use]
    pub fn preset(mut self, preset: Preset) -> Self {
        self.preset = Some(preset);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Loads the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn config_file(self, path: &Path) -> Result<Self, RunError> {
        Ok(self.config(Config::from_file(path)?))
    }

    /// Sets the report format.
    #[must_use]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Builds the runner, reading every filter file the configuration names.
    ///
    /// # Errors
    ///
    /// Returns an error if a doc id list, attribute list or baseline cannot
    /// be read.
    pub fn build(self) -> Result<ApiCompat, RunError> {
        let config = self.config.unwrap_or_default();

        let mut rules = self.rules;
        if let Some(preset) = self.preset {
            rules.extend(preset.rules());
        } else if rules.is_empty() {
            rules = Preset::Default.rules();
        }
        let rules = RuleSet::new(rules, &config.rule_policy());
        debug!("Registered {} rules", rules.len());

        let filter = api_filter(&config)?;
        let difference_filter = difference_filter(&config)?;
        let settings = MappingSettings::new(Arc::clone(&filter), Arc::new(rules))
            .with_operands(config.operands.clone())
            .include_forwarded_types(config.mapping.include_forwarded_types)
            .group_by_assembly(config.mapping.group_by_assembly);

        Ok(ApiCompat {
            settings,
            mapping_filter: MappingDifferenceFilter::changes_only(filter),
            difference_filter,
            format: self.format,
        })
    }
}

/// Builds the declaration filter from the mapping switches and filter files.
fn api_filter(config: &Config) -> Result<Arc<dyn ApiFilter>, RunError> {
    let mapping = &config.mapping;
    if mapping.enforce_mdil_rules && mapping.exclude_non_browsable {
        warn!(
            "Enforcing MDIL servicing rules and excluding non-browsable types are both enabled; \
             non-browsable types will not be excluded"
        );
    }

    let public = PublicOnlyFilter::new()
        .include_forwarded_types(mapping.include_forwarded_types)
        .exclude_attributes(config.filters.exclude_attributes.is_none());
    let mut filter: Arc<dyn ApiFilter> = if mapping.exclude_non_browsable && !mapping.enforce_mdil_rules {
        Arc::new(EditorBrowsableFilter::new(public))
    } else {
        Arc::new(public)
    };

    if let Some(path) = &config.filters.exclude_attributes {
        filter = Arc::new(ExcludeAttributesFilter::from_file(filter, path)?);
    }
    if let Some(path) = &config.filters.exclude_doc_ids {
        let excluded = DocIdExcludeListFilter::from_file(path)?;
        filter = Arc::new(IntersectionFilter::new(filter, Arc::new(excluded)));
    }
    Ok(filter)
}

fn difference_filter(config: &Config) -> Result<Box<dyn DifferenceFilter>, RunError> {
    let incompatible: Box<dyn DifferenceFilter> = Box::new(SeverityFilter::default());
    match &config.filters.baseline {
        Some(path) => Ok(Box::new(BaselineDifferenceFilter::from_file(incompatible, path)?)),
        None => Ok(incompatible),
    }
}

/// A configured comparison.
///
/// Use [`ApiCompat::builder()`] to construct an instance.
pub struct ApiCompat {
    settings: MappingSettings,
    mapping_filter: MappingDifferenceFilter,
    difference_filter: Box<dyn DifferenceFilter>,
    format: OutputFormat,
}

impl ApiCompat {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> ApiCompatBuilder {
        ApiCompatBuilder::new()
    }

    /// Names of the registered rules in dispatch order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.settings.rules.names()
    }

    /// Compares two loaded sets and writes the report to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if a set repeats a declaration or the report cannot
    /// be written.
    pub fn compare<W: Write>(
        &self,
        contract: &AssemblySet,
        implementation: &AssemblySet,
        out: W,
    ) -> Result<ExitStatus, RunError> {
        info!(
            "Comparing implementation set {} against contract set {}",
            implementation.name, contract.name
        );

        let mapping = AssemblySetMapping::between(&self.settings, contract, implementation)?;
        let traverser = DifferenceTraverser::new(&self.mapping_filter, &*self.difference_filter);
        let mut writer = DifferenceWriter::new(out, self.format);
        traverser.traverse(&mapping, &mut writer)?;
        let total = writer.finish(&implementation.name, &contract.name)?;

        info!("Comparison complete: {} issues", total);

        Ok(if total == 0 {
            ExitStatus::Clean
        } else {
            ExitStatus::IncompatibleChangesFound
        })
    }

    /// Loads both sides from JSON surface files and compares them.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be loaded, or as
    /// [`ApiCompat::compare`].
    pub fn compare_files<W: Write>(
        &self,
        contract: &Path,
        implementation: &Path,
        out: W,
    ) -> Result<ExitStatus, RunError> {
        let contract = load_assembly_set(contract)?;
        let implementation = load_assembly_set(implementation)?;
        self.compare(&contract, &implementation, out)
    }
}

impl std::fmt::Debug for ApiCompat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCompat")
            .field("rules", &self.rule_names())
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

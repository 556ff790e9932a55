//! Configuration for call-site attribution behavior.

/// Configuration options for query attribution.
///
/// # Example
///
/// ```rust
/// use sea_orm_callsite::AttributionConfig;
///
/// let config = AttributionConfig::default()
///     .with_workspace_area("services")
///     .with_column_recording(true);
/// ```
#[derive(Debug, Clone)]
pub struct AttributionConfig {
    /// Whether statements are decorated at all.
    /// Default: `true`. When `false` every statement passes through byte-identical.
    pub enabled: bool,

    /// Ordered allow-list of directory names treated as workspace roots when
    /// deriving the `file=` label. The first listed area that appears in a
    /// frame's path wins.
    /// Default: `src`, `crates`, `lib`, `bin`, `tests`, `benches`
    pub workspace_areas: Vec<String>,

    /// Top-level module paths whose stack frames are never attributed, in
    /// addition to this crate's own frames. Covers the underlying ORM, driver,
    /// and async runtime plumbing.
    /// Default: `sea_orm`, `sqlx`, `backtrace`, `tokio`, `futures`,
    /// `futures_util`, `futures_core`, `async_std`
    pub internal_modules: Vec<String>,

    /// Path substrings whose frames are never attributed.
    /// Default: `/rustc/` (toolchain sources)
    pub exclude_paths: Vec<String>,

    /// Whether the marker carries a `col=` field in addition to `line=`.
    /// Default: `false`
    pub record_column: bool,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            workspace_areas: default_strings(&["src", "crates", "lib", "bin", "tests", "benches"]),
            internal_modules: default_strings(&[
                "sea_orm",
                "sqlx",
                "backtrace",
                "tokio",
                "futures",
                "futures_util",
                "futures_core",
                "async_std",
            ]),
            exclude_paths: default_strings(&["/rustc/"]),
            record_column: false,
        }
    }
}

fn default_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl AttributionConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable attribution.
    ///
    /// When disabled, call-site resolution is skipped entirely and statements
    /// reach the underlying connection unchanged.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Replace the workspace-area allow-list.
    ///
    /// Order matters: when a path could match several areas, the first one
    /// declared here wins.
    pub fn with_workspace_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.workspace_areas = areas.into_iter().map(Into::into).collect();
        self
    }

    /// Append a single workspace area to the allow-list.
    pub fn with_workspace_area(mut self, area: impl Into<String>) -> Self {
        self.workspace_areas.push(area.into());
        self
    }

    /// Append a module path to the internal skip-list.
    ///
    /// Useful when queries are funneled through an in-house data-access crate
    /// whose frames should not be reported as the call site.
    pub fn with_internal_module(mut self, module: impl Into<String>) -> Self {
        self.internal_modules.push(module.into());
        self
    }

    /// Append a path substring to the exclusion list.
    pub fn with_exclude_path(mut self, fragment: impl Into<String>) -> Self {
        self.exclude_paths.push(fragment.into());
        self
    }

    /// Enable or disable the `col=` marker field.
    pub fn with_column_recording(mut self, enabled: bool) -> Self {
        self.record_column = enabled;
        self
    }

    /// Create a configuration with attribution switched off.
    ///
    /// Handy as a kill switch in environments where an intermediate proxy
    /// rewrites comments anyway.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

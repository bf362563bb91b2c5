use std::{borrow::Cow, sync::OnceLock};

use testglob_pattern::{Dashes, PatternSet};

use crate::{ConfigFormat, ConfigSource, Error};

/// Option naming the wildcard patterns for test class names.
pub const PYTHON_CLASSES: &str = "python_classes";
/// Option naming the wildcard patterns for test function names.
pub const PYTHON_FUNCTIONS: &str = "python_functions";

pub const DEFAULT_PYTHON_CLASSES: &str = "Test*";
pub const DEFAULT_PYTHON_FUNCTIONS: &str = "test_*";

/// Class name patterns use dashes as CamelCase boundaries.
pub const PYTHON_CLASSES_DASHES: Dashes = Dashes::WordBoundary;
pub const PYTHON_FUNCTIONS_DASHES: Dashes = Dashes::Literal;

/// The matcher used for class names when nothing is configured.
#[must_use]
pub fn default_python_classes() -> PatternSet {
    PatternSet::new_or_never(DEFAULT_PYTHON_CLASSES, PYTHON_CLASSES_DASHES)
}

/// The matcher used for function names when nothing is configured.
#[must_use]
pub fn default_python_functions() -> PatternSet {
    PatternSet::new_or_never(DEFAULT_PYTHON_FUNCTIONS, PYTHON_FUNCTIONS_DASHES)
}

/// Test discovery settings read from one config file.
///
/// The compiled matchers are derived from the raw option values on first
/// use and cached for the lifetime of the instance. Two configs are equal
/// when their raw option values are, regardless of anything else in the
/// files they came from.
#[derive(Debug, Clone)]
pub struct TestConfig {
    source: ConfigSource,
    python_classes: OnceLock<PatternSet>,
    python_functions: OnceLock<PatternSet>,
}

impl TestConfig {
    #[must_use]
    pub fn new(source: ConfigSource) -> Self {
        Self {
            source,
            python_classes: OnceLock::new(),
            python_functions: OnceLock::new(),
        }
    }

    pub fn parse(format: ConfigFormat, source: &str) -> Result<Self, Error> {
        ConfigSource::parse(format, source).map(Self::new)
    }

    /// Reads the config for a file, choosing the format by its extension.
    ///
    /// Returns `None` if the file is not an INI or TOML file, or if it fails
    /// to parse. Parse errors are logged, not propagated.
    #[must_use]
    pub fn load(path: &std::path::Path, source: &str) -> Option<Self> {
        let Some(format) = ConfigFormat::from_path(path) else {
            tracing::debug!("not a recognized config file: {}", path.display());
            return None;
        };

        match Self::parse(format, source) {
            Ok(config) => {
                tracing::debug!("loaded {format} config from {}", path.display());
                Some(config)
            }
            Err(err) => {
                tracing::warn!("ignoring {}: {err}", path.display());
                None
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    #[inline]
    #[must_use]
    pub fn format(&self) -> ConfigFormat {
        self.source.format()
    }

    #[inline]
    #[must_use]
    pub fn python_classes_raw(&self) -> Option<Cow<'_, str>> {
        self.source.python_classes_raw()
    }

    #[inline]
    #[must_use]
    pub fn python_functions_raw(&self) -> Option<Cow<'_, str>> {
        self.source.python_functions_raw()
    }

    /// Matcher for test class names.
    pub fn python_classes(&self) -> &PatternSet {
        self.python_classes.get_or_init(|| {
            let raw = self.python_classes_raw();
            PatternSet::new_or_never(
                raw.as_deref().unwrap_or(DEFAULT_PYTHON_CLASSES),
                PYTHON_CLASSES_DASHES,
            )
        })
    }

    /// Matcher for test function names.
    pub fn python_functions(&self) -> &PatternSet {
        self.python_functions.get_or_init(|| {
            let raw = self.python_functions_raw();
            PatternSet::new_or_never(
                raw.as_deref().unwrap_or(DEFAULT_PYTHON_FUNCTIONS),
                PYTHON_FUNCTIONS_DASHES,
            )
        })
    }

    #[inline]
    #[must_use]
    pub fn is_class(&self, name: &str) -> bool {
        self.python_classes().is_match(name)
    }

    #[inline]
    #[must_use]
    pub fn is_function(&self, name: &str) -> bool {
        self.python_functions().is_match(name)
    }
}

impl PartialEq for TestConfig {
    fn eq(&self, other: &Self) -> bool {
        self.python_classes_raw() == other.python_classes_raw()
            && self.python_functions_raw() == other.python_functions_raw()
    }
}

impl Eq for TestConfig {}

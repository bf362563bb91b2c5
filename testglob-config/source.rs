use std::borrow::Cow;

use crate::{Error, IniSource, PYTHON_CLASSES, PYTHON_FUNCTIONS, TomlSource};

/// On-disk formats a pytest configuration can come in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigFormat {
    /// `pytest.ini`, `tox.ini`.
    Ini,
    /// `pyproject.toml`.
    Toml,
}

impl ConfigFormat {
    /// Selects the format from the file extension. Anything other than
    /// `.ini` or `.toml` is not a recognized config file.
    #[must_use]
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "ini" => Some(Self::Ini),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ConfigFormat::Ini => "ini",
            ConfigFormat::Toml => "toml",
        })
    }
}

/// A parsed config file of one of the known formats.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    Ini(IniSource),
    Toml(TomlSource),
}

impl ConfigSource {
    pub fn parse(format: ConfigFormat, source: &str) -> Result<Self, Error> {
        match format {
            ConfigFormat::Ini => IniSource::parse(source).map(Self::Ini),
            ConfigFormat::Toml => TomlSource::parse(source).map(Self::Toml),
        }
    }

    #[must_use]
    pub fn format(&self) -> ConfigFormat {
        match self {
            ConfigSource::Ini(_) => ConfigFormat::Ini,
            ConfigSource::Toml(_) => ConfigFormat::Toml,
        }
    }

    /// Raw value of a pytest option, as written in the file.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        match self {
            ConfigSource::Ini(ini) => ini.get(key),
            ConfigSource::Toml(toml) => toml.get(key),
        }
    }

    #[inline]
    #[must_use]
    pub fn python_classes_raw(&self) -> Option<Cow<'_, str>> {
        self.get(PYTHON_CLASSES)
    }

    #[inline]
    #[must_use]
    pub fn python_functions_raw(&self) -> Option<Cow<'_, str>> {
        self.get(PYTHON_FUNCTIONS)
    }
}

impl From<IniSource> for ConfigSource {
    #[inline]
    fn from(source: IniSource) -> Self {
        Self::Ini(source)
    }
}

impl From<TomlSource> for ConfigSource {
    #[inline]
    fn from(source: TomlSource) -> Self {
        Self::Toml(source)
    }
}

use std::borrow::Cow;

use crate::{Error, PYTHON_CLASSES, PYTHON_FUNCTIONS};

/// Table pytest reads its options from in `pyproject.toml`.
pub const TOML_TABLE: [&str; 3] = ["tool", "pytest", "ini_options"];

/// Options read from the `[tool.pytest.ini_options]` table of a TOML file.
#[derive(Debug, Clone)]
pub struct TomlSource {
    document: toml_edit::ImDocument<String>,
}

impl TomlSource {
    /// Parses the document and checks that the known keys, where present,
    /// hold a string or an array of strings.
    pub fn parse(source: &str) -> Result<Self, Error> {
        let document = toml_edit::ImDocument::parse(source.to_owned())?;
        let this = Self { document };
        for key in [PYTHON_CLASSES, PYTHON_FUNCTIONS] {
            this.lookup(key)?;
        }
        Ok(this)
    }

    #[inline]
    #[must_use]
    pub fn document(&self) -> &toml_edit::ImDocument<String> {
        &self.document
    }

    /// Value of `key` in the pytest table. Arrays of strings are joined with
    /// spaces.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        self.lookup(key).ok().flatten()
    }

    fn lookup(&self, key: &str) -> Result<Option<Cow<'_, str>>, Error> {
        let item = self.document.get(TOML_TABLE[0]).and_then(|tool| {
            TOML_TABLE[1..]
                .iter()
                .chain(std::iter::once(&key))
                .try_fold(tool, |item, component| item.get(*component))
        });
        let Some(item) = item else {
            return Ok(None);
        };

        if let Some(value) = item.as_str() {
            return Ok(Some(Cow::Borrowed(value)));
        }

        if let Some(values) = item
            .as_array()
            .and_then(|array| array.iter().map(|v| v.as_str()).collect::<Option<Vec<_>>>())
        {
            return Ok(Some(Cow::Owned(values.join(" "))));
        }

        Err(Error::ExpectedString(
            format!("{}.{key}", TOML_TABLE.join(".")),
            item.span(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_values() {
        let source = TomlSource::parse(
            r#"
[project]
name = "demo"

[tool.pytest.ini_options]
python_classes = "Test* Suite"
"#,
        )
        .unwrap();
        assert_eq!(source.get(PYTHON_CLASSES).as_deref(), Some("Test* Suite"));
        assert_eq!(source.get(PYTHON_FUNCTIONS), None);
    }

    #[test]
    fn dotted_keys_and_arrays() {
        let source = TomlSource::parse(
            r#"
tool.pytest.ini_options.python_functions = ["test_*", "check_*"]
"#,
        )
        .unwrap();
        assert_eq!(
            source.get(PYTHON_FUNCTIONS).as_deref(),
            Some("test_* check_*")
        );
    }

    #[test]
    fn missing_table() {
        let source = TomlSource::parse("[tool.black]\nline-length = 88\n").unwrap();
        assert_eq!(source.get(PYTHON_CLASSES), None);
        assert_eq!(source.get(PYTHON_FUNCTIONS), None);
    }

    #[test]
    fn wrong_value_type() {
        let text = "[tool.pytest.ini_options]\npython_classes = 3\n";
        let err = TomlSource::parse(text).unwrap_err();
        let Error::ExpectedString(path, span) = &err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(path, "tool.pytest.ini_options.python_classes");
        assert_eq!(span.clone().map(|span| &text[span]), Some("3"));

        assert!(matches!(
            TomlSource::parse("[tool.pytest.ini_options]\npython_functions = [\"a\", 1]\n"),
            Err(Error::ExpectedString(..))
        ));
    }

    #[test]
    fn syntax_error() {
        let err = TomlSource::parse("[tool.pytest\n").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
        assert!(err.span().is_some());
    }
}

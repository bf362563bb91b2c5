use std::ops::Range;

/// Byte range into the config file.
pub type Span = Range<usize>;

/// A config file could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid TOML: {}", .0.message().trim_end())]
    Toml(#[from] toml_edit::TomlError),
    #[error("key outside of any section; add a `[section]` header above it")]
    MissingSectionHeader(Span),
    #[error("malformed section header")]
    InvalidSectionHeader(Span),
    #[error("expected `key = value` or `key: value`")]
    InvalidLine(Span),
    #[error("indented continuation line without a preceding key")]
    UnexpectedContinuation(Span),
    #[error("duplicate section `[{0}]`")]
    DuplicateSection(String, Span),
    #[error("duplicate key `{0}`")]
    DuplicateKey(String, Span),
    #[error("expected a string or an array of strings at `{0}`")]
    ExpectedString(String, Option<Span>),
}

impl Error {
    /// Location of the error in the source text, if known.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Toml(err) => err.span(),
            Error::MissingSectionHeader(span)
            | Error::InvalidSectionHeader(span)
            | Error::InvalidLine(span)
            | Error::UnexpectedContinuation(span)
            | Error::DuplicateSection(_, span)
            | Error::DuplicateKey(_, span) => Some(span.clone()),
            Error::ExpectedString(_, span) => span.clone(),
        }
    }

    #[must_use]
    pub fn with_location<'a>(
        self,
        file_name: &'a std::path::Path,
        source_code: &'a str,
    ) -> LocatedError<'a> {
        LocatedError {
            file_name,
            source_code,
            error: self,
        }
    }
}

/// An [`Error`] together with the file it came from, rendered as an
/// annotated snippet of the offending source.
#[derive(Debug)]
pub struct LocatedError<'a> {
    pub file_name: &'a std::path::Path,
    pub source_code: &'a str,
    pub error: Error,
}

impl std::fmt::Display for LocatedError<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use annotate_snippets::Level;

        let title = self.error.to_string();
        let origin = self.file_name.to_string_lossy();
        let mut message = Level::Error.title(&title);
        if let Some(span) = self.error.span() {
            // Clamp; TOML errors at end of input point one past the end.
            let end = span.end.min(self.source_code.len());
            let start = span.start.min(end);
            message = message.snippet(
                annotate_snippets::Snippet::source(self.source_code)
                    .origin(&origin)
                    .fold(true)
                    .annotation(Level::Error.span(start..end).label("here")),
            );
        }

        let renderer = annotate_snippets::Renderer::styled();
        write!(f, "{}", renderer.render(message))
    }
}

impl std::error::Error for LocatedError<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl std::ops::Deref for LocatedError<'_> {
    type Target = Error;

    fn deref(&self) -> &Self::Target {
        &self.error
    }
}

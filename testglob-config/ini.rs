//! The INI dialect pytest reads `pytest.ini` and `tox.ini` with.
//!
//! - `[section]` headers, optionally followed by a comment
//! - `key = value` or `key: value` pairs
//! - whole-line comments starting with `#` or `;`
//! - indented lines continue the previous value, joined with `\n`
//!
//! Duplicate sections and duplicate keys within one section are errors.

use std::borrow::Cow;

use indexmap::IndexMap;
use winnow::{
    ModalResult, Parser,
    ascii::space0,
    combinator::{delimited, opt, preceded, separated_pair, terminated},
    token::{one_of, rest, take_till},
};

use crate::{Error, Span};

/// Section pytest reads its options from.
pub const INI_SECTION: &str = "pytest";

/// A parsed INI file, with sections and keys in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: IndexMap<String, IndexMap<String, String>>,
}

impl IniDocument {
    pub fn parse(source: &str) -> Result<Self, Error> {
        let (mut offset, text) = match source.strip_prefix('\u{feff}') {
            Some(text) => ('\u{feff}'.len_utf8(), text),
            None => (0, source),
        };

        let mut sections = IndexMap::<String, IndexMap<String, String>>::new();
        let mut current_section: Option<String> = None;
        let mut current_key: Option<(String, String)> = None;

        for raw_line in text.split_inclusive('\n') {
            let line = raw_line.trim_end_matches(['\r', '\n']);
            let span: Span = offset..offset + line.len();
            offset += raw_line.len();

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(['#', ';']) {
                continue;
            }

            if line.starts_with(char::is_whitespace) {
                let Some(value) = current_key.as_ref().and_then(|(section, key)| {
                    sections.get_mut(section.as_str())?.get_mut(key.as_str())
                }) else {
                    return Err(Error::UnexpectedContinuation(span));
                };
                if !value.is_empty() {
                    value.push('\n');
                }
                value.push_str(trimmed);
                continue;
            }

            if line.starts_with('[') {
                let name = section_header
                    .parse(line)
                    .map_err(|_| Error::InvalidSectionHeader(span.clone()))?;
                if sections.contains_key(name) {
                    return Err(Error::DuplicateSection(name.to_owned(), span));
                }
                sections.insert(name.to_owned(), IndexMap::new());
                current_section = Some(name.to_owned());
                current_key = None;
                continue;
            }

            let (key, value) = key_value
                .parse(line)
                .map_err(|_| Error::InvalidLine(span.clone()))?;
            let Some(section_name) = current_section.as_ref() else {
                return Err(Error::MissingSectionHeader(span));
            };
            let section = sections.entry(section_name.clone()).or_default();
            if section.contains_key(key) {
                return Err(Error::DuplicateKey(key.to_owned(), span));
            }
            section.insert(key.to_owned(), value.to_owned());
            current_key = Some((section_name.clone(), key.to_owned()));
        }

        Ok(Self { sections })
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections.get(section)?.get(key).map(String::as_str)
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    #[must_use]
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }
}

impl std::str::FromStr for IniDocument {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// `[name]`, with an optional trailing comment.
fn section_header<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    terminated(
        delimited('[', take_till(1.., ']'), ']'),
        (space0, opt(preceded(one_of(['#', ';']), rest))),
    )
    .map(str::trim)
    .verify(|name: &str| !name.is_empty())
    .parse_next(input)
}

fn key_value<'a>(input: &mut &'a str) -> ModalResult<(&'a str, &'a str)> {
    separated_pair(take_till(1.., ['=', ':']), one_of(['=', ':']), rest)
        .map(|(key, value): (&'a str, &'a str)| (key.trim(), value.trim()))
        .verify(|(key, _): &(&str, &str)| !key.is_empty())
        .parse_next(input)
}

/// Options read from the `[pytest]` section of an INI file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniSource {
    document: IniDocument,
}

impl IniSource {
    pub fn parse(source: &str) -> Result<Self, Error> {
        let document = IniDocument::parse(source)?;
        if !document.has_section(INI_SECTION) {
            tracing::debug!("no `[{INI_SECTION}]` section; using defaults");
        }
        Ok(Self { document })
    }

    #[inline]
    #[must_use]
    pub fn document(&self) -> &IniDocument {
        &self.document
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        self.document.get(INI_SECTION, key).map(Cow::Borrowed)
    }
}

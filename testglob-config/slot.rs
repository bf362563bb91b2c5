use std::{borrow::Cow, hash::Hash, sync::Arc};

use ahash::HashMap;

use crate::TestConfig;

type RawOptions<'a> = (Option<Cow<'a, str>>, Option<Cow<'a, str>>);

/// The raw options that decide the effective matchers. A missing config has
/// no options set.
fn raw_options(config: Option<&TestConfig>) -> RawOptions<'_> {
    config.map_or((None, None), |config| {
        (config.python_classes_raw(), config.python_functions_raw())
    })
}

/// The current config for one owner (for example, one project), replaced
/// wholesale whenever its file is read again.
#[derive(Debug, Clone, Default)]
pub struct ConfigSlot {
    current: Option<Arc<TestConfig>>,
}

impl ConfigSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<&Arc<TestConfig>> {
        self.current.as_ref()
    }

    /// Installs `next` and reports whether the effective options changed.
    ///
    /// If they did not, the current instance (and its compiled matchers) is
    /// kept.
    pub fn replace(&mut self, next: Option<TestConfig>) -> bool {
        if raw_options(self.current.as_deref()) == raw_options(next.as_ref()) {
            tracing::debug!("config unchanged");
            return false;
        }

        tracing::debug!("config changed");
        self.current = next.map(Arc::new);
        true
    }

    /// Re-reads the config from `file` (its path and contents), or clears it
    /// if there is no file, and reports whether the effective options
    /// changed. A file that fails to parse counts as no config.
    pub fn reload(&mut self, file: Option<(&std::path::Path, &str)>) -> bool {
        let next = file.and_then(|(path, source)| TestConfig::load(path, source));
        self.replace(next)
    }
}

/// Configs for a set of owners, keyed by something that identifies each
/// owner (such as a project root).
#[derive(Debug, Clone)]
pub struct ConfigRegistry<K> {
    slots: HashMap<K, ConfigSlot>,
}

impl<K> Default for ConfigRegistry<K> {
    fn default() -> Self {
        Self {
            slots: HashMap::default(),
        }
    }
}

impl<K: Hash + Eq> ConfigRegistry<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// See [`ConfigSlot::reload`].
    pub fn reload(&mut self, owner: K, file: Option<(&std::path::Path, &str)>) -> bool {
        self.slots.entry(owner).or_default().reload(file)
    }

    #[must_use]
    pub fn get<Q>(&self, owner: &Q) -> Option<&Arc<TestConfig>>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.slots.get(owner)?.current()
    }

    pub fn remove<Q>(&mut self, owner: &Q) -> Option<Arc<TestConfig>>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.slots.remove(owner)?.current
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, Option<&Arc<TestConfig>>)> {
        self.slots.iter().map(|(owner, slot)| (owner, slot.current()))
    }
}

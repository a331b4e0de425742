//! Translation lookup against per-locale JSON bundles.
//!
//! Bundles are loaded once at startup and never mutated. Lookups are fail-soft:
//! a missing key (or a key that resolves to a non-string) returns the key itself.

use crate::error::LocaleError;
use crate::i18n::{LocaleCode, LocaleRegistry};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;
use tracing::{debug, info};

/// Nested key/value tree for one locale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationTree {
    root: Map<String, Value>,
}

impl TranslationTree {
    /// Wrap a parsed bundle. The top level must be a JSON object.
    pub fn from_value(locale: &str, value: Value) -> Result<Self, LocaleError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(LocaleError::BundleShape(locale.to_string())),
        }
    }

    pub fn from_json_str(locale: &str, json: &str) -> Result<Self, LocaleError> {
        let value = serde_json::from_str(json).map_err(|source| LocaleError::BundleParse {
            locale: locale.to_string(),
            source,
        })?;
        Self::from_value(locale, value)
    }

    /// Walk a dotted key. Returns `None` unless the final value is a string.
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut segments = key.split('.');
        let mut value = self.root.get(segments.next()?)?;
        for segment in segments {
            value = value.as_object()?.get(segment)?;
        }
        value.as_str()
    }

    /// Dotted paths of every string leaf, sorted.
    pub fn leaf_keys(&self) -> Vec<String> {
        fn walk(prefix: &str, map: &Map<String, Value>, out: &mut Vec<String>) {
            for (key, value) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                match value {
                    Value::String(_) => out.push(path),
                    Value::Object(child) => walk(&path, child, out),
                    _ => {}
                }
            }
        }

        let mut keys = Vec::new();
        walk("", &self.root, &mut keys);
        keys.sort();
        keys
    }
}

/// All loaded trees, keyed by locale. Shared read-only after startup.
#[derive(Debug, Clone, Default)]
pub struct TranslationCatalog {
    trees: HashMap<LocaleCode, TranslationTree>,
}

impl TranslationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locale: LocaleCode, tree: TranslationTree) {
        self.trees.insert(locale, tree);
    }

    /// Load `{dir}/{code}.json` for every enabled locale of `registry`.
    ///
    /// Any missing or malformed bundle is an error.
    pub fn load_dir(registry: &LocaleRegistry, dir: &Path) -> Result<Self, LocaleError> {
        let mut catalog = Self::new();

        for locale in registry.supported_locales() {
            let path = dir.join(format!("{}.json", locale));
            let json = std::fs::read_to_string(&path).map_err(|source| LocaleError::BundleLoad {
                locale: locale.to_string(),
                path: path.clone(),
                source,
            })?;
            let tree = TranslationTree::from_json_str(locale.code(), &json)?;
            debug!(locale = %locale, keys = tree.leaf_keys().len(), "Loaded translation bundle");
            catalog.insert(locale, tree);
        }

        info!("Loaded {} translation bundles from {}", catalog.len(), dir.display());
        Ok(catalog)
    }

    pub fn tree(&self, locale: LocaleCode) -> Option<&TranslationTree> {
        self.trees.get(&locale)
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Lookup handle for one locale. There is no cross-locale fallback.
    pub fn translator(&self, locale: LocaleCode) -> Translator<'_> {
        Translator {
            locale,
            tree: self.trees.get(&locale),
        }
    }
}

/// Translation lookup bound to one resolved locale.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'c> {
    locale: LocaleCode,
    tree: Option<&'c TranslationTree>,
}

impl<'c> Translator<'c> {
    pub fn locale(&self) -> LocaleCode {
        self.locale
    }

    /// Resolve `key`, or return it verbatim when absent.
    pub fn t(&self, key: &str) -> String {
        self.lookup(key)
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    /// Resolve `key` and substitute `{name}` placeholders from `vars`.
    ///
    /// Placeholders without a matching var are left as-is.
    pub fn t_with(&self, key: &str, vars: &[(&str, &dyn Display)]) -> String {
        match self.lookup(key) {
            Some(template) => substitute(template, vars),
            None => key.to_string(),
        }
    }

    fn lookup(&self, key: &str) -> Option<&'c str> {
        let found = self.tree.and_then(|tree| tree.get(key));
        if found.is_none() {
            debug!(locale = %self.locale, key, "Missing translation key");
        }
        found
    }
}

/// Replace every `{name}` whose name appears in `vars`, in a single pass.
///
/// Substituted text is not rescanned.
pub fn substitute(template: &str, vars: &[(&str, &dyn Display)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        match vars.iter().find(|(var, _)| *var == name) {
            Some((_, value)) => {
                out.push_str(&value.to_string());
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

use serde::{Deserialize, Serialize};

/// Default recursion limit for [`ExportOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Serializer settings.
///
/// Deserializable so it can live in a config file; missing fields take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Attribute names dropped from every object at every depth.
    pub exclude: Vec<String>,
    /// Nesting depth past which values are replaced by a truncation marker.
    pub max_depth: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|excluded| excluded == name)
    }
}

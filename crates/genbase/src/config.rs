//! The `META` / `CONTENT` envelope handed to renderers.

use genbase_export::{emit, EmitError, Node};
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub const META_KEY: &str = "META";
pub const CONTENT_KEY: &str = "CONTENT";

/// Tab title used when no config carries a `title`.
pub const DEFAULT_TAB_TITLE: &str = "Explanation";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config must be a mapping, got {found}")]
    NotAMapping { found: &'static str },
    #[error("config is missing the `{key}` key")]
    MissingKey { key: &'static str },
    #[error("config `{key}` must be a mapping, got {found}")]
    SectionNotAMapping { key: &'static str, found: &'static str },
    #[error("config list must be a sequence, got {found}")]
    NotASequence { found: &'static str },
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// One renderable explanation: descriptive metadata plus its content.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Config {
    #[serde(rename = "META")]
    meta: IndexMap<String, Node>,
    #[serde(rename = "CONTENT")]
    content: IndexMap<String, Node>,
}

impl Config {
    pub fn new(meta: IndexMap<String, Node>, content: IndexMap<String, Node>) -> Self {
        Self { meta, content }
    }

    /// Validates `node` as an envelope. Keys other than `META` and
    /// `CONTENT` are ignored.
    pub fn from_node(node: &Node) -> Result<Self, ConfigError> {
        let map = node
            .as_map()
            .ok_or(ConfigError::NotAMapping { found: node.kind() })?;
        Ok(Self {
            meta: section(map, META_KEY)?,
            content: section(map, CONTENT_KEY)?,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_node(&Node::from(value))
    }

    pub fn meta(&self) -> &IndexMap<String, Node> {
        &self.meta
    }

    pub fn content(&self) -> &IndexMap<String, Node> {
        &self.content
    }

    pub fn insert_meta(&mut self, key: impl Into<String>, value: impl Into<Node>) -> &mut Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn insert_content(&mut self, key: impl Into<String>, value: impl Into<Node>) -> &mut Self {
        self.content.insert(key.into(), value.into());
        self
    }

    /// Display title: `META.title`, else `META.type` followed by
    /// ` (subtype)` when one is given.
    pub fn title(&self) -> Option<String> {
        if let Some(title) = self.meta.get("title").and_then(Node::as_str) {
            return Some(title.to_owned());
        }
        let kind = self.meta.get("type").and_then(Node::as_str)?;
        Some(match self.meta.get("subtype").and_then(Node::as_str) {
            Some(subtype) => format!("{kind} ({subtype})"),
            None => kind.to_owned(),
        })
    }

    pub fn to_node(&self) -> Node {
        let mut map = IndexMap::with_capacity(2);
        map.insert(META_KEY.to_owned(), Node::Map(self.meta.clone()));
        map.insert(CONTENT_KEY.to_owned(), Node::Map(self.content.clone()));
        Node::Map(map)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(emit::to_json_pretty(&self.to_node())?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(emit::to_yaml(&self.to_node())?)
    }
}

impl TryFrom<Node> for Config {
    type Error = ConfigError;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        Self::from_node(&node)
    }
}

fn section(
    map: &IndexMap<String, Node>,
    key: &'static str,
) -> Result<IndexMap<String, Node>, ConfigError> {
    let node = map.get(key).ok_or(ConfigError::MissingKey { key })?;
    node.as_map()
        .cloned()
        .ok_or(ConfigError::SectionNotAMapping {
            key,
            found: node.kind(),
        })
}

/// An ordered batch of configs rendered together.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Configs(Vec<Config>);

impl Configs {
    pub fn new(configs: Vec<Config>) -> Self {
        Self(configs)
    }

    /// Accepts one envelope or a sequence of them.
    pub fn from_node(node: &Node) -> Result<Self, ConfigError> {
        let configs = match node {
            Node::Map(_) => vec![Config::from_node(node)?],
            Node::Seq(items) => items
                .iter()
                .map(Config::from_node)
                .collect::<Result<Vec<_>, _>>()?,
            other => return Err(ConfigError::NotASequence { found: other.kind() }),
        };
        debug!(count = configs.len(), "validated configs");
        Ok(Self(configs))
    }

    pub fn push(&mut self, config: Config) {
        self.0.push(config);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Config> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Distinct `META.title` values joined with ` | `, in first-seen order.
    pub fn tab_title(&self) -> String {
        let mut titles: Vec<&str> = Vec::new();
        for title in self.0.iter().filter_map(|c| c.meta.get("title").and_then(Node::as_str)) {
            if !titles.contains(&title) {
                titles.push(title);
            }
        }
        if titles.is_empty() {
            DEFAULT_TAB_TITLE.to_owned()
        } else {
            titles.join(" | ")
        }
    }

    pub fn to_node(&self) -> Node {
        Node::Seq(self.0.iter().map(Config::to_node).collect())
    }

    /// Each config emitted separately, one per line.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        let parts = self
            .0
            .iter()
            .map(|c| emit::to_json(&c.to_node()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join("\n"))
    }

    /// Each config as its own YAML document.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        let parts = self
            .0
            .iter()
            .map(Config::to_yaml)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join("---\n"))
    }
}

impl From<Vec<Config>> for Configs {
    fn from(configs: Vec<Config>) -> Self {
        Self(configs)
    }
}

impl<'a> IntoIterator for &'a Configs {
    type Item = &'a Config;
    type IntoIter = std::slice::Iter<'a, Config>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

//! Configuration for an engine instance.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where world content comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    /// The dataset compiled into `umbra-core`.
    #[default]
    Embedded,
    /// A directory of JSON content files. Falls back to the embedded dataset
    /// if it cannot be loaded.
    Directory(PathBuf),
}

/// Configuration for an engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Content source.
    pub content: ContentSource,
    /// Highest progression layer to keep; `None` keeps everything.
    pub max_layer: Option<u32>,
    /// Upper bound on puzzle-evaluation passes per command.
    pub max_evaluation_passes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            content: ContentSource::Embedded,
            max_layer: None,
            max_evaluation_passes: 16,
        }
    }
}

impl EngineConfig {
    /// Load content from a directory.
    pub fn with_content_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.content = ContentSource::Directory(dir.into());
        self
    }

    /// Restrict content to layers up to `layer`.
    pub fn with_max_layer(mut self, layer: u32) -> Self {
        self.max_layer = Some(layer);
        self
    }

    /// Set the evaluation pass limit (at least 1).
    pub fn with_max_evaluation_passes(mut self, passes: usize) -> Self {
        self.max_evaluation_passes = passes.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.content, ContentSource::Embedded);
        assert_eq!(cfg.max_layer, None);
        assert_eq!(cfg.max_evaluation_passes, 16);
    }

    #[test]
    fn builder_methods() {
        let cfg = EngineConfig::default()
            .with_content_dir("content")
            .with_max_layer(0)
            .with_max_evaluation_passes(0);
        assert_eq!(cfg.content, ContentSource::Directory("content".into()));
        assert_eq!(cfg.max_layer, Some(0));
        assert_eq!(cfg.max_evaluation_passes, 1);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"max_layer": 1}"#).unwrap();
        assert_eq!(cfg.max_layer, Some(1));
        assert_eq!(cfg.content, ContentSource::Embedded);
        assert_eq!(cfg.max_evaluation_passes, 16);
    }
}

//! Topic key normalization and the persistent node cache
//!
//! One JSON file per normalized topic in a flat directory. The store has
//! full-overwrite semantics only: callers load the whole node, mutate their
//! copy, and store the whole node back. No locking or versioning lives at
//! this layer.

use crate::core::error::{Result, SkillError};
use crate::tree::node::SkillNode;
use std::fs;
use std::path::{Path, PathBuf};

/// Map a topic string to its canonical, filesystem-safe cache key
///
/// Lowercases the input and replaces every character that is not ASCII
/// alphanumeric or a hyphen with an underscore. Total and idempotent.
/// Distinct topics can collide on one key (punctuation-only differences);
/// the cache serves whichever was stored first.
pub fn normalize_key(topic: &str) -> String {
    topic
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Store capability the builder is written against
///
/// Keeping the builder behind this seam means a database or remote cache
/// backend can replace the filesystem without touching builder logic.
pub trait NodeStore: Send + Sync {
    fn exists(&self, key: &str) -> bool;

    /// Load the node for `key`, failing with `NotFound` if absent
    fn load(&self, key: &str) -> Result<SkillNode>;

    /// Idempotent full overwrite; creates the backing directory lazily
    fn store(&self, key: &str, node: &SkillNode) -> Result<()>;
}

/// Disk-backed node store: `<dir>/<key>.json`, pretty-printed
pub struct FsNodeStore {
    dir: PathBuf,
}

impl FsNodeStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl NodeStore for FsNodeStore {
    fn exists(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }

    fn load(&self, key: &str) -> Result<SkillNode> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Err(SkillError::NotFound(key.to_string()));
        }
        let data = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn store(&self, key: &str, node: &SkillNode) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        fs::write(&path, serde_json::to_string_pretty(node)?)?;
        tracing::debug!(key, path = %path.display(), "stored node");
        Ok(())
    }
}

//! Skill tree data model
//!
//! A node is one topic: a name, sub-topic children, practice items and
//! reference links. Children arrive from the model as stubs (name only) and
//! are hydrated into full nodes by the builder. Field names mirror what the
//! model is instructed to emit, so the same structs parse model output and
//! serialize cache files.

use serde::{Deserialize, Serialize};

/// One practice exercise with its worked solution
///
/// The model is asked for short `{q, s}` pairs; at rest the fields are
/// spelled out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PracticeItem {
    #[serde(alias = "q")]
    pub question: String,
    #[serde(alias = "s")]
    pub solution: String,
}

/// A reference link attached to a node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reference {
    pub title: String,
    pub url: String,
}

/// The content pair of a node, synthesized together
///
/// Invariant: practice items and references are both present or both empty;
/// content synthesis always targets the pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeContent {
    #[serde(default)]
    pub practice_items: Vec<PracticeItem>,
    // Some model replies label references "videoTutorials"; accept both.
    #[serde(default, alias = "videoTutorials")]
    pub references: Vec<Reference>,
}

impl NodeContent {
    pub fn is_empty(&self) -> bool {
        self.practice_items.is_empty() && self.references.is_empty()
    }
}

/// A materialized topic in the skill tree
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkillNode {
    pub name: String,

    /// Ordered sub-topics; order is presentation order and must be preserved
    #[serde(default)]
    pub children: Vec<SkillNode>,

    #[serde(default)]
    pub practice_items: Vec<PracticeItem>,

    #[serde(default, alias = "videoTutorials")]
    pub references: Vec<Reference>,

    /// True once this node was returned as an already-hydrated child:
    /// downstream renderers must not re-fetch it
    #[serde(default)]
    pub collapsed: bool,
}

impl SkillNode {
    /// A child entry with only a name, not yet expanded
    pub fn stub(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// True when the node carries no content pair (a stub or a node whose
    /// content synthesis failed and was never backfilled)
    pub fn is_stub(&self) -> bool {
        self.practice_items.is_empty() && self.references.is_empty()
    }

    /// True when both halves of the content pair are populated
    pub fn has_content(&self) -> bool {
        !self.practice_items.is_empty() && !self.references.is_empty()
    }

    /// Overwrite the content pair, preserving every other field
    pub fn merge_content(&mut self, content: NodeContent) {
        self.practice_items = content.practice_items;
        self.references = content.references;
    }

    /// The node returned when tree synthesis fails irrecoverably: the error
    /// is carried as data so siblings and ancestors proceed normally
    pub fn degraded(topic: &str, message: &str) -> Self {
        Self {
            name: topic.to_string(),
            children: Vec::new(),
            practice_items: vec![PracticeItem {
                question: "Error".to_string(),
                solution: message.to_string(),
            }],
            references: Vec::new(),
            collapsed: false,
        }
    }
}

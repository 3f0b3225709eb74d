//! The two synthesis operations against the external model
//!
//! Content synthesis fills the practice/reference pair for one named node and
//! is fail-soft: any call or parse failure degrades to empty content. Node
//! synthesis produces a whole node with stub children and propagates failure
//! to the builder, which converts it into a degraded node.

use crate::core::config::BuilderConfig;
use crate::core::error::{Result, SkillError};
use crate::llm::client::CompletionModel;
use crate::llm::prompts;
use crate::tree::cache::{normalize_key, NodeStore};
use crate::tree::node::{NodeContent, SkillNode};

/// Ask the model for the practice/reference pair of one node
///
/// Never fails: a model error or unparseable reply is logged and yields
/// empty content. No retry.
pub async fn synthesize_content(
    model: &dyn CompletionModel,
    cfg: &BuilderConfig,
    name: &str,
    ancestors: &[String],
) -> NodeContent {
    match try_synthesize_content(model, cfg, name, ancestors).await {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(node = name, error = %e, "content synthesis failed; continuing with empty content");
            NodeContent::default()
        }
    }
}

async fn try_synthesize_content(
    model: &dyn CompletionModel,
    cfg: &BuilderConfig,
    name: &str,
    ancestors: &[String],
) -> Result<NodeContent> {
    let response = model
        .complete(
            &prompts::content_system_prompt(cfg),
            &prompts::user_prompt(name, ancestors),
        )
        .await?;
    let body = prompts::strip_fences(&response);
    serde_json::from_str(body).map_err(|e| {
        SkillError::Synthesis(format!("bad content payload: {} - response: {}", e, response))
    })
}

/// Ask the model for a full node: name, stub children, and content
///
/// Post-parse policy, in order: backfill an empty content pair through
/// content synthesis, drop children already cached anywhere in the store,
/// then cap the remainder (roots keep more breadth than interior nodes).
pub async fn synthesize_node(
    model: &dyn CompletionModel,
    store: &dyn NodeStore,
    cfg: &BuilderConfig,
    name: &str,
    ancestors: &[String],
) -> Result<SkillNode> {
    let response = model
        .complete(
            &prompts::node_system_prompt(cfg),
            &prompts::user_prompt(name, ancestors),
        )
        .await?;
    let body = prompts::strip_fences(&response);
    let mut node: SkillNode = serde_json::from_str(body).map_err(|e| {
        SkillError::Synthesis(format!("bad node payload: {} - response: {}", e, response))
    })?;

    if node.practice_items.is_empty() || node.references.is_empty() {
        tracing::debug!(node = name, "model omitted content; backfilling");
        let content = synthesize_content(model, cfg, name, ancestors).await;
        node.merge_content(content);
    }

    // Global dedup: a child that already exists as its own cached node must
    // not be re-expanded here. A child renaming this node or one of its
    // ancestors would recurse into a cycle, so those are dropped too.
    let mut reserved: Vec<String> = ancestors.iter().map(|a| normalize_key(a)).collect();
    reserved.push(normalize_key(name));
    node.children.retain(|child| {
        let key = normalize_key(&child.name);
        !reserved.contains(&key) && !store.exists(&key)
    });

    let cap = if ancestors.is_empty() {
        cfg.root_child_cap
    } else {
        cfg.branch_child_cap
    };
    node.children.truncate(cap);

    Ok(node)
}

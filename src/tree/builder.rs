//! Recursive tree builder over the node cache
//!
//! Per node the builder decides between four paths: serve from cache,
//! backfill a cached node whose content pair is empty, hydrate cached stub
//! children, or synthesize fresh. Work within one build is strictly
//! sequential, so a single request holds at most one model call in flight.
//! Across requests, every synthesize-and-store is single-flighted per key.
//! A key's lock is never held while acquiring another key's lock: hydration
//! runs unlocked, so concurrent requests over trees that reference each
//! other cannot wedge.

use crate::core::config::BuilderConfig;
use crate::core::error::Result;
use crate::llm::client::CompletionModel;
use crate::tree::cache::{normalize_key, NodeStore};
use crate::tree::node::SkillNode;
use crate::tree::synthesizer::{synthesize_content, synthesize_node};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Orchestrates cache, synthesis and recursion for one topic tree
pub struct TreeBuilder<M: CompletionModel, S: NodeStore> {
    model: M,
    store: S,
    config: BuilderConfig,
    /// Per-key locks serializing synthesis so concurrent misses on one
    /// topic cost a single model call
    inflight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<M: CompletionModel, S: NodeStore> TreeBuilder<M, S> {
    pub fn new(model: M, store: S) -> Self {
        Self::with_config(model, store, BuilderConfig::default())
    }

    pub fn with_config(model: M, store: S, config: BuilderConfig) -> Self {
        Self {
            model,
            store,
            config,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Access the underlying completion model
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Build a fully materialized node for `topic`
    ///
    /// `depth` is the current recursion depth (0 for an inbound request),
    /// `max_depth` the expansion budget: children are hydrated only while
    /// `depth < max_depth`. Synthesis failures come back as a degraded node
    /// scoped to that branch; only storage errors fail the whole request.
    pub async fn build(
        &self,
        topic: &str,
        ancestors: &[String],
        depth: u32,
        max_depth: u32,
    ) -> Result<SkillNode> {
        let key = normalize_key(topic);

        if !self.store.exists(&key) {
            let lock = self.key_lock(&key);
            let degraded = {
                let _guard = lock.lock().await;
                // Another request may have synthesized this key while we
                // waited on the lock.
                if self.store.exists(&key) {
                    None
                } else {
                    match synthesize_node(&self.model, &self.store, &self.config, topic, ancestors)
                        .await
                    {
                        Ok(node) => {
                            self.store.store(&key, &node)?;
                            tracing::info!(topic, key = %key, children = node.children.len(), "synthesized node");
                            None
                        }
                        Err(e) => {
                            tracing::warn!(topic, error = %e, "node synthesis failed; returning degraded node");
                            Some(SkillNode::degraded(topic, &e.to_string()))
                        }
                    }
                }
            };
            // Released before hydration: children below take their own
            // locks, and two requests holding each other's keys would never
            // make progress.
            self.unlock_key(&key, lock);

            if let Some(node) = degraded {
                return Ok(node);
            }
        }

        self.expand_cached(&key, ancestors, depth, max_depth).await
    }

    /// Serve a cached node, backfilling content and hydrating stub children
    /// as the depth budget allows
    async fn expand_cached(
        &self,
        key: &str,
        ancestors: &[String],
        depth: u32,
        max_depth: u32,
    ) -> Result<SkillNode> {
        let mut node = self.store.load(key)?;

        if node.is_stub() {
            node = self.backfill_content(key, ancestors).await?;
        }

        let first_child_is_stub = node.children.first().map(SkillNode::is_stub).unwrap_or(false);
        if depth < max_depth && first_child_is_stub {
            // Lazy hydration: this expansion reaches deeper than what was
            // previously cached.
            tracing::debug!(key, children = node.children.len(), "hydrating cached stub children");
            node.children = self
                .hydrate_children(&node, ancestors, depth, max_depth)
                .await?;
            self.store.store(key, &node)?;
        } else {
            for child in &mut node.children {
                child.collapsed = true;
            }
        }

        Ok(node)
    }

    /// Repair a cached node whose content pair is empty
    ///
    /// Single-flighted per key: concurrent requests over the same stub node
    /// serialize here, and late arrivals find the repaired node on re-load.
    async fn backfill_content(&self, key: &str, ancestors: &[String]) -> Result<SkillNode> {
        let lock = self.key_lock(key);
        let node = {
            let _guard = lock.lock().await;
            let mut node = self.store.load(key)?;
            if node.is_stub() {
                let content =
                    synthesize_content(&self.model, &self.config, &node.name, ancestors).await;
                node.merge_content(content);
                self.store.store(key, &node)?;
            }
            node
        };
        self.unlock_key(key, lock);
        Ok(node)
    }

    /// Build each child in order, one at a time, and mark it collapsed
    ///
    /// Sequential on purpose: parallel fan-out would multiply concurrent
    /// model calls issued by a single request.
    async fn hydrate_children(
        &self,
        node: &SkillNode,
        ancestors: &[String],
        depth: u32,
        max_depth: u32,
    ) -> Result<Vec<SkillNode>> {
        let mut child_ancestors = ancestors.to_vec();
        child_ancestors.push(node.name.clone());

        let mut hydrated = Vec::with_capacity(node.children.len());
        for child in &node.children {
            let mut built =
                Box::pin(self.build(&child.name, &child_ancestors, depth + 1, max_depth)).await?;
            built.collapsed = true;
            hydrated.push(built);
        }
        Ok(hydrated)
    }

    fn key_lock(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Return a lock handle, evicting the map entry once nobody else holds it
    ///
    /// The handle is dropped under the map mutex so the strong count is
    /// race-free: a count of one means only the map itself still refers to
    /// the lock.
    fn unlock_key(&self, key: &str, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
        drop(lock);
        let unused = locks
            .get(key)
            .map(|entry| Arc::strong_count(entry) == 1)
            .unwrap_or(false);
        if unused {
            locks.remove(key);
        }
    }
}

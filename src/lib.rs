//! Skilltree - LLM-synthesized skill trees with a disk-backed node cache

pub mod core;
pub mod llm;
pub mod tree;

pub mod builder;
pub mod cache;
pub mod node;
pub mod synthesizer;

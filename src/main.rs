//! Skilltree - Entry Point
//!
//! Builds the skill tree for one topic and prints it as JSON. The node cache
//! persists between runs, so repeating or expanding a topic reuses earlier
//! synthesis instead of calling the model again.

use clap::Parser;
use skilltree::core::error::Result;
use skilltree::llm::client::LlmClient;
use skilltree::tree::builder::TreeBuilder;
use skilltree::tree::cache::FsNodeStore;
use std::path::PathBuf;

/// Generate a skill tree for a topic via an external LLM, memoized on disk
#[derive(Parser, Debug)]
#[command(name = "skilltree")]
#[command(about = "Generate a skill tree for a topic, memoized on disk")]
struct Args {
    /// Topic to build a tree for
    topic: String,

    /// Expansion budget: 0 builds just the topic node, 1 also hydrates its
    /// direct children
    #[arg(long, default_value_t = 1)]
    depth: u32,

    /// Directory holding the node cache
    #[arg(long, default_value = "tree_cache")]
    cache_dir: PathBuf,

    /// Pretty-print the resulting JSON
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "skilltree=info".into()),
        )
        .init();

    let args = Args::parse();

    let client = LlmClient::from_env()?;
    let builder = TreeBuilder::new(client, FsNodeStore::new(&args.cache_dir));

    tracing::info!(topic = %args.topic, depth = args.depth, "building tree");
    let node = builder.build(&args.topic, &[], 0, args.depth).await?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&node)?
    } else {
        serde_json::to_string(&node)?
    };
    println!("{output}");

    Ok(())
}

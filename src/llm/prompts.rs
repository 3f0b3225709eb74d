//! Instruction construction for the two synthesis operations
//!
//! Both prompts demand a single JSON object and nothing else. Models still
//! wrap replies in a markdown code fence often enough that responses are
//! fence-stripped before parsing.

use crate::core::config::BuilderConfig;

/// System prompt for full-node synthesis: name, stub children, and content
pub fn node_system_prompt(cfg: &BuilderConfig) -> String {
    format!(
        r#"You are building a skill tree for self-directed learners.
Given a topic, produce the topic's node: its name, its immediate sub-topics,
practice material, and reference links.

RULES:
- 0-{max_children} sub-topics, ordered from foundational to advanced
- sub-topics are names only; never expand them
- exactly {items} practice items, each a short question with a worked solution
- {min_refs}-{max_refs} reference links to real, well-known resources

OUTPUT FORMAT (a single JSON object, no explanation, no code fences):
{{
  "name": "topic name",
  "children": [{{"name": "sub-topic name"}}],
  "practiceItems": [{{"q": "question", "s": "solution"}}],
  "videoTutorials": [{{"title": "reference title", "url": "https://..."}}]
}}"#,
        max_children = cfg.root_child_cap,
        items = cfg.practice_items_per_node,
        min_refs = cfg.min_references,
        max_refs = cfg.max_references,
    )
}

/// System prompt for content-only synthesis: the practice/reference pair
pub fn content_system_prompt(cfg: &BuilderConfig) -> String {
    format!(
        r#"You write practice material for one node of a skill tree.

RULES:
- exactly {items} practice items, each a short question with a worked solution
- {min_refs}-{max_refs} reference links to real, well-known resources

OUTPUT FORMAT (a single JSON object, no explanation, no code fences):
{{
  "practiceItems": [{{"q": "question", "s": "solution"}}],
  "videoTutorials": [{{"title": "reference title", "url": "https://..."}}]
}}"#,
        items = cfg.practice_items_per_node,
        min_refs = cfg.min_references,
        max_refs = cfg.max_references,
    )
}

/// User prompt naming the target node, with the ancestor chain as context
pub fn user_prompt(name: &str, ancestors: &[String]) -> String {
    let mut prompt = format!("TOPIC: {name}\n");
    if !ancestors.is_empty() {
        prompt.push_str(&format!("CONTEXT PATH: {}\n", render_ancestors(ancestors)));
    }
    prompt.push_str("\nReturn the JSON object for this topic:");
    prompt
}

/// Render the root-to-parent chain as a breadcrumb hint
fn render_ancestors(ancestors: &[String]) -> String {
    ancestors.join(" > ")
}

/// Strip an optional wrapping markdown fence from a model reply
pub fn strip_fences(response: &str) -> &str {
    let mut body = response.trim();
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fences_plain() {
        assert_eq!(strip_fences(r#"{"name": "Rust"}"#), r#"{"name": "Rust"}"#);
    }

    #[test]
    fn test_strip_fences_json_fence() {
        let fenced = "```json\n{\"name\": \"Rust\"}\n```";
        assert_eq!(strip_fences(fenced), "{\"name\": \"Rust\"}");
    }

    #[test]
    fn test_strip_fences_bare_fence() {
        let fenced = "```\n{\"name\": \"Rust\"}\n```";
        assert_eq!(strip_fences(fenced), "{\"name\": \"Rust\"}");
    }

    #[test]
    fn test_user_prompt_includes_ancestors_when_present() {
        let prompt = user_prompt("Borrowing", &["Rust".into(), "Ownership".into()]);
        assert!(prompt.contains("TOPIC: Borrowing"));
        assert!(prompt.contains("CONTEXT PATH: Rust > Ownership"));

        let rootless = user_prompt("Rust", &[]);
        assert!(!rootless.contains("CONTEXT PATH"));
    }

    #[test]
    fn test_prompts_carry_configured_counts() {
        let cfg = BuilderConfig::default();
        let node = node_system_prompt(&cfg);
        assert!(node.contains("0-6 sub-topics"));
        assert!(node.contains("exactly 3 practice items"));
        assert!(node.contains("2-3 reference links"));

        let content = content_system_prompt(&cfg);
        assert!(content.contains("exactly 3 practice items"));
    }
}

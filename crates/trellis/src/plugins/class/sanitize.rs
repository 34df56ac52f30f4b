//! Identifier sanitization for class-diagram markup

use regex::Regex;
use std::sync::LazyLock;

use crate::core::Node;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("word pattern is valid"));

/// Collapse whitespace runs to `_`, then drop every non-word character
///
/// ```
/// use trellis::plugins::class::sanitize;
///
/// assert_eq!(sanitize("Leaf A"), "Leaf_A");
/// assert_eq!(sanitize("  a-b  c!"), "_ab_c");
/// ```
pub fn sanitize(name: &str) -> String {
    let collapsed = WHITESPACE.replace_all(name, "_");
    NON_WORD.replace_all(&collapsed, "").into_owned()
}

/// Markup identifier of a node: `<sanitized name>_<id>`
pub fn identifier(node: &Node) -> String {
    format!("{}_{}", sanitize(&node.name), node.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(sanitize("a \t\n b"), "a_b");
    }

    #[test]
    fn test_punctuation_stripped() {
        assert_eq!(sanitize("Who's (there)?"), "Whos_there");
    }

    #[test]
    fn test_non_ascii_stripped() {
        assert_eq!(sanitize("café crème"), "caf_crme");
    }

    #[test]
    fn test_idempotent() {
        let once = sanitize("  Some - weird\tname ");
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_identifier() {
        assert_eq!(identifier(&Node::new(2, "Leaf A", "field")), "Leaf_A_2");
        assert_eq!(identifier(&Node::new(7, "", "field")), "_7");
    }
}

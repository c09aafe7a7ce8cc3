//! Fragment selection - split a document into extraction-sized subtrees.
//!
//! Every node gets a complexity score (how much an extractor would have to
//! read) and a usefulness score (how likely it is to carry distinguishing
//! content). Nodes inside the complexity window that are useful enough are
//! emitted whole; oversized nodes are split into their children. A node is
//! only descended into when it was not emitted, so fragments never overlap.

use tracing::debug;

use crate::error::Result;
use crate::types::config::SelectorConfig;
use crate::types::fragment::Fragment;
use crate::types::xml::XmlNode;

/// Tags that only wrap content and say nothing about the producer.
const GENERIC_WRAPPERS: &[&str] = &["root", "document", "wrapper"];

/// Minimum usefulness for a node inside the window to be emitted.
const MIN_USEFULNESS: f32 = 30.0;

/// Children explored below a node that is too small or not useful enough.
const SMALL_NODE_CHILD_LIMIT: usize = 5;

/// Weighted size estimate of a subtree.
///
/// Serialized length alone under-counts deep, narrow structures, so child
/// count, subtree depth and attribute count are folded in.
pub fn complexity(node: &XmlNode) -> f32 {
    node.serialized_len() as f32 * 0.4
        + node.children.len() as f32 * 100.0
        + node.subtree_depth() as f32 * 50.0
        + node.attributes.len() as f32 * 10.0
}

/// Heuristic value of a subtree for pattern extraction.
pub fn usefulness(node: &XmlNode) -> f32 {
    let mut score = 0.0;

    if node.has_text() {
        score += 50.0;
    }

    score += node.attributes.len() as f32 * 20.0;

    match node.children.len() {
        0 => {}
        1..=10 => score += 30.0,
        // Overly broad containers
        _ => score -= 10.0,
    }

    if !is_generic_wrapper(&node.tag) {
        score += 20.0;
    }

    score
}

fn is_generic_wrapper(tag: &str) -> bool {
    GENERIC_WRAPPERS.iter().any(|w| tag.eq_ignore_ascii_case(w))
}

/// Partitions XML trees into non-overlapping fragments.
#[derive(Debug, Clone)]
pub struct FragmentSelector {
    config: SelectorConfig,
}

impl FragmentSelector {
    /// Create a selector, rejecting an invalid config up front.
    pub fn new(config: SelectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Select fragments from a tree.
    ///
    /// Returns an empty vector when no node satisfies the criteria.
    pub fn select(&self, root: &XmlNode) -> Vec<Fragment> {
        let mut fragments = Vec::new();
        self.visit(root, 0, &mut fragments);

        let found = fragments.len();
        if found > self.config.max_fragments {
            keep_most_useful(&mut fragments, self.config.max_fragments);
            debug!(
                found = found,
                kept = fragments.len(),
                "Trimmed fragments by usefulness"
            );
        }

        debug!(
            root = %root.path,
            fragment_count = fragments.len(),
            "Selected fragments"
        );
        fragments
    }

    fn visit(&self, node: &XmlNode, depth: usize, out: &mut Vec<Fragment>) {
        if depth > self.config.max_recursion_depth {
            return;
        }

        let complexity = complexity(node);

        if complexity > self.config.max_fragment_chars as f32 {
            for child in &node.children {
                self.visit(child, depth + 1, out);
            }
            return;
        }

        let usefulness = usefulness(node);
        if complexity >= self.config.min_fragment_chars as f32 && usefulness >= MIN_USEFULNESS {
            out.push(Fragment {
                path: node.path.clone(),
                xml: node.to_xml(),
                complexity,
                usefulness,
            });
            return;
        }

        // Small or unuseful nodes stop one level short of the bound
        if depth + 1 >= self.config.max_recursion_depth {
            return;
        }
        for child in node.children.iter().take(SMALL_NODE_CHILD_LIMIT) {
            self.visit(child, depth + 1, out);
        }
    }
}

/// Select fragments with a one-off config.
pub fn select_fragments(root: &XmlNode, config: &SelectorConfig) -> Result<Vec<Fragment>> {
    Ok(FragmentSelector::new(config.clone())?.select(root))
}

/// Keep the `limit` most useful fragments, preserving document order.
///
/// Ties keep the earlier fragment.
fn keep_most_useful(fragments: &mut Vec<Fragment>, limit: usize) {
    let mut ranked: Vec<usize> = (0..fragments.len()).collect();
    ranked.sort_by(|&a, &b| fragments[b].usefulness.total_cmp(&fragments[a].usefulness));

    let mut keep = vec![false; fragments.len()];
    for &index in ranked.iter().take(limit) {
        keep[index] = true;
    }

    let mut index = 0;
    fragments.retain(|_| {
        let kept = keep[index];
        index += 1;
        kept
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pax(id: &str, ptc: &str) -> XmlNode {
        XmlNode::new("Pax").with_children([
            XmlNode::new("PaxID").with_text(id),
            XmlNode::new("PTC").with_text(ptc),
            XmlNode::new("Individual").with_children([
                XmlNode::new("GivenName").with_text("Alexandra"),
                XmlNode::new("Surname").with_text("Montgomery"),
            ]),
        ])
    }

    fn assert_no_overlap(fragments: &[Fragment]) {
        for (i, a) in fragments.iter().enumerate() {
            for b in &fragments[i + 1..] {
                assert!(!a.overlaps(b), "{} overlaps {}", a.path, b.path);
            }
        }
    }

    fn selector(min: usize, max: usize) -> FragmentSelector {
        FragmentSelector::new(SelectorConfig::new().with_window(min, max)).unwrap()
    }

    #[test]
    fn test_complexity_weights() {
        let leaf = XmlNode::new("PTC").with_text("ADT");
        // <PTC>ADT</PTC> is 14 chars
        assert!((complexity(&leaf) - 5.6).abs() < 1e-4);

        let node = XmlNode::new("Pax")
            .with_attribute("id", "1")
            .with_child(leaf);
        let expected = node.serialized_len() as f32 * 0.4 + 100.0 + 50.0 + 10.0;
        assert!((complexity(&node) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_usefulness_rules() {
        assert_eq!(usefulness(&XmlNode::new("root")), 0.0);
        assert_eq!(usefulness(&XmlNode::new("PaxList")), 20.0);
        assert_eq!(usefulness(&XmlNode::new("PTC").with_text("ADT")), 70.0);
        assert_eq!(usefulness(&XmlNode::new("PTC").with_text("   ")), 20.0);
        assert_eq!(
            usefulness(&XmlNode::new("Pax").with_attribute("a", "1").with_attribute("b", "2")),
            60.0
        );
        assert_eq!(usefulness(&pax("P1", "ADT")), 50.0);

        let broad = XmlNode::new("Document").with_children((0..11).map(|_| XmlNode::new("X")));
        assert_eq!(usefulness(&broad), -10.0);
    }

    #[test]
    fn test_root_inside_window_is_single_fragment() {
        let root = XmlNode::new("Pax").with_attribute("id", "1").with_text("hello");
        let fragments = selector(10, 100).select(&root);

        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].path, "/Pax");
        assert_eq!(fragments[0].xml, "<Pax id=\"1\">hello</Pax>");
    }

    #[test]
    fn test_small_leaf_contributes_nothing() {
        let fragments = selector(100, 1000).select(&XmlNode::new("A"));
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_oversized_root_splits_into_children() {
        let root = XmlNode::new("PaxList").with_children([
            pax("PAX1", "ADT"),
            pax("PAX2", "ADT"),
            pax("PAX3", "INF"),
        ]);
        let child = complexity(&root.children[0]);
        let max = child.ceil() as usize + 5;
        assert!(complexity(&root) > max as f32);

        let fragments = selector(child.floor() as usize - 5, max).select(&root);
        let paths: Vec<_> = fragments.iter().map(|f| f.path.as_str()).collect();

        assert_eq!(
            paths,
            vec!["/PaxList/Pax[1]", "/PaxList/Pax[2]", "/PaxList/Pax[3]"]
        );
        assert_no_overlap(&fragments);
    }

    #[test]
    fn test_unuseful_node_explores_first_five_children() {
        let filler = "x".repeat(130);
        let root = XmlNode::new("document")
            .with_children((0..12).map(|_| XmlNode::new("Item").with_text(filler.clone())));
        assert!(usefulness(&root) < MIN_USEFULNESS);

        let fragments = selector(50, 5000).select(&root);

        assert_eq!(fragments.len(), 5);
        assert_eq!(fragments[0].path, "/document/Item[1]");
        assert_eq!(fragments[4].path, "/document/Item[5]");
    }

    #[test]
    fn test_recursion_depth_bound() {
        let root = XmlNode::new("PaxList").with_children([pax("PAX1", "ADT"), pax("PAX2", "INF")]);
        let child = complexity(&root.children[0]);
        let config = SelectorConfig::new()
            .with_window(child.floor() as usize - 5, child.ceil() as usize + 5)
            .with_max_depth(0);

        let fragments = FragmentSelector::new(config).unwrap().select(&root);
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_unuseful_node_stops_short_of_depth_bound() {
        let filler = "x".repeat(130);
        let root = XmlNode::new("document")
            .with_children((0..12).map(|_| XmlNode::new("Item").with_text(filler.clone())));
        let window = SelectorConfig::new().with_window(50, 5000);

        let shallow = FragmentSelector::new(window.clone().with_max_depth(1)).unwrap();
        assert!(shallow.select(&root).is_empty());

        let deeper = FragmentSelector::new(window.with_max_depth(2)).unwrap();
        assert_eq!(deeper.select(&root).len(), 5);
    }

    #[test]
    fn test_cap_keeps_most_useful_in_document_order() {
        let root = XmlNode::new("PaxList").with_children([
            pax("PAX1", "ADT"),
            pax("PAX2", "ADT").with_attribute("Primary", "true"),
            pax("PAX3", "CHD"),
            pax("PAX4", "INF").with_attribute("Lap", "true"),
        ]);
        let smallest = complexity(&root.children[0]);
        let largest = complexity(&root.children[1]);
        let config = SelectorConfig::new()
            .with_window(smallest.floor() as usize - 5, largest.ceil() as usize + 5)
            .with_max_fragments(2);

        let fragments = FragmentSelector::new(config).unwrap().select(&root);
        let paths: Vec<_> = fragments.iter().map(|f| f.path.as_str()).collect();

        assert_eq!(paths, vec!["/PaxList/Pax[2]", "/PaxList/Pax[4]"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SelectorConfig::new().with_window(10, 5);
        assert!(FragmentSelector::new(config.clone()).is_err());
        assert!(select_fragments(&XmlNode::new("A"), &config).is_err());
    }
}

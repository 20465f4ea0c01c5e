use std::collections::HashSet;
use std::str::FromStr;

use strum::EnumString;

use crate::document::{Document, NodeId};

/// Tags whose content is offered for text editing
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum EditableTag {
    P,
    Div,
    Span,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl EditableTag {
    pub fn matches(tag_name: &str) -> bool {
        Self::from_str(tag_name).is_ok()
    }
}

/// An addressable text region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableNode {
    pub handle: usize,
    pub node: NodeId,
    /// Trimmed inner markup at the time the index was built
    pub content: String,
}

/// Dense handle assignment over the editable elements of one document.
///
/// Elements are visited in document order and identified by their trimmed
/// inner markup: the first element with a given content receives the handle
/// and later elements with identical content are not addressable at all.
/// Content that is empty after trimming is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeIndex {
    nodes: Vec<EditableNode>,
}

impl NodeIndex {
    pub fn build(document: &Document) -> Self {
        let mut seen = HashSet::new();
        let mut nodes = vec![];

        for id in document.find_elements(|element| EditableTag::matches(element.name())) {
            let content = document.inner_markup(id).trim().to_string();
            if content.is_empty() || !seen.insert(content.clone()) {
                continue;
            }
            nodes.push(EditableNode {
                handle: nodes.len(),
                node: id,
                content,
            });
        }

        log::debug!(
            "indexed {} editable nodes in {}",
            nodes.len(),
            document.path().display()
        );

        Self { nodes }
    }

    pub fn get(&self, handle: usize) -> Option<&EditableNode> {
        self.nodes.get(handle)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EditableNode> {
        self.nodes.iter()
    }
}

/// A hyperlink as currently present in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub position: usize,
    pub node: NodeId,
    pub label: String,
    pub target: String,
}

/// Anchors carrying an `href`, in document order, including duplicates
pub fn list_links(document: &Document) -> Vec<Link> {
    document
        .find_elements(|element| element.name() == "a" && element.has_attribute("href"))
        .into_iter()
        .enumerate()
        .map(|(position, node)| Link {
            position,
            node,
            label: document.text_content(node),
            target: document
                .element(node)
                .and_then(|element| element.attribute("href"))
                .unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <h1>Our Club</h1>
  <p>Welcome</p>
  <p>   </p>
  <p>Welcome</p>
  <p>Contact us</p>
  <ul><li><a href="/join">Join</a></li><li><a href="/join">Join</a></li></ul>
  <a name="top">anchor without target</a>
</body>
</html>
"#;

    #[test]
    fn assigns_dense_handles_in_document_order() {
        let document = Document::parse("index.html", PAGE).unwrap();
        let index = NodeIndex::build(&document);

        let contents = index
            .iter()
            .map(|node| (node.handle, node.content.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            contents,
            vec![(0, "Our Club"), (1, "Welcome"), (2, "Contact us")]
        );
    }

    #[test]
    fn duplicate_content_is_addressable_only_once() {
        let document = Document::parse("index.html", PAGE).unwrap();
        let index = NodeIndex::build(&document);
        let paragraphs = document.find_elements(|element| element.name() == "p");

        assert_eq!(index.get(1).map(|node| node.node), Some(paragraphs[0]));
        assert!(index.iter().all(|node| node.node != paragraphs[2]));
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let document = Document::parse("index.html", PAGE).unwrap();
        assert_eq!(NodeIndex::build(&document), NodeIndex::build(&document));
    }

    #[test]
    fn nested_containers_are_indexed_before_their_children() {
        let document =
            Document::parse("nested.html", "<div><p>Inside</p></div><span>Tail</span>").unwrap();
        let index = NodeIndex::build(&document);

        let contents = index
            .iter()
            .map(|node| node.content.as_str())
            .collect::<Vec<_>>();
        assert_eq!(contents, vec!["<p>Inside</p>", "Inside", "Tail"]);
    }

    #[test]
    fn links_are_listed_without_deduplication() {
        let document = Document::parse("index.html", PAGE).unwrap();
        let links = list_links(&document)
            .into_iter()
            .map(|link| (link.position, link.label, link.target))
            .collect::<Vec<_>>();

        assert_eq!(
            links,
            vec![
                (0, "Join".to_string(), "/join".to_string()),
                (1, "Join".to_string(), "/join".to_string()),
            ]
        );
    }

    #[test]
    fn editable_tags_are_recognized_by_name() {
        assert!(EditableTag::matches("p"));
        assert!(EditableTag::matches("h6"));
        assert!(!EditableTag::matches("a"));
        assert!(!EditableTag::matches("body"));
    }
}

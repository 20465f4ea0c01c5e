use std::ops::Range;

use tree_sitter::Node as SyntaxNode;

use super::markup::{decode_entities, escape_attribute, strip_comments};

/// Index of a node in a [`super::Document`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(super) usize);

/// A node of the parsed markup tree.
///
/// Everything that is not an element (character data, entities, comments,
/// doctypes, whitespace between tags) is carried as a raw text leaf holding
/// the exact source bytes, so that serializing an untouched tree reproduces
/// its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    start_tag: String,
    attributes: Vec<Attribute>,
    children: Vec<NodeId>,
    end_tag: String,
}

/// Location of one attribute within the raw start tag
#[derive(Debug, Clone, PartialEq, Eq)]
struct Attribute {
    name: String,
    name_range: Range<usize>,
    value: Option<AttributeValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeValue {
    range: Range<usize>,
    quoted: bool,
}

const ELEMENT_KINDS: &[&str] = &["element", "script_element", "style_element"];

impl Element {
    /// Lowercase tag name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn replace_children(&mut self, children: Vec<NodeId>) -> Vec<NodeId> {
        std::mem::replace(&mut self.children, children)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.find_attribute(name).is_some()
    }

    /// Attribute value with character references decoded. A present
    /// attribute without a value reads as the empty string.
    pub fn attribute(&self, name: &str) -> Option<String> {
        let attribute = self.find_attribute(name)?;
        Some(match &attribute.value {
            Some(value) => decode_entities(&self.start_tag[value.range.clone()]),
            None => String::new(),
        })
    }

    /// Rewrite a single attribute value in the raw start tag, leaving every
    /// other byte of the tag untouched.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let escaped = escape_attribute(value);
        let position = self
            .attributes
            .iter()
            .position(|attribute| attribute.name.eq_ignore_ascii_case(name));

        let (splice, replacement, index) = match position {
            Some(index) => {
                let attribute = &self.attributes[index];
                match &attribute.value {
                    Some(AttributeValue {
                        range,
                        quoted: true,
                    }) => (range.clone(), escaped.clone(), index),
                    Some(AttributeValue {
                        range,
                        quoted: false,
                    }) => (range.clone(), format!("\"{escaped}\""), index),
                    None => {
                        let end = attribute.name_range.end;
                        (end..end, format!("=\"{escaped}\""), index)
                    }
                }
            }
            None => {
                let insert_at = self.start_tag_insertion_point();
                let replacement = format!(" {name}=\"{escaped}\"");
                let name_start = insert_at + 1;
                self.start_tag.replace_range(insert_at..insert_at, &replacement);
                self.attributes.push(Attribute {
                    name: name.to_ascii_lowercase(),
                    name_range: name_start..name_start + name.len(),
                    value: Some(AttributeValue {
                        range: name_start + name.len() + 2
                            ..name_start + name.len() + 2 + escaped.len(),
                        quoted: true,
                    }),
                });
                return;
            }
        };

        let delta = replacement.len() as isize - splice.len() as isize;
        self.start_tag.replace_range(splice.clone(), &replacement);

        let attribute = &mut self.attributes[index];
        let value_start = match &attribute.value {
            Some(AttributeValue { quoted: true, .. }) => splice.start,
            _ => splice.start + replacement.len() - escaped.len() - 1,
        };
        attribute.value = Some(AttributeValue {
            range: value_start..value_start + escaped.len(),
            quoted: true,
        });

        for later in self.attributes.iter_mut().skip(index + 1) {
            later.name_range = shift(&later.name_range, delta);
            if let Some(value) = &mut later.value {
                value.range = shift(&value.range, delta);
            }
        }
    }

    fn find_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name.eq_ignore_ascii_case(name))
    }

    fn start_tag_insertion_point(&self) -> usize {
        let tag = self.start_tag.trim_end_matches('>');
        tag.trim_end_matches('/').trim_end().len()
    }
}

fn shift(range: &Range<usize>, delta: isize) -> Range<usize> {
    let move_by = |position: usize| (position as isize + delta) as usize;
    move_by(range.start)..move_by(range.end)
}

/// Converts a tree-sitter syntax tree into arena nodes.
///
/// The tree may extend past the end of `source` when closing tags were
/// appended for the parser; those bytes are never copied into nodes.
pub(super) struct TreeBuilder<'a> {
    source: &'a str,
    nodes: &'a mut Vec<Node>,
}

impl<'a> TreeBuilder<'a> {
    pub(super) fn new(source: &'a str, nodes: &'a mut Vec<Node>) -> Self {
        Self { source, nodes }
    }

    /// Build the nodes covering `range` of the source, which must be the
    /// content region of `parent`.
    pub(super) fn build_range(&mut self, parent: SyntaxNode<'_>, range: Range<usize>) -> Vec<NodeId> {
        let mut children = vec![];
        let mut raw_start = range.start;
        let mut cursor = parent.walk();

        for child in parent.named_children(&mut cursor) {
            let end = self.clip(child.end_byte());
            if !ELEMENT_KINDS.contains(&child.kind())
                || child.start_byte() < range.start
                || child.start_byte() >= self.source.len()
                || end > range.end
            {
                continue;
            }

            if child.start_byte() > raw_start {
                children.push(self.push_text(raw_start..child.start_byte()));
            }
            children.push(self.build_element(child));
            raw_start = end;
        }

        if range.end > raw_start {
            children.push(self.push_text(raw_start..range.end));
        }

        children
    }

    fn clip(&self, offset: usize) -> usize {
        offset.min(self.source.len())
    }

    fn push_text(&mut self, range: Range<usize>) -> NodeId {
        self.push(Node::Text(self.source[range].to_string()))
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn build_element(&mut self, node: SyntaxNode<'_>) -> NodeId {
        let mut cursor = node.walk();
        let parts = node.children(&mut cursor).collect::<Vec<_>>();

        let start = parts
            .iter()
            .find(|part| matches!(part.kind(), "start_tag" | "self_closing_tag"));
        let end = parts
            .iter()
            .rev()
            .find(|part| part.kind() == "end_tag" && part.start_byte() < self.source.len());

        let Some(start) = start else {
            // Nothing to address inside; keep the bytes verbatim.
            return self.push_text(node.start_byte()..self.clip(node.end_byte()));
        };

        let content = if start.kind() == "self_closing_tag" {
            start.end_byte()..start.end_byte()
        } else {
            start.end_byte()..end.map_or(self.clip(node.end_byte()), |end| end.start_byte())
        };

        let start_tag = self.source[start.byte_range()].to_string();
        let end_tag = end
            .map(|end| self.source[end.byte_range()].to_string())
            .unwrap_or_default();
        let (name, attributes) = self.read_start_tag(*start);

        let children = self.build_range(node, content);

        self.push(Node::Element(Element {
            name,
            start_tag,
            attributes,
            children,
            end_tag,
        }))
    }

    fn read_start_tag(&self, tag: SyntaxNode<'_>) -> (String, Vec<Attribute>) {
        let offset = tag.start_byte();
        let mut name = String::new();
        let mut attributes = vec![];
        let mut cursor = tag.walk();

        for child in tag.named_children(&mut cursor) {
            match child.kind() {
                "tag_name" => name = self.source[child.byte_range()].to_ascii_lowercase(),
                "attribute" => {
                    if let Some(attribute) = self.read_attribute(child, offset) {
                        attributes.push(attribute);
                    }
                }
                _ => {}
            }
        }

        (name, attributes)
    }

    fn read_attribute(&self, attribute: SyntaxNode<'_>, offset: usize) -> Option<Attribute> {
        let relative = |range: Range<usize>| range.start - offset..range.end - offset;
        let mut cursor = attribute.walk();
        let mut name = None;
        let mut value = None;

        for child in attribute.named_children(&mut cursor) {
            match child.kind() {
                "attribute_name" => name = Some(child),
                "attribute_value" => {
                    value = Some(AttributeValue {
                        range: relative(child.byte_range()),
                        quoted: false,
                    })
                }
                "quoted_attribute_value" => {
                    let mut inner_cursor = child.walk();
                    let inner = child
                        .named_children(&mut inner_cursor)
                        .find(|inner| inner.kind() == "attribute_value");
                    let range = match inner {
                        Some(inner) => inner.byte_range(),
                        None => child.start_byte() + 1..child.start_byte() + 1,
                    };
                    value = Some(AttributeValue {
                        range: relative(range),
                        quoted: true,
                    })
                }
                _ => {}
            }
        }

        let name = name?;
        Some(Attribute {
            name: self.source[name.byte_range()].to_ascii_lowercase(),
            name_range: relative(name.byte_range()),
            value,
        })
    }
}

/// Serialize `id` and everything below it
pub(super) fn write_node(nodes: &[Node], id: NodeId, output: &mut String) {
    match &nodes[id.0] {
        Node::Text(text) => output.push_str(text),
        Node::Element(element) => {
            output.push_str(&element.start_tag);
            for child in &element.children {
                write_node(nodes, *child, output);
            }
            output.push_str(&element.end_tag);
        }
    }
}

/// Visible text below `id`: markup stripped, comments dropped, references decoded
pub(super) fn write_text(nodes: &[Node], id: NodeId, output: &mut String) {
    match &nodes[id.0] {
        Node::Text(text) => output.push_str(&decode_entities(&strip_comments(text))),
        Node::Element(element) => {
            if matches!(element.name(), "script" | "style") {
                return;
            }
            for child in &element.children {
                write_text(nodes, *child, output);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(start_tag: &str, attributes: Vec<Attribute>) -> Element {
        Element {
            name: "a".into(),
            start_tag: start_tag.into(),
            attributes,
            children: vec![],
            end_tag: "</a>".into(),
        }
    }

    fn attribute(name: &str, name_range: Range<usize>, value: Option<(Range<usize>, bool)>) -> Attribute {
        Attribute {
            name: name.into(),
            name_range,
            value: value.map(|(range, quoted)| AttributeValue { range, quoted }),
        }
    }

    #[test]
    fn rewrites_quoted_value_in_place() {
        let mut element = anchor(
            r#"<a href="/old" class='nav'>"#,
            vec![
                attribute("href", 3..7, Some((9..13, true))),
                attribute("class", 15..20, Some((22..25, true))),
            ],
        );

        element.set_attribute("href", "/contact?a=1&b=2");

        assert_eq!(
            element.start_tag,
            r#"<a href="/contact?a=1&amp;b=2" class='nav'>"#
        );
        assert_eq!(element.attribute("href").as_deref(), Some("/contact?a=1&b=2"));
        assert_eq!(element.attribute("class").as_deref(), Some("nav"));
    }

    #[test]
    fn apostrophe_in_single_quoted_value_is_escaped() {
        let mut element = anchor(
            "<a href='/old' class='x'>",
            vec![
                attribute("href", 3..7, Some((9..13, true))),
                attribute("class", 15..20, Some((22..23, true))),
            ],
        );

        element.set_attribute("href", "/it's");

        assert_eq!(element.start_tag, "<a href='/it&#39;s' class='x'>");
        assert_eq!(element.attribute("href").as_deref(), Some("/it's"));
        assert_eq!(element.attribute("class").as_deref(), Some("x"));
    }

    #[test]
    fn quotes_previously_unquoted_value() {
        let mut element = anchor(
            "<a href=/old id=x>",
            vec![
                attribute("href", 3..7, Some((8..12, false))),
                attribute("id", 13..15, Some((16..17, false))),
            ],
        );

        element.set_attribute("href", "/new");

        assert_eq!(element.start_tag, r#"<a href="/new" id=x>"#);
        assert_eq!(element.attribute("href").as_deref(), Some("/new"));
        assert_eq!(element.attribute("id").as_deref(), Some("x"));
    }

    #[test]
    fn fills_in_valueless_and_missing_attributes() {
        let mut element = anchor("<a href>", vec![attribute("href", 3..7, None)]);
        assert_eq!(element.attribute("href").as_deref(), Some(""));

        element.set_attribute("href", "#top");
        assert_eq!(element.start_tag, r##"<a href="#top">"##);

        let mut bare = anchor("<a>", vec![]);
        bare.set_attribute("href", "/about");
        assert_eq!(bare.start_tag, r#"<a href="/about">"#);
        assert_eq!(bare.attribute("href").as_deref(), Some("/about"));

        bare.set_attribute("href", "/team");
        assert_eq!(bare.start_tag, r#"<a href="/team">"#);
    }
}

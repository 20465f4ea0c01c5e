pub mod markup;
mod tree;

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use ropey::Rope;
use tree_sitter::{Node as SyntaxNode, Parser, Tree};
use walkdir::WalkDir;

pub use tree::{Element, Node, NodeId};

use crate::error::EditorError;
use tree::TreeBuilder;

/// One parsed markup file.
///
/// Nodes live in an arena addressed by [`NodeId`]. Ids are never reused
/// while the document is loaded, so a node keeps its id when its content is
/// replaced.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

/// Read and parse `path`, relative to `root`
pub fn load(root: &Path, path: impl Into<PathBuf>) -> Result<Document, EditorError> {
    let path = path.into();
    let bytes = std::fs::read(root.join(&path)).map_err(|e| EditorError::Parse {
        path: path.clone(),
        message: e.to_string(),
    })?;
    let source = String::from_utf8(bytes).map_err(|e| EditorError::Parse {
        path: path.clone(),
        message: format!("not valid UTF-8: {e}"),
    })?;
    let document = Document::parse(path, &source)?;
    log::info!(
        "loaded {} ({} nodes)",
        document.path.display(),
        document.nodes.len()
    );
    Ok(document)
}

pub fn serialize(document: &Document) -> String {
    let mut output = String::new();
    for root in &document.roots {
        tree::write_node(&document.nodes, *root, &mut output);
    }
    output
}

/// Every file below `root` with the given extension, relative to `root`,
/// sorted. Version-control metadata is skipped.
pub fn list_documents(root: &Path, extension: &str) -> Result<Vec<PathBuf>, EditorError> {
    let mut documents = BTreeSet::new();
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || entry.file_name() != ".git");

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            EditorError::io(path, e.into())
        })?;

        if entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        {
            if let Ok(relative) = entry.path().strip_prefix(root) {
                documents.insert(relative.to_path_buf());
            }
        }
    }

    Ok(documents.into_iter().collect())
}

impl Document {
    /// Parse a whole page. Bare `&`, `<` and `>` in text and elements left
    /// open at the end of the file are accepted; any other syntax error
    /// rejects the page.
    pub fn parse(path: impl Into<PathBuf>, source: &str) -> Result<Self, EditorError> {
        let path = path.into();
        let input = markup::parser_input(source);
        let tree = parse_markup(&input, source).map_err(|message| EditorError::Parse {
            path: path.clone(),
            message,
        })?;

        let mut nodes = vec![];
        let roots =
            TreeBuilder::new(source, &mut nodes).build_range(tree.root_node(), 0..source.len());

        Ok(Self { path, nodes, roots })
    }

    /// Path relative to the working tree
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.nodes.get(id.0)? {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(id.0)? {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// Elements whose tag is accepted by `matches`, in document order
    pub fn find_elements(&self, matches: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        self.descendants()
            .filter(|id| self.element(*id).is_some_and(&matches))
            .collect()
    }

    /// Pre-order walk over every node reachable from the document roots
    pub fn descendants(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = self.roots.iter().rev().copied().collect::<Vec<_>>();
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            if let Node::Element(element) = &self.nodes[id.0] {
                stack.extend(element.children().iter().rev().copied());
            }
            Some(id)
        })
    }

    /// Whether `id` is still reachable from the document roots
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.descendants().any(|node| node == id)
    }

    /// Serialized children of `id`
    pub fn inner_markup(&self, id: NodeId) -> String {
        let mut output = String::new();
        if let Some(element) = self.element(id) {
            for child in element.children() {
                tree::write_node(&self.nodes, *child, &mut output);
            }
        }
        output
    }

    /// Visible text of `id` and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut output = String::new();
        tree::write_text(&self.nodes, id, &mut output);
        output
    }

    /// Parse a markup fragment into fresh nodes of this document without
    /// attaching them anywhere.
    pub(crate) fn parse_fragment(&mut self, fragment: &str) -> Result<Vec<NodeId>, EditorError> {
        let fragment = markup::escape_stray_ampersands(fragment);
        let tree = parse_markup(&fragment, &fragment).map_err(|message| EditorError::Parse {
            path: self.path.clone(),
            message: format!("replacement content is not valid markup\n{message}"),
        })?;
        Ok(TreeBuilder::new(&fragment, &mut self.nodes)
            .build_range(tree.root_node(), 0..fragment.len()))
    }

    pub(crate) fn push_text(&mut self, text: String) -> NodeId {
        self.nodes.push(Node::Text(text));
        NodeId(self.nodes.len() - 1)
    }
}

fn markup_parser() -> Result<Parser, String> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_html::LANGUAGE.into())
        .map_err(|e| e.to_string())?;
    Ok(parser)
}

/// Parse `input` and check it for syntax errors, quoting the offending lines
/// of `source`. Offsets into `input` must also be offsets into `source`.
fn parse_markup(input: &str, source: &str) -> Result<Tree, String> {
    let tree = markup_parser()?
        .parse(input, None)
        .ok_or_else(|| String::from("the parser produced no tree"))?;

    match syntax_errors(&tree, source) {
        Some(errors) => Err(errors),
        None => Ok(tree),
    }
}

/// Excerpt of the lines containing syntax errors, or `None` for a clean tree
fn syntax_errors(tree: &Tree, source: &str) -> Option<String> {
    if !tree.root_node().has_error() {
        return None;
    }

    let rope = Rope::from_str(source);
    let mut lines_with_errors = BTreeSet::new();
    collect_error_lines(tree.root_node(), &rope, &mut lines_with_errors);

    let context_lines = 2;
    let shown = lines_with_errors
        .iter()
        .copied()
        .flat_map(|line| line.saturating_sub(context_lines)..=line + context_lines)
        .collect::<BTreeSet<_>>();

    Some(
        std::iter::once(String::from("===SYNTAX ERRORS===\n"))
            .chain(
                source
                    .lines()
                    .enumerate()
                    .filter(|(index, _)| shown.contains(index))
                    .map(|(index, line)| {
                        let display_index = index + 1;
                        if lines_with_errors.contains(&index) {
                            format!("{display_index:>4} ->⎸{line}\n")
                        } else {
                            format!("{display_index:>4}   ⎸{line}\n")
                        }
                    }),
            )
            .collect(),
    )
}

fn collect_error_lines(node: SyntaxNode<'_>, rope: &Rope, lines: &mut BTreeSet<usize>) {
    if node.is_error() || node.is_missing() {
        lines.insert(rope.byte_to_line(node.start_byte().min(rope.len_bytes())));
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_lines(child, rope, lines);
    }
}

#[cfg(test)]
mod tests;

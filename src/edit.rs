//! In-place mutations of a loaded document.
//!
//! Edits address text regions through a [`NodeIndex`] handle and links by
//! their position in [`list_links`]. Neither operation rebuilds the index: a
//! handle keeps pointing at the same element even when its new content
//! collides with another element's text.

use crate::document::{markup::escape_text, Document};
use crate::error::EditorError;
use crate::index::{list_links, Link, NodeIndex};

/// Replace the inner content of the element behind `handle` with a markup
/// fragment. A fragment that fails to parse leaves the document untouched.
pub fn set_text(
    document: &mut Document,
    index: &NodeIndex,
    handle: usize,
    new_inner_markup: &str,
) -> Result<(), EditorError> {
    let node = index
        .get(handle)
        .ok_or(EditorError::InvalidHandle(handle))?
        .node;

    let children = document.parse_fragment(new_inner_markup)?;
    let element = document
        .element_mut(node)
        .ok_or(EditorError::InvalidHandle(handle))?;
    element.replace_children(children);

    if !document.is_attached(node) {
        log::warn!(
            "handle {handle} in {} belongs to content that an earlier edit replaced; \
             the change will not appear in the page",
            document.path().display()
        );
    }
    log::info!(
        "set text of handle {handle} in {}",
        document.path().display()
    );
    Ok(())
}

/// Replace the visible label and the `href` of the link at `position`. The
/// label is plain text and is escaped on the way in.
pub fn set_link(
    document: &mut Document,
    position: usize,
    new_label: &str,
    new_target: &str,
) -> Result<Link, EditorError> {
    let links = list_links(document);
    let count = links.len();
    let link = links
        .into_iter()
        .nth(position)
        .ok_or(EditorError::InvalidLinkPosition { position, count })?;

    let label = document.push_text(escape_text(new_label));
    let element = document
        .element_mut(link.node)
        .ok_or(EditorError::InvalidLinkPosition { position, count })?;
    element.replace_children(vec![label]);
    element.set_attribute("href", new_target);

    log::info!(
        "set link {position} in {} to {new_label:?} ({new_target})",
        document.path().display()
    );

    Ok(Link {
        label: new_label.to_string(),
        target: new_target.to_string(),
        ..link
    })
}

#[cfg(test)]
mod tests;

mod add_asset;
mod list_assets;
mod list_documents;
mod list_links;
mod list_text_nodes;
mod open_document;
mod preview_asset;
mod preview_changes;
mod publish;
mod remove_asset;
mod set_link;
mod set_text;

pub use add_asset::AddAsset;
pub use list_assets::ListAssets;
pub use list_documents::ListDocuments;
pub use list_links::ListLinks;
pub use list_text_nodes::ListTextNodes;
pub use open_document::OpenDocument;
pub use preview_asset::PreviewAsset;
pub use preview_changes::PreviewChanges;
pub use publish::Publish;
pub use remove_asset::RemoveAsset;
pub use set_link::SetLink;
pub use set_text::SetText;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::index::Link;
use crate::session::{summarize, Session, TextNodeSummary};
use crate::traits::{AsToolSchema, Tool};
use crate::types::{ContentResponse, ToolSchema};

/// Every tool this server offers, as received in a `tools/call` request
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
pub enum Tools {
    ListDocuments(ListDocuments),
    OpenDocument(OpenDocument),
    ListTextNodes(ListTextNodes),
    ListLinks(ListLinks),
    SetText(SetText),
    SetLink(SetLink),
    PreviewChanges(PreviewChanges),
    Publish(Publish),
    ListAssets(ListAssets),
    AddAsset(AddAsset),
    RemoveAsset(RemoveAsset),
    PreviewAsset(PreviewAsset),
}

impl Tools {
    pub fn schema() -> Vec<ToolSchema> {
        vec![
            ListDocuments::as_tool_schema(),
            OpenDocument::as_tool_schema(),
            ListTextNodes::as_tool_schema(),
            ListLinks::as_tool_schema(),
            SetText::as_tool_schema(),
            SetLink::as_tool_schema(),
            PreviewChanges::as_tool_schema(),
            Publish::as_tool_schema(),
            ListAssets::as_tool_schema(),
            AddAsset::as_tool_schema(),
            RemoveAsset::as_tool_schema(),
            PreviewAsset::as_tool_schema(),
        ]
    }

    pub fn execute(self, session: &mut Session) -> Result<ContentResponse> {
        log::debug!("{self:?}");
        match self {
            Tools::ListDocuments(tool) => tool.execute(session),
            Tools::OpenDocument(tool) => tool.execute(session),
            Tools::ListTextNodes(tool) => tool.execute(session),
            Tools::ListLinks(tool) => tool.execute(session),
            Tools::SetText(tool) => tool.execute(session),
            Tools::SetLink(tool) => tool.execute(session),
            Tools::PreviewChanges(tool) => tool.execute(session),
            Tools::Publish(tool) => tool.execute(session),
            Tools::ListAssets(tool) => tool.execute(session),
            Tools::AddAsset(tool) => tool.execute(session),
            Tools::RemoveAsset(tool) => tool.execute(session),
            Tools::PreviewAsset(tool) => tool.execute(session),
        }
    }
}

pub(crate) fn format_text_nodes(text_nodes: &[TextNodeSummary]) -> String {
    if text_nodes.is_empty() {
        return "No editable text nodes.".to_string();
    }
    text_nodes
        .iter()
        .map(|TextNodeSummary { handle, text }| format!("{handle}: {text}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn format_links(links: &[Link]) -> String {
    if links.is_empty() {
        return "No links.".to_string();
    }
    links
        .iter()
        .map(|link| {
            format!(
                "{}: {} ({})",
                link.position,
                summarize(&link.label),
                link.target
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

use crate::session::Session;
use crate::tools::Tools;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{borrow::Cow, collections::HashMap};

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum McpMessage {
    #[serde(deserialize_with = "deserialize_request")]
    Request(McpRequest),
    Notification(McpNotification),
}

fn deserialize_request<'de, D>(deserializer: D) -> Result<McpRequest, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Value = Deserialize::deserialize(deserializer)?;
    if value.get("id").is_some() {
        serde_json::from_value(value).map_err(serde::de::Error::custom)
    } else {
        Err(serde::de::Error::custom("Not a request"))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpRequest {
    pub jsonrpc: String,
    pub id: Value,
    pub method: String,
    pub params: Option<Value>,
}

impl McpRequest {
    pub fn execute(self, session: &mut Session, instructions: Option<&'static str>) -> McpResponse {
        let Self {
            id, method, params, ..
        } = self;
        match method.as_str() {
            "initialize" => McpResponse::success(
                id,
                InitializeResponse::default().with_instructions(instructions),
            ),
            "tools/list" => McpResponse::success(
                id,
                ToolsListResponse {
                    tools: Tools::schema(),
                },
            ),
            "tools/call" => match serde_json::from_value::<Tools>(tool_call(params)) {
                Ok(tool) => match tool.execute(session) {
                    Ok(content) => McpResponse::success(id, content),
                    Err(e) => McpResponse::error(id, -32601, e.to_string()),
                },
                Err(e) => McpResponse::error(id, -32601, e.to_string()),
            },
            _ => McpResponse::error(id, -32601, format!("Unknown method: {method}")),
        }
    }
}

/// Tools without parameters may be called without an `arguments` member
fn tool_call(params: Option<Value>) -> Value {
    let mut params = params.unwrap_or(Value::Null);
    if let Some(object) = params.as_object_mut() {
        object
            .entry("arguments")
            .or_insert_with(|| Value::Object(Default::default()));
    }
    params
}

#[derive(Debug, Serialize, Deserialize, fieldwork::Fieldwork)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResponse {
    protocol_version: &'static str,
    capabilities: Capabilities,
    server_info: Info,
    #[fieldwork(with)]
    instructions: Option<&'static str>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct Example<T> {
    pub description: &'static str,
    #[serde(flatten)]
    pub item: T,
}

impl Default for InitializeResponse {
    fn default() -> Self {
        Self {
            protocol_version: "2024-11-05",
            capabilities: Capabilities::default(),
            server_info: Info {
                name: env!("CARGO_PKG_NAME").into(),
                version: env!("CARGO_PKG_VERSION").into(),
            },
            instructions: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Info {
    pub name: Cow<'static, str>,
    pub version: Cow<'static, str>,
}

#[derive(Default, Debug, Serialize, Deserialize)]
pub struct Capabilities {
    pub tools: HashMap<(), ()>,
}

#[derive(Default, Debug, Serialize)]
pub struct ToolsListResponse {
    pub tools: Vec<ToolSchema>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSchema {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct McpNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentResponse {
    content: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text {
        text: String,
    },
    Image {
        /// Base64 encoded image bytes
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

impl ContentResponse {
    pub fn text(text: String) -> Self {
        Self {
            content: vec![Content::Text { text }],
        }
    }

    pub fn with_image(mut self, data: String, mime_type: impl Into<String>) -> Self {
        self.content.push(Content::Image {
            data,
            mime_type: mime_type.into(),
        });
        self
    }

    /// Text parts joined by newlines
    pub fn text_parts(&self) -> String {
        self.content
            .iter()
            .filter_map(|content| match content {
                Content::Text { text } => Some(text.as_str()),
                Content::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<String> for ContentResponse {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl McpResponse {
    pub fn success(id: Value, result: impl Serialize) -> Self {
        match serde_json::to_value(result) {
            Ok(result) => Self {
                jsonrpc: "2.0",
                id,
                result: Some(result),
                error: None,
            },
            Err(e) => Self::error(id, -32603, e.to_string()),
        }
    }

    pub fn error(id: Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(McpError {
                code,
                message,
                data: None,
            }),
        }
    }
}

//! Tool-call envelope: the orchestrator's fixed request/response shape.
//!
//! ```text
//! Request:  { actionGroup, function, parameters: [{name, type?, value}],
//!             sessionAttributes, promptSessionAttributes }
//! Response: { messageVersion: "1.0",
//!             response: { actionGroup, function,
//!               functionResponse: { responseBody: { TEXT: { body } } } },
//!             sessionAttributes, promptSessionAttributes }
//! ```
//!
//! Session state is carried through untouched. Fields of the request not
//! listed above are accepted and ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod dispatch;

pub use dispatch::ToolDispatcher;

/// Response envelope version.
pub const MESSAGE_VERSION: &str = "1.0";

/// One named parameter of a tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,

    pub value: Value,
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            param_type: None,
            value: value.into(),
        }
    }
}

/// Inbound tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRequest {
    pub action_group: String,
    pub function: String,

    #[serde(default)]
    pub parameters: Vec<ToolParameter>,

    #[serde(default)]
    pub session_attributes: Map<String, Value>,

    #[serde(default)]
    pub prompt_session_attributes: Map<String, Value>,
}

impl ToolRequest {
    pub fn new(action_group: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            action_group: action_group.into(),
            function: function.into(),
            parameters: Vec::new(),
            session_attributes: Map::new(),
            prompt_session_attributes: Map::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.push(ToolParameter::new(name, value));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBody {
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    #[serde(rename = "TEXT")]
    pub text: TextBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub response_body: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub action_group: String,
    pub function: String,
    pub function_response: FunctionResponse,
}

/// Outbound tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    pub message_version: String,
    pub response: ActionResponse,
    pub session_attributes: Map<String, Value>,
    pub prompt_session_attributes: Map<String, Value>,
}

impl ToolResponse {
    /// Wrap a text result, echoing the request's routing and session state.
    pub fn text(request: ToolRequest, body: impl Into<String>) -> Self {
        Self {
            message_version: MESSAGE_VERSION.to_string(),
            response: ActionResponse {
                action_group: request.action_group,
                function: request.function,
                function_response: FunctionResponse {
                    response_body: ResponseBody {
                        text: TextBody { body: body.into() },
                    },
                },
            },
            session_attributes: request.session_attributes,
            prompt_session_attributes: request.prompt_session_attributes,
        }
    }

    /// The text body.
    pub fn body(&self) -> &str {
        &self.response.function_response.response_body.text.body
    }
}

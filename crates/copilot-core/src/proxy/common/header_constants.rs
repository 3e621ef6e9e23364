//! Header names and fixed values the upstream API expects on every call.

pub const VSCODE_SESSION_ID: &str = "Vscode-Sessionid";
pub const VSCODE_MACHINE_ID: &str = "Vscode-Machineid";
pub const EDITOR_VERSION: &str = "Editor-Version";
pub const EDITOR_PLUGIN_VERSION: &str = "Editor-Plugin-Version";
pub const OPENAI_ORGANIZATION: &str = "Openai-Organization";
pub const OPENAI_INTENT: &str = "Openai-Intent";
pub const X_REQUEST_ID: &str = "X-Request-Id";

pub const EDITOR_VERSION_VALUE: &str = "vscode/1.83.1";
pub const EDITOR_PLUGIN_VERSION_VALUE: &str = "copilot-chat/0.8.0";
pub const OPENAI_ORGANIZATION_VALUE: &str = "github-copilot";
pub const OPENAI_INTENT_VALUE: &str = "conversation-panel";
pub const USER_AGENT_VALUE: &str = "GitHubCopilotChat/0.8.0";

pub const CONTENT_TYPE_EVENT_STREAM: &str = "text/event-stream; charset=utf-8";
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// Content type for a reply (and request) that is or is not streamed.
pub fn content_type_for(is_streaming: bool) -> &'static str {
    if is_streaming {
        CONTENT_TYPE_EVENT_STREAM
    } else {
        CONTENT_TYPE_JSON
    }
}

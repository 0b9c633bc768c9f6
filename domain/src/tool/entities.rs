//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Built-in tool variants.
///
/// New tools are added as variants here; the executor matches on the variant,
/// and the advertised schema is derived from [`ToolKind::definition`], so
/// execution and advertisement cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// External web search
    Search,
    /// Fetch a web page as text
    Read,
    /// Sandboxed numeric computation
    Calculate,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Search, ToolKind::Read, ToolKind::Calculate];

    /// Canonical tool name advertised to the model
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Search => "search_via_perplexity",
            ToolKind::Read => "read_web_page",
            ToolKind::Calculate => "python_calculator",
        }
    }

    /// Short label used in the tool trace (`search`, `read`, `calc`)
    pub fn trace_label(&self) -> &'static str {
        match self {
            ToolKind::Search => "search",
            ToolKind::Read => "read",
            ToolKind::Calculate => "calc",
        }
    }

    /// Name of the single required argument
    pub fn input_key(&self) -> &'static str {
        match self {
            ToolKind::Search => "query",
            ToolKind::Read => "url",
            ToolKind::Calculate => "code",
        }
    }

    pub fn from_name(name: &str) -> Option<ToolKind> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Static definition (name, description, argument schema)
    pub fn definition(&self) -> ToolDefinition {
        match self {
            ToolKind::Search => ToolDefinition::new(
                *self,
                "Use when up-to-date external information is needed: market data, \
                 competitors, trends or recent news.",
            )
            .with_parameter(ToolParameter::new("query", "Search keywords", true)),
            ToolKind::Read => ToolDefinition::new(
                *self,
                "Use when the contents of a specific URL must be read and analysed \
                 (e.g. a competitor landing page or a news article).",
            )
            .with_parameter(ToolParameter::new("url", "URL of the web page to read", true)),
            ToolKind::Calculate => ToolDefinition::new(
                *self,
                "Use for non-trivial numeric calculations (LTV, CAC, market size \
                 estimates). Generates and runs Python code.",
            )
            .with_parameter(ToolParameter::new(
                "code",
                "Python code to run. The result must be written with `print()`.",
                true,
            )),
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Definition of a tool that can be offered to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "read_web_page")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Which built-in implementation backs this tool
    pub kind: ToolKind,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint (e.g., "string", "number")
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(kind: ToolKind, description: impl Into<String>) -> Self {
        Self {
            name: kind.name().to_string(),
            description: description.into(),
            kind,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// Specification of the tools available in a session
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: HashMap<String, ToolDefinition>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// All built-in tools
    pub fn builtin() -> Self {
        ToolKind::ALL
            .into_iter()
            .fold(Self::new(), |spec, kind| spec.register(kind.definition()))
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A tool call requested by the chat completion service.
///
/// The `id` is assigned by the provider and is echoed back on the
/// corresponding `tool` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call id (e.g. "call_abc123")
    pub id: String,
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments passed to the tool
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string argument or return an error message
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// The raw arguments as a JSON object string (wire form)
    pub fn arguments_json(&self) -> String {
        serde_json::to_string(&self.arguments).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_kind_names_round_trip() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("delete_everything"), None);
    }

    #[test]
    fn test_advertised_names_are_stable() {
        assert_eq!(ToolKind::Search.name(), "search_via_perplexity");
        assert_eq!(ToolKind::Read.name(), "read_web_page");
        assert_eq!(ToolKind::Calculate.name(), "python_calculator");
    }

    #[test]
    fn test_definition_declares_input_key() {
        for kind in ToolKind::ALL {
            let def = kind.definition();
            assert_eq!(def.name, kind.name());
            assert_eq!(def.kind, kind);
            assert_eq!(def.parameters.len(), 1);
            assert_eq!(def.parameters[0].name, kind.input_key());
            assert!(def.parameters[0].required);
        }
    }

    #[test]
    fn test_builtin_spec() {
        let spec = ToolSpec::builtin();
        assert_eq!(spec.len(), 3);
        assert!(spec.get("search_via_perplexity").is_some());
        assert!(spec.get("read_web_page").is_some());
        assert!(spec.get("python_calculator").is_some());
        assert!(spec.get("unknown").is_none());
    }

    #[test]
    fn test_tool_call() {
        let call = ToolCall::new("call_1", "read_web_page").with_arg("url", "https://example.com");

        assert_eq!(call.id, "call_1");
        assert_eq!(call.get_string("url"), Some("https://example.com"));
        assert_eq!(call.require_string("url").unwrap(), "https://example.com");
        assert!(call.require_string("missing").is_err());
        assert_eq!(call.arguments_json(), r#"{"url":"https://example.com"}"#);
    }
}

//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] that produces the
//! `{name, description, parameters}` triples advertised to the chat model.
//! The provider adapter decides how to wrap them on the wire.

use dojo_application::ports::tool_schema::ToolSchemaPort;
use dojo_domain::tool::entities::{ToolDefinition, ToolSpec};
use serde_json::{Map, Value, json};

/// Maps `param_type` hints onto JSON Schema types:
/// `"number"`, `"integer"` and `"boolean"` pass through; anything else is `"string"`.
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type = match param.param_type.as_str() {
                "number" => "number",
                "integer" => "integer",
                "boolean" => "boolean",
                _ => "string",
            };
            properties.insert(
                param.name.clone(),
                json!({ "type": schema_type, "description": param.description }),
            );
            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "name": tool.name,
            "description": tool.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }

    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<Value> {
        let mut tools: Vec<&ToolDefinition> = spec.all().collect();
        tools.sort_by_key(|t| &t.name);
        tools.into_iter().map(|t| self.tool_to_schema(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dojo_domain::tool::entities::ToolKind;

    #[test]
    fn test_calculator_schema() {
        let schema = JsonSchemaToolConverter.tool_to_schema(&ToolKind::Calculate.definition());

        assert_eq!(schema["name"], "python_calculator");
        assert_eq!(schema["parameters"]["type"], "object");
        assert_eq!(schema["parameters"]["properties"]["code"]["type"], "string");
        assert_eq!(schema["parameters"]["required"], json!(["code"]));
    }

    #[test]
    fn test_builtin_schema_matches_tool_kinds() {
        let tools = JsonSchemaToolConverter.all_tools_schema(&ToolSpec::builtin());

        let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
        assert_eq!(
            names,
            vec!["python_calculator", "read_web_page", "search_via_perplexity"]
        );
        for (tool, kind) in [
            (&tools[0], ToolKind::Calculate),
            (&tools[1], ToolKind::Read),
            (&tools[2], ToolKind::Search),
        ] {
            assert_eq!(tool["parameters"]["required"][0], kind.input_key());
        }
    }
}

//! Tool domain traits
//!
//! Contains pure domain logic traits for tool validation.
//! The async ToolExecutorPort is defined in the application layer (ports).

use super::entities::{ToolCall, ToolDefinition};

/// Validator for tool calls
///
/// This is a pure domain trait that validates tool calls
/// against their definitions without any I/O operations.
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Default implementation of ToolValidator
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for param in &definition.parameters {
            if !param.required {
                continue;
            }
            match call.arguments.get(&param.name) {
                None => {
                    return Err(format!(
                        "Missing required parameter '{}' for tool '{}'",
                        param.name, definition.name
                    ));
                }
                Some(value) if param.param_type == "string" && !value.is_string() => {
                    return Err(format!(
                        "Parameter '{}' for tool '{}' must be a string",
                        param.name, definition.name
                    ));
                }
                Some(_) => {}
            }
        }

        // Extra arguments are tolerated: providers sometimes add their own
        // bookkeeping keys and the tool only reads what it declares.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolKind;

    #[test]
    fn test_validator_missing_required() {
        let validator = DefaultToolValidator;
        let definition = ToolKind::Search.definition();

        let call = ToolCall::new("call_1", "search_via_perplexity");
        let result = validator.validate(&call, &definition);
        assert!(result.unwrap_err().contains("Missing required parameter 'query'"));
    }

    #[test]
    fn test_validator_wrong_type() {
        let validator = DefaultToolValidator;
        let definition = ToolKind::Read.definition();

        let call = ToolCall::new("call_1", "read_web_page").with_arg("url", 42);
        let result = validator.validate(&call, &definition);
        assert!(result.unwrap_err().contains("must be a string"));
    }

    #[test]
    fn test_validator_valid_call_with_extra_args() {
        let validator = DefaultToolValidator;
        let definition = ToolKind::Calculate.definition();

        let call = ToolCall::new("call_1", "python_calculator")
            .with_arg("code", "print(1 + 1)")
            .with_arg("note", "ignored");

        assert!(validator.validate(&call, &definition).is_ok());
    }
}

//! Builtin tool executor: the concrete implementation of [`ToolExecutorPort`].
//!
//! [`BuiltinToolExecutor`] owns one adapter per [`ToolKind`] and dispatches on
//! the variant, never on free-form strings. The advertised [`ToolSpec`] is
//! built from the same variants, so advertisement and execution stay in sync.
//!
//! ```text
//! ToolExecutorPort::execute(call)
//!   ├─ ToolKind::Search    → PerplexitySearch
//!   ├─ ToolKind::Read      → WebPageReader
//!   ├─ ToolKind::Calculate → PythonCalculator
//!   └─ unknown name        → ToolError NOT_FOUND
//! ```

use super::{PerplexitySearch, PythonCalculator, WebPageReader};
use async_trait::async_trait;
use dojo_application::ports::tool_executor::ToolExecutorPort;
use dojo_domain::tool::{
    entities::{ToolCall, ToolKind, ToolSpec},
    value_objects::{ToolError, ToolResult},
};
use tracing::debug;

pub struct BuiltinToolExecutor {
    tool_spec: ToolSpec,
    search: PerplexitySearch,
    reader: WebPageReader,
    calculator: PythonCalculator,
}

impl BuiltinToolExecutor {
    pub fn new(search: PerplexitySearch, reader: WebPageReader, calculator: PythonCalculator) -> Self {
        Self {
            tool_spec: ToolSpec::builtin(),
            search,
            reader,
            calculator,
        }
    }
}

#[async_trait]
impl ToolExecutorPort for BuiltinToolExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let Some(kind) = ToolKind::from_name(&call.tool_name) else {
            return ToolResult::failure(&call.tool_name, ToolError::unknown_tool(&call.tool_name));
        };

        debug!(tool = %kind, id = %call.id, "Dispatching builtin tool");

        match kind {
            ToolKind::Search => self.search.execute(call).await,
            ToolKind::Read => self.reader.execute(call).await,
            ToolKind::Calculate => self.calculator.execute(call).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn executor() -> BuiltinToolExecutor {
        BuiltinToolExecutor::new(
            PerplexitySearch::new("https://api.perplexity.ai", "sonar-pro", None, Duration::from_secs(1))
                .unwrap(),
            WebPageReader::new(Duration::from_secs(1)).unwrap(),
            PythonCalculator::new("python3"),
        )
    }

    #[test]
    fn test_spec_lists_builtin_tools() {
        let exec = executor();
        let mut names = exec.available_tools();
        names.sort();
        assert_eq!(
            names,
            vec!["python_calculator", "read_web_page", "search_via_perplexity"]
        );
        assert!(exec.has_tool("read_web_page"));
        assert!(!exec.has_tool("run_command"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_found() {
        let result = executor().execute(&ToolCall::new("c1", "teleport")).await;

        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
        assert!(result.to_message_content().contains("teleport"));
    }

    #[tokio::test]
    async fn test_dispatches_by_kind() {
        let call = ToolCall::new("c1", "search_via_perplexity").with_arg("query", "TAM estimate");
        let result = executor().execute(&call).await;

        assert_eq!(result.tool_name, "search_via_perplexity");
        assert!(result.to_message_content().contains("not found"));
    }
}

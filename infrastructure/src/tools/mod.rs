//! Builtin tools for the chat turn.
//!
//! | Tool | Adapter | Backend |
//! |------|---------|---------|
//! | `search_via_perplexity` | [`PerplexitySearch`] | Perplexity chat API |
//! | `read_web_page` | [`WebPageReader`] | `r.jina.ai` reader or direct fetch |
//! | `python_calculator` | [`PythonCalculator`] | `python3 -I` child process |

pub mod calculator;
pub mod executor;
pub mod fetch;
pub mod schema;
pub mod search;

pub use calculator::PythonCalculator;
pub use executor::BuiltinToolExecutor;
pub use fetch::WebPageReader;
pub use schema::JsonSchemaToolConverter;
pub use search::PerplexitySearch;

//! Chat completion providers.
//!
//! Only OpenAI-compatible `/chat/completions` endpoints are supported. The
//! default configuration targets Cerebras; any server speaking the same wire
//! format (vLLM, llama.cpp server, OpenAI itself) works by changing
//! `chat.base_url`.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatClient;

/// Map a transport failure onto the provider error taxonomy
pub(crate) fn classify_reqwest_error(
    e: &reqwest::Error,
) -> dojo_application::ports::chat_completion::ProviderError {
    use dojo_application::ports::chat_completion::ProviderError;

    if e.is_timeout() {
        ProviderError::Timeout
    } else if e.is_connect() {
        ProviderError::Connection(e.to_string())
    } else {
        ProviderError::RequestFailed(e.to_string())
    }
}

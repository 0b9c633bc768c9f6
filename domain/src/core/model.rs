//! Model value object representing a chat completion model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Chat completion models known to the hosted inference provider (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModelId {
    Llama33_70b,
    GptOss120b,
    Qwen3_32b,
    Qwen3_235bInstruct,
    ZaiGlm46,
    // Custom
    Custom(String),
}

impl ModelId {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            ModelId::Llama33_70b => "llama-3.3-70b",
            ModelId::GptOss120b => "gpt-oss-120b",
            ModelId::Qwen3_32b => "qwen-3-32b",
            ModelId::Qwen3_235bInstruct => "qwen-3-235b-a22b-instruct-2507",
            ModelId::ZaiGlm46 => "zai-glm-4.6",
            ModelId::Custom(s) => s,
        }
    }

    /// Models offered as choices, in display order
    pub fn choices() -> Vec<ModelId> {
        vec![
            ModelId::Llama33_70b,
            ModelId::GptOss120b,
            ModelId::Qwen3_32b,
            ModelId::Qwen3_235bInstruct,
            ModelId::ZaiGlm46,
        ]
    }
}

impl Default for ModelId {
    /// Returns the first model choice (llama-3.3-70b)
    fn default() -> Self {
        ModelId::Llama33_70b
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "llama-3.3-70b" => ModelId::Llama33_70b,
            "gpt-oss-120b" => ModelId::GptOss120b,
            "qwen-3-32b" => ModelId::Qwen3_32b,
            "qwen-3-235b-a22b-instruct-2507" => ModelId::Qwen3_235bInstruct,
            "zai-glm-4.6" => ModelId::ZaiGlm46,
            other => ModelId::Custom(other.to_string()),
        })
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}

impl Serialize for ModelId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ModelId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(ModelId::from(s.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choices_parse_back() {
        for model in ModelId::choices() {
            let parsed = ModelId::from(model.as_str());
            assert_eq!(model, parsed);
        }
    }

    #[test]
    fn test_custom_model() {
        let model = ModelId::from("my-finetune-v2");
        assert_eq!(model, ModelId::Custom("my-finetune-v2".to_string()));
        assert_eq!(model.to_string(), "my-finetune-v2");
    }

    #[test]
    fn test_model_default() {
        assert_eq!(ModelId::default().as_str(), "llama-3.3-70b");
    }

    #[test]
    fn test_serde_as_plain_string() {
        let json = serde_json::to_string(&ModelId::ZaiGlm46).unwrap();
        assert_eq!(json, "\"zai-glm-4.6\"");
        let back: ModelId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ModelId::ZaiGlm46);
    }
}

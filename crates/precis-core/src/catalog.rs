use serde::Serialize;

use crate::models::Provider;

/// A model offered to users, with display metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub provider: Provider,
    pub description: &'static str,
}

const MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "claude-3-5-sonnet-20240620",
        name: "Claude 3.5 Sonnet",
        provider: Provider::Anthropic,
        description: "Default Anthropic model, strong at reading long pages",
    },
    ModelInfo {
        id: "claude-3-sonnet-20240229",
        name: "Claude 3 Sonnet",
        provider: Provider::Anthropic,
        description: "Balanced model for various tasks from Anthropic",
    },
    ModelInfo {
        id: "claude-3-opus-20240229",
        name: "Claude 3 Opus",
        provider: Provider::Anthropic,
        description: "Most powerful Claude model for complex tasks",
    },
    ModelInfo {
        id: "claude-3-haiku-20240307",
        name: "Claude 3 Haiku",
        provider: Provider::Anthropic,
        description: "Fast, efficient model for simpler tasks",
    },
    ModelInfo {
        id: "gpt-4o",
        name: "GPT-4o",
        provider: Provider::OpenAi,
        description: "OpenAI's most capable model for complex tasks",
    },
    ModelInfo {
        id: "gpt-3.5-turbo",
        name: "GPT-3.5 Turbo",
        provider: Provider::OpenAi,
        description: "Efficient OpenAI model for general tasks",
    },
];

/// Every known model, grouped by provider.
pub fn catalog() -> &'static [ModelInfo] {
    MODELS
}

pub fn find(id: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|m| m.id == id)
}

pub fn models_for(provider: Provider) -> impl Iterator<Item = &'static ModelInfo> {
    MODELS.iter().filter(move |m| m.provider == provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_listed_under_their_provider() {
        for provider in Provider::ALL {
            let info = find(provider.default_model()).expect("default model in catalog");
            assert_eq!(info.provider, provider);
        }
    }

    #[test]
    fn test_models_for_provider() {
        assert_eq!(models_for(Provider::Anthropic).count(), 4);
        assert!(models_for(Provider::OpenAi).all(|m| m.id.starts_with("gpt")));
        assert!(find("llama-3").is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<_> = catalog().iter().map(|m| m.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog().len());
    }
}

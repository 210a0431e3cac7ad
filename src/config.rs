use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::state::StoryParameters;

pub const CONFIG_FILE: &str = "config.yml";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub unattended: bool,

    #[serde(default)]
    pub mode: GenerationMode,

    pub llm: LlmConfig,

    /// Preselected story options; used as-is when unattended.
    #[serde(default)]
    pub story: StoryParameters,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Plan, write, review and enhance.
    #[default]
    Agents,
    /// One writer call, no plan or review.
    SinglePass,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LlmConfig {
    pub provider: String, // "gemini", "ollama" or "openai"
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    pub gemini: Option<GeminiConfig>,
    pub ollama: Option<OllamaConfig>,
    pub openai: Option<OpenAIConfig>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            request_timeout_seconds: default_request_timeout(),
            gemini: None,
            ollama: None,
            openai: Some(OpenAIConfig {
                api_key: String::new(),
                model: default_openai_model(),
                base_url: None,
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenAIConfig {
    /// Empty means read OPENAI_API_KEY.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,
    pub model: String,
}

fn default_request_timeout() -> u64 {
    120
}
fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            anyhow::bail!("{} not found. Please create one.", CONFIG_FILE);
        }
        Self::load_from(path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(Path::new(CONFIG_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Culture, Language, Moral, Setting};

    #[test]
    fn test_minimal_config_uses_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.yml");
        fs::write(&path, "llm:\n  provider: ollama\n  ollama:\n    model: llama3\n")?;

        let config = Config::load_from(&path)?;
        assert!(!config.unattended);
        assert_eq!(config.mode, GenerationMode::Agents);
        assert_eq!(config.llm.request_timeout_seconds, 120);
        let ollama = config.llm.ollama.as_ref().unwrap();
        assert_eq!(ollama.base_url, "http://localhost:11434");
        assert_eq!(config.story, StoryParameters::default());
        Ok(())
    }

    #[test]
    fn test_story_section_parses_display_labels() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.yml");
        fs::write(
            &path,
            "unattended: true\n\
             mode: single_pass\n\
             llm:\n  provider: openai\n  openai:\n    api_key: sk-test\n\
             story:\n  language: Hinglish\n  setting: Both People & Animals\n  moral: Hard Work\n  culture: Indian\n",
        )?;

        let config = Config::load_from(&path)?;
        assert!(config.unattended);
        assert_eq!(config.mode, GenerationMode::SinglePass);
        assert_eq!(config.story.language, Language::Hinglish);
        assert_eq!(config.story.setting, Setting::PeopleAndAnimals);
        assert_eq!(config.story.moral, Moral::HardWork);
        assert_eq!(config.story.culture, Culture::Indian);
        assert_eq!(config.llm.openai.as_ref().unwrap().model, "gpt-4o-mini");
        Ok(())
    }

    #[test]
    fn test_unknown_moral_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.yml");
        fs::write(
            &path,
            "llm:\n  provider: openai\n\
             story:\n  language: English\n  setting: People\n  moral: Greed\n  culture: British\n",
        )?;

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse"));
        Ok(())
    }

    #[test]
    fn test_save_then_load_keeps_selection() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.yml");

        let mut config = Config::default();
        config.story.moral = Moral::Gratitude;
        config.save_to(&path)?;

        let loaded = Config::load_from(&path)?;
        assert_eq!(loaded.story.moral, Moral::Gratitude);
        assert_eq!(loaded.llm.provider, "openai");
        Ok(())
    }
}

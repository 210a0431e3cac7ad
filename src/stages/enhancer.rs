use crate::llm::LlmClient;
use crate::prompts::{enhancer_prompt, ENHANCER_SYSTEM, ENHANCER_TEMPERATURE};
use crate::state::StoryParameters;
use log::{info, warn};

/// Polishes the approved draft. On any service error the draft itself is
/// returned unchanged.
pub async fn enhance_story(params: &StoryParameters, draft: &str, llm: &dyn LlmClient) -> String {
    info!("Enhancing approved draft");

    match llm
        .chat(ENHANCER_SYSTEM, &enhancer_prompt(params, draft), ENHANCER_TEMPERATURE)
        .await
    {
        Ok(story) => story,
        Err(e) => {
            warn!("Enhancement failed, keeping the approved draft: {:#}", e);
            draft.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockLlmClient;

    #[tokio::test]
    async fn test_enhance_story_returns_polished_text() {
        let llm = MockLlmClient::new(|_, _| Ok("Polished story".to_string()));
        let story = enhance_story(&StoryParameters::default(), "Rough draft", &llm).await;
        assert_eq!(story, "Polished story");
        assert_eq!(llm.calls.lock().unwrap()[0].temperature, ENHANCER_TEMPERATURE);
    }

    #[tokio::test]
    async fn test_enhance_story_falls_back_to_exact_draft() {
        let draft = "  Once upon a time, a kitten purred.\n\nThe end.  ";
        let llm = MockLlmClient::new(|_, _| Err(anyhow::anyhow!("503 Service Unavailable")));
        let story = enhance_story(&StoryParameters::default(), draft, &llm).await;
        assert_eq!(story, draft);
    }
}

use crate::error::StageError;
use crate::llm::LlmClient;
use crate::prompts::{planner_prompt, PLANNER_SYSTEM, PLANNER_TEMPERATURE};
use crate::response::parse_structured;
use crate::state::{StoryParameters, StoryPlan};
use log::{debug, info};

pub async fn plan_story(
    params: &StoryParameters,
    llm: &dyn LlmClient,
) -> Result<StoryPlan, StageError> {
    info!("Planning story ({}, {}, {}, {})", params.language, params.setting, params.moral, params.culture);

    let response = llm
        .chat(PLANNER_SYSTEM, &planner_prompt(params), PLANNER_TEMPERATURE)
        .await
        .map_err(StageError::Service)?;
    debug!("Planner returned {} bytes", response.len());

    let plan: StoryPlan = parse_structured("story plan", &response)?;
    info!("Planned \"{}\" with {} characters", plan.title, plan.main_characters.len());
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockLlmClient;

    const PLAN_JSON: &str = r#"```json
{
  "title": "Rosie and the Rainy Day",
  "main_characters": ["Rosie, a little girl", "Grandpa Joe"],
  "setting_description": "A cozy cottage in the English countryside",
  "plot_outline": "Rosie waits for the rain to stop and learns to enjoy the wait.",
  "moral_integration": "Good things come to those who wait."
}
```"#;

    #[tokio::test]
    async fn test_plan_story_parses_fenced_json() {
        let llm = MockLlmClient::new(|_, _| Ok(PLAN_JSON.to_string()));
        let plan = plan_story(&StoryParameters::default(), &llm).await.unwrap();

        assert_eq!(plan.title, "Rosie and the Rainy Day");
        assert_eq!(plan.main_characters, vec!["Rosie, a little girl", "Grandpa Joe"]);

        let calls = llm.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, PLANNER_SYSTEM);
        assert_eq!(calls[0].temperature, PLANNER_TEMPERATURE);
    }

    #[tokio::test]
    async fn test_plan_story_parse_error() {
        let llm = MockLlmClient::new(|_, _| Ok("I would love to help with a story!".to_string()));
        let err = plan_story(&StoryParameters::default(), &llm).await.unwrap_err();
        assert!(matches!(err, StageError::Parse(_)));
    }

    #[tokio::test]
    async fn test_plan_story_service_error() {
        let llm = MockLlmClient::new(|_, _| Err(anyhow::anyhow!("connection reset")));
        let err = plan_story(&StoryParameters::default(), &llm).await.unwrap_err();
        assert!(matches!(err, StageError::Service(_)));
        assert!(err.to_string().contains("connection reset"));
    }
}

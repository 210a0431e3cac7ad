use crate::error::StageError;
use crate::llm::LlmClient;
use crate::prompts::{writer_prompt, WRITER_SYSTEM, WRITER_TEMPERATURE};
use crate::state::{ReviewFeedback, StoryParameters, StoryPlan};
use log::{debug, info};

/// Writes a draft from the plan. `review` is the latest verdict, if any; its
/// feedback is only used when the previous draft was rejected.
pub async fn write_story(
    params: &StoryParameters,
    plan: &StoryPlan,
    review: Option<&ReviewFeedback>,
    llm: &dyn LlmClient,
) -> Result<String, StageError> {
    match review {
        Some(r) if !r.approved => info!("Rewriting \"{}\" (revision {})", plan.title, r.revision_count),
        _ => info!("Writing \"{}\"", plan.title),
    }

    let draft = llm
        .chat(WRITER_SYSTEM, &writer_prompt(params, plan, review), WRITER_TEMPERATURE)
        .await
        .map_err(StageError::Service)?;

    debug!("Draft has {} words", draft.split_whitespace().count());
    Ok(draft)
}

use crate::error::{PipelineError, StageError};
use crate::llm::LlmClient;
use crate::prompts::{single_pass_prompt, WRITER_SYSTEM, WRITER_TEMPERATURE};
use crate::stages::{enhance_story, plan_story, review_story, write_story};
use crate::state::{PipelineState, Stage, StoryParameters};
use futures_util::Stream;
use log::{error, info};
use std::sync::Arc;

/// What a stage handler reported, used to pick the next stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Advanced,
    Errored,
    Approved,
    Rejected,
}

/// Transition table. `None` means the pair is not a valid transition,
/// which includes every transition out of a terminal stage.
pub fn next_stage(from: Stage, outcome: Outcome) -> Option<Stage> {
    use Outcome::*;
    use Stage::*;

    match (from, outcome) {
        (Planning, Advanced) => Some(Writing),
        (Planning, Errored) => Some(Failed),
        (Writing, Advanced) => Some(Reviewing),
        (Writing, Errored) => Some(Failed),
        (Reviewing, Approved) => Some(Enhancing),
        (Reviewing, Rejected) => Some(Writing),
        (Enhancing, _) => Some(Complete),
        _ => None,
    }
}

/// Emitted after every stage handler finishes. `stage` is the stage that ran;
/// `state.current_stage` is where the run goes next.
#[derive(Debug, Clone, PartialEq)]
pub struct StageEvent {
    pub stage: Stage,
    pub state: PipelineState,
}

/// Receives stage events for progress display. Observers cannot influence routing.
pub trait StageObserver: Send {
    fn on_stage(&mut self, event: &StageEvent);
}

impl<F> StageObserver for F
where
    F: FnMut(&StageEvent) + Send,
{
    fn on_stage(&mut self, event: &StageEvent) {
        self(event)
    }
}

/// Drives one story from parameters to a finished text. Cheap to clone;
/// every run gets its own [`PipelineState`].
#[derive(Debug, Clone)]
pub struct StoryPipeline {
    llm: Arc<dyn LlmClient>,
}

impl StoryPipeline {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn run(&self, params: StoryParameters) -> Result<String, PipelineError> {
        self.run_with_observer(params, &mut |_: &StageEvent| {}).await
    }

    pub async fn run_with_observer(
        &self,
        params: StoryParameters,
        observer: &mut dyn StageObserver,
    ) -> Result<String, PipelineError> {
        let mut state = PipelineState::new(params);

        while !state.current_stage.is_terminal() {
            let stage = state.current_stage;
            let result = self.advance(&mut state).await;
            observer.on_stage(&StageEvent { stage, state: state.clone() });
            result?;
        }

        state.final_story.ok_or_else(|| {
            PipelineError::new(
                Stage::Complete,
                StageError::Invariant("run completed without a final story".to_string()),
            )
        })
    }

    /// Same run as [`run`](Self::run), exposed as a lazy stream of stage
    /// events. Each stage executes only when the stream is polled; the
    /// stream ends after the event that reaches Complete or Failed.
    pub fn stream(&self, params: StoryParameters) -> impl Stream<Item = StageEvent> + Send + 'static {
        let pipeline = self.clone();
        futures_util::stream::unfold(PipelineState::new(params), move |mut state| {
            let pipeline = pipeline.clone();
            async move {
                if state.current_stage.is_terminal() {
                    return None;
                }
                let stage = state.current_stage;
                // The error is already recorded in the snapshot.
                let _ = pipeline.advance(&mut state).await;
                let event = StageEvent { stage, state: state.clone() };
                Some((event, state))
            }
        })
    }

    /// Writes a story with a single service call, skipping plan, review and
    /// enhancement. Failures are attributed to the Writing stage.
    pub async fn run_single_pass(&self, params: StoryParameters) -> Result<String, PipelineError> {
        info!("Writing story in a single pass");
        self.llm
            .chat(WRITER_SYSTEM, &single_pass_prompt(&params), WRITER_TEMPERATURE)
            .await
            .map_err(|e| {
                error!("Single-pass generation failed: {:#}", e);
                PipelineError::new(Stage::Writing, StageError::Service(e))
            })
    }

    /// Runs the handler for the current stage and moves the state along the
    /// transition table. A failed handler leaves its artifact untouched and
    /// records the error instead.
    async fn advance(&self, state: &mut PipelineState) -> Result<(), PipelineError> {
        let stage = state.current_stage;

        let (next, failure) = match self.step(state).await {
            Ok(outcome) => match next_stage(stage, outcome) {
                Some(next) => (next, None),
                None => (
                    Stage::Failed,
                    Some(StageError::Invariant(format!(
                        "no transition from {} on {:?}",
                        stage, outcome
                    ))),
                ),
            },
            Err(e) => (
                next_stage(stage, Outcome::Errored).unwrap_or(Stage::Failed),
                Some(e),
            ),
        };

        state.current_stage = next;
        match failure {
            Some(e) => {
                let err = PipelineError::new(stage, e);
                error!("{}", err);
                state.error = Some(err.to_string());
                Err(err)
            }
            None => {
                info!("{} -> {}", stage, next);
                Ok(())
            }
        }
    }

    async fn step(&self, state: &mut PipelineState) -> Result<Outcome, StageError> {
        let llm = self.llm.as_ref();

        match state.current_stage {
            Stage::Planning => {
                let plan = plan_story(&state.parameters, llm).await?;
                state.plan = Some(plan);
                Ok(Outcome::Advanced)
            }
            Stage::Writing => {
                let plan = state.plan.as_ref().ok_or_else(|| missing("story plan"))?;
                let draft = write_story(&state.parameters, plan, state.review.as_ref(), llm).await?;
                state.draft = Some(draft);
                Ok(Outcome::Advanced)
            }
            Stage::Reviewing => {
                let draft = state.draft.as_deref().ok_or_else(|| missing("draft"))?;
                let review = review_story(&state.parameters, draft, state.revision_count(), llm).await;
                let outcome = if review.approved {
                    Outcome::Approved
                } else {
                    Outcome::Rejected
                };
                state.review = Some(review);
                Ok(outcome)
            }
            Stage::Enhancing => {
                let draft = state.draft.as_deref().ok_or_else(|| missing("draft"))?;
                let story = enhance_story(&state.parameters, draft, llm).await;
                state.final_story = Some(story);
                Ok(Outcome::Advanced)
            }
            Stage::Complete | Stage::Failed => Err(StageError::Invariant(format!(
                "{} is terminal",
                state.current_stage
            ))),
        }
    }
}

fn missing(artifact: &str) -> StageError {
    StageError::Invariant(format!("{} missing from an earlier stage", artifact))
}

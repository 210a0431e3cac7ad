//! Bedtime story generation: a plan, write, review and enhance pipeline
//! driven over a text-generation service.

pub mod config;
pub mod error;
pub mod llm;
pub mod prompts;
pub mod response;
pub mod setup;
pub mod stages;
pub mod state;
pub mod workflow;

pub use error::{ParseError, PipelineError, StageError};
pub use llm::{create_llm, LlmClient};
pub use state::{PipelineState, ReviewFeedback, Stage, StoryParameters, StoryPlan};
pub use workflow::{StageEvent, StageObserver, StoryPipeline};

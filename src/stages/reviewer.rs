use crate::error::StageError;
use crate::llm::LlmClient;
use crate::prompts::{reviewer_prompt, REVIEWER_SYSTEM, REVIEWER_TEMPERATURE};
use crate::response::parse_structured;
use crate::state::{ReviewFeedback, StoryParameters};
use log::{info, warn};
use serde::Deserialize;

/// Number of rejections allowed before the reviewer must approve.
///
/// The check uses the count *before* this review is added, so the third
/// review of a run is always an approval.
pub const MAX_REVISIONS: u32 = 2;

const FORCED_APPROVAL_FEEDBACK: &str = "Approved after maximum revision attempts.";
const AUTO_APPROVAL_FEEDBACK: &str = "Auto-approved due to review error";

/// The service's judgment of a draft, before the revision cap is applied.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ReviewVerdict {
    pub approved: bool,
    pub age_appropriate: bool,
    pub moral_clarity: bool,
    pub length_ok: bool,
    pub feedback: String,
}

/// Reviews `draft`. Never fails: a service or parse error yields an
/// auto-approval. The returned count is always `revision_count + 1`.
pub async fn review_story(
    params: &StoryParameters,
    draft: &str,
    revision_count: u32,
    llm: &dyn LlmClient,
) -> ReviewFeedback {
    info!("Reviewing draft (revision count {})", revision_count);

    match request_verdict(params, draft, revision_count, llm).await {
        Ok(verdict) => {
            let review = apply_verdict(verdict, revision_count);
            if review.approved {
                info!("Draft approved");
            } else {
                info!("Draft rejected: {}", review.feedback);
            }
            review
        }
        Err(e) => {
            warn!("Review failed, approving without review: {}", e);
            auto_approved(revision_count)
        }
    }
}

async fn request_verdict(
    params: &StoryParameters,
    draft: &str,
    revision_count: u32,
    llm: &dyn LlmClient,
) -> Result<ReviewVerdict, StageError> {
    let response = llm
        .chat(
            REVIEWER_SYSTEM,
            &reviewer_prompt(params, draft, revision_count),
            REVIEWER_TEMPERATURE,
        )
        .await
        .map_err(StageError::Service)?;
    Ok(parse_structured("review verdict", &response)?)
}

/// Turns a verdict into feedback, forcing approval once `revision_count`
/// (the count before this review) has reached [`MAX_REVISIONS`].
pub fn apply_verdict(verdict: ReviewVerdict, revision_count: u32) -> ReviewFeedback {
    let forced = revision_count >= MAX_REVISIONS;
    if forced && !verdict.approved {
        warn!("Revision limit reached, approving draft");
    }

    ReviewFeedback {
        approved: forced || verdict.approved,
        age_appropriate: verdict.age_appropriate,
        moral_clarity: verdict.moral_clarity,
        length_ok: verdict.length_ok,
        feedback: if forced {
            FORCED_APPROVAL_FEEDBACK.to_string()
        } else {
            verdict.feedback
        },
        revision_count: revision_count + 1,
    }
}

pub fn auto_approved(revision_count: u32) -> ReviewFeedback {
    ReviewFeedback {
        approved: true,
        age_appropriate: true,
        moral_clarity: true,
        length_ok: true,
        feedback: AUTO_APPROVAL_FEEDBACK.to_string(),
        revision_count: revision_count + 1,
    }
}

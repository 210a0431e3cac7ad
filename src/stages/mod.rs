//! Stage handlers. Each one makes exactly one call to the text-generation
//! service and returns the artifact it produced; the orchestrator decides
//! what happens next.
//!
//! Planner and writer failures are fatal and returned as [`StageError`].
//! The reviewer fails open and the enhancer falls back to the draft, so
//! neither of them can fail a run.
//!
//! [`StageError`]: crate::error::StageError

mod enhancer;
mod planner;
mod reviewer;
mod writer;

pub use enhancer::enhance_story;
pub use planner::plan_story;
pub use reviewer::{apply_verdict, auto_approved, review_story, ReviewVerdict, MAX_REVISIONS};
pub use writer::write_story;

use anyhow::Result;
use bedtime_stories::config::{Config, GenerationMode};
use bedtime_stories::state::{Stage, StoryParameters};
use bedtime_stories::workflow::{StageEvent, StoryPipeline};
use bedtime_stories::{create_llm, setup};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            eprintln!("Please ensure 'config.yml' exists with valid LLM settings.");
            return Err(e);
        }
    };

    let llm = create_llm(&config)?;
    let pipeline = StoryPipeline::new(llm);

    loop {
        let params = setup::select_parameters(&config)?;
        setup::remember_selection(&mut config, &params)?;

        match generate(&pipeline, config.mode, params).await {
            Ok(story) => {
                println!("\n{}\n", story.trim());
            }
            Err(e) => {
                eprintln!("Oops! The story could not be created: {}", e);
                if config.unattended {
                    return Err(e.into());
                }
            }
        }

        if config.unattended || !setup::ask_another_story()? {
            break;
        }
    }

    Ok(())
}

async fn generate(
    pipeline: &StoryPipeline,
    mode: GenerationMode,
    params: StoryParameters,
) -> Result<String, bedtime_stories::PipelineError> {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.magenta} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = match mode {
        GenerationMode::SinglePass => {
            pb.set_message("Writing your story...");
            pipeline.run_single_pass(params).await
        }
        GenerationMode::Agents => {
            pb.set_message(describe(Stage::Planning).to_string());
            let progress = pb.clone();
            pipeline
                .run_with_observer(params, &mut move |event: &StageEvent| report(&progress, event))
                .await
        }
    };

    match &result {
        Ok(_) => pb.finish_with_message("Your story is ready!"),
        Err(_) => pb.abandon_with_message("Story generation failed"),
    }
    result
}

fn report(pb: &ProgressBar, event: &StageEvent) {
    match (event.stage, &event.state.review) {
        (Stage::Reviewing, Some(review)) => pb.println(format!(
            "  Review #{}: {}",
            review.revision_count,
            if review.approved { "approved" } else { "needs revision" }
        )),
        (stage, _) => pb.println(format!("  {} done", stage)),
    }
    pb.set_message(describe(event.state.current_stage).to_string());
}

fn describe(stage: Stage) -> &'static str {
    match stage {
        Stage::Planning => "Planning the story...",
        Stage::Writing => "Writing the story...",
        Stage::Reviewing => "Reviewing the draft...",
        Stage::Enhancing => "Adding the finishing touches...",
        Stage::Complete => "Done",
        Stage::Failed => "Failed",
    }
}

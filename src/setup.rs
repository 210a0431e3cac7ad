use crate::config::Config;
use crate::state::{Culture, Language, Moral, Setting, StoryParameters};
use anyhow::Result;
use inquire::{Confirm, Select};
use std::fmt::Display;

/// Asks for the four story options, starting from the configured ones.
/// In unattended mode the configured options are returned as they are.
pub fn select_parameters(config: &Config) -> Result<StoryParameters> {
    if config.unattended {
        return Ok(config.story.clone());
    }

    let defaults = &config.story;
    Ok(StoryParameters {
        language: select_option("Choose the story language:", Language::ALL, defaults.language)?,
        setting: select_option("Choose who the story is about:", Setting::ALL, defaults.setting)?,
        moral: select_option("Choose the life lesson:", Moral::ALL, defaults.moral)?,
        culture: select_option("Choose the cultural context:", Culture::ALL, defaults.culture)?,
    })
}

fn select_option<T>(prompt: &str, options: &[T], current: T) -> Result<T>
where
    T: Display + Copy + PartialEq,
{
    let cursor = options.iter().position(|o| *o == current).unwrap_or(0);
    let selection = Select::new(prompt, options.to_vec())
        .with_starting_cursor(cursor)
        .prompt()?;
    Ok(selection)
}

/// Offers to remember the chosen options as the new defaults.
pub fn remember_selection(config: &mut Config, params: &StoryParameters) -> Result<()> {
    if config.unattended || config.story == *params {
        return Ok(());
    }

    let save = Confirm::new("Use these choices as the default next time?")
        .with_default(false)
        .prompt()?;
    if save {
        config.story = params.clone();
        config.save()?;
        println!("Configuration saved.");
    }
    Ok(())
}

pub fn ask_another_story() -> Result<bool> {
    Ok(Confirm::new("Create another story?")
        .with_default(true)
        .prompt()?)
}

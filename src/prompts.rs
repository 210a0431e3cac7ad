//! Instructions sent to the text-generation service for each stage.

use crate::state::{Language, ReviewFeedback, Setting, StoryParameters, StoryPlan};

pub const PLANNER_SYSTEM: &str = "You plan bedtime stories for children aged 2 to 5. \
Given the story parameters, produce a short outline: an age-appropriate title, \
two or three main characters with one-line descriptions, a setting that fits the \
cultural context, a plot with a clear beginning, middle and end, and a note on how \
the moral will come out of the events. Keep situations gentle, simple and free of \
anything frightening. Animal characters behave like real animals and do not cook, \
clean or go to school. Respond with JSON only.";

pub const WRITER_SYSTEM: &str = "You write bedtime stories for children aged 2 to 5.\n\
- 250 to 350 words.\n\
- Simple words, short sentences, short paragraphs.\n\
- A clear beginning that introduces the characters, a small problem, and a resolution that teaches the moral.\n\
- Two or three characters at most, with gentle repetition children can follow.\n\
- No scary or complicated elements; soothing language suited to bedtime.\n\
- Weave in authentic details of the requested culture.\n\
- Animal characters keep to natural behavior such as foraging or building nests.\n\
- A Hinglish story is written entirely in Roman script, narration and dialogue alike.";

pub const REVIEWER_SYSTEM: &str = "You check bedtime stories for children aged 2 to 5 before they are read aloud. \
Judge age appropriateness (simple vocabulary, nothing scary), moral clarity (the lesson follows \
from the story), length (250 to 350 words, five to seven minutes aloud), character realism \
(animals act like animals), cultural authenticity and language quality. When revision is \
needed, give specific feedback the writer can act on. Respond with JSON only.";

pub const ENHANCER_SYSTEM: &str = "You give approved bedtime stories a final polish. \
Add gentle sensory details, smooth the transitions, let the ending settle toward sleep, and \
reinforce the moral in the closing lines. Do not change the structure, add characters or plot \
points, exceed 350 words, or introduce anything exciting or scary.";

pub const PLANNER_TEMPERATURE: f32 = 0.8;
pub const WRITER_TEMPERATURE: f32 = 0.7;
pub const REVIEWER_TEMPERATURE: f32 = 0.3;
pub const ENHANCER_TEMPERATURE: f32 = 0.5;

pub fn setting_requirements(setting: Setting) -> &'static str {
    match setting {
        Setting::PeopleAndAnimals => {
            "\nSetting requirements:\n\
             - At least one human and one animal among the main characters\n\
             - The human and the animal interact in a meaningful way\n\
             - Both help bring about the resolution\n"
        }
        _ => "",
    }
}

pub fn language_requirements(language: Language) -> &'static str {
    match language {
        Language::Hinglish => {
            "\nLanguage requirements:\n\
             - The whole story is in Hinglish, written in Roman script\n\
             - Narration and dialogue both mix Hindi and English the way Indian children speak\n\
             - For example: \"Ek din chhota sa Aarav apne dadaji ke saath garden mein gaya.\"\n"
        }
        _ => "",
    }
}

pub fn planner_prompt(params: &StoryParameters) -> String {
    format!(
        "Create a story plan with these parameters:\n\
         Language: {}\n\
         Setting: {}\n\
         Moral: {}\n\
         Cultural context: {}\n\
         {}{}\n\
         Respond with a JSON object with these fields:\n\
         - title: string\n\
         - main_characters: array of strings, one description per character\n\
         - setting_description: string\n\
         - plot_outline: string covering beginning, middle and end\n\
         - moral_integration: string, how the moral emerges naturally",
        params.language,
        params.setting,
        params.moral,
        params.culture,
        setting_requirements(params.setting),
        language_requirements(params.language),
    )
}

pub fn writer_prompt(
    params: &StoryParameters,
    plan: &StoryPlan,
    review: Option<&ReviewFeedback>,
) -> String {
    let revision_context = match review {
        Some(r) if !r.approved => format!(
            "\nThis is a revision. Feedback on the previous draft:\n{}\n\
             Address this feedback in the new version.\n",
            r.feedback
        ),
        _ => String::new(),
    };

    format!(
        "Write a bedtime story from this plan.\n\n\
         Title: {}\n\
         Characters: {}\n\
         Setting: {}\n\
         Plot: {}\n\
         Moral integration: {}\n\n\
         Language: {}\n\
         Cultural context: {}\n\
         {}{}\n\
         Write the complete story now (250-350 words).",
        plan.title,
        plan.main_characters.join(", "),
        plan.setting_description,
        plan.plot_outline,
        plan.moral_integration,
        params.language,
        params.culture,
        language_requirements(params.language),
        revision_context,
    )
}

pub fn reviewer_prompt(params: &StoryParameters, draft: &str, revision_count: u32) -> String {
    format!(
        "Review this bedtime story:\n\n---\n{}\n---\n\n\
         Story parameters:\n\
         - Language: {}\n\
         - Setting: {}\n\
         - Moral: {}\n\
         - Culture: {}\n\n\
         Revisions so far: {}\n\n\
         Respond with a JSON object:\n\
         {{\n  \"approved\": boolean,\n  \"age_appropriate\": boolean,\n  \"moral_clarity\": boolean,\n  \
         \"length_ok\": boolean,\n  \"feedback\": \"what to change, or brief praise when approved\"\n}}",
        draft, params.language, params.setting, params.moral, params.culture, revision_count,
    )
}

pub fn enhancer_prompt(params: &StoryParameters, draft: &str) -> String {
    format!(
        "Polish this approved bedtime story:\n\n---\n{}\n---\n\n\
         Add gentle sensory details, keep transitions smooth, and make the ending calm and satisfying.\n\
         Language: {}\n\
         {}\n\
         Return only the polished story.",
        draft,
        params.language,
        language_requirements(params.language),
    )
}

/// Prompt for single-pass generation, where one call writes the whole story.
pub fn single_pass_prompt(params: &StoryParameters) -> String {
    format!(
        "Write a bedtime story for children up to 5 years old.\n\
         Language: {}\n\
         Setting: {}\n\
         Moral: {}\n\
         Cultural context: {}\n\
         {}{}\n\
         The story should take five to seven minutes to read aloud, carry a clear moral, \
         include simple dialogue, and draw respectfully on the culture's traditions and storytelling style.",
        params.language,
        params.setting,
        params.moral,
        params.culture,
        setting_requirements(params.setting),
        language_requirements(params.language),
    )
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares a closed set of story options that serialize by their display text.
macro_rules! story_option {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> anyhow::Result<Self> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| anyhow::anyhow!("Unknown {}: {}", stringify!($name), s))
            }
        }
    };
}

story_option!(
    /// Language the story is written in.
    Language {
        English => "English",
        Hindi => "Hindi",
        Hinglish => "Hinglish",
    }
);

story_option!(
    /// Who the story is about.
    Setting {
        People => "People",
        Animals => "Animals",
        PeopleAndAnimals => "Both People & Animals",
    }
);

story_option!(
    Moral {
        Kindness => "Kindness",
        Honesty => "Honesty",
        Sharing => "Sharing",
        Patience => "Patience",
        Courage => "Courage",
        Friendship => "Friendship",
        Love => "Love",
        Respect => "Respect",
        Responsibility => "Responsibility",
        Gratitude => "Gratitude",
        Empathy => "Empathy",
        HardWork => "Hard Work",
        Consistency => "Consistency",
    }
);

story_option!(
    Culture {
        American => "American",
        British => "British",
        Indian => "Indian",
        French => "French",
        Spanish => "Spanish",
    }
);

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StoryParameters {
    pub language: Language,
    pub setting: Setting,
    pub moral: Moral,
    pub culture: Culture,
}

impl Default for StoryParameters {
    fn default() -> Self {
        Self {
            language: Language::English,
            setting: Setting::People,
            moral: Moral::Kindness,
            culture: Culture::American,
        }
    }
}

/// Outline produced once by the planner and only read afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StoryPlan {
    pub title: String,
    pub main_characters: Vec<String>,
    pub setting_description: String,
    pub plot_outline: String,
    pub moral_integration: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReviewFeedback {
    pub approved: bool,
    pub age_appropriate: bool,
    pub moral_clarity: bool,
    pub length_ok: bool,
    pub feedback: String,
    pub revision_count: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Planning,
    Writing,
    Reviewing,
    Enhancing,
    Complete,
    Failed,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Complete | Stage::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Planning => "Planning",
            Stage::Writing => "Writing",
            Stage::Reviewing => "Reviewing",
            Stage::Enhancing => "Enhancing",
            Stage::Complete => "Complete",
            Stage::Failed => "Failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one run carries between stages. Created per run, never shared.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PipelineState {
    pub parameters: StoryParameters,
    pub plan: Option<StoryPlan>,
    pub draft: Option<String>,
    pub review: Option<ReviewFeedback>,
    pub final_story: Option<String>,
    pub current_stage: Stage,
    pub error: Option<String>,
}

impl PipelineState {
    pub fn new(parameters: StoryParameters) -> Self {
        Self {
            parameters,
            plan: None,
            draft: None,
            review: None,
            final_story: None,
            current_stage: Stage::Planning,
            error: None,
        }
    }

    /// Revision count of the latest review, 0 before the first one.
    pub fn revision_count(&self) -> u32 {
        self.review.as_ref().map_or(0, |r| r.revision_count)
    }
}

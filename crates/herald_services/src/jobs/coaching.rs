use chrono::NaiveDate;
use derive_setters::Setters;
use serde_json::json;

use super::{Job, JobPlan};
use crate::{EmailLayout, TemplateEngine};

pub const COACHING_MAX_TOKENS: u32 = 2048;
const ACCENT: &str = "#0f766e";
const LABELS: [&str; 5] = [
    "Morning Intention",
    "Today's Focus",
    "Science Spotlight",
    "Accountability Check-in",
    "Daily Mantra",
];

/// Daily coaching e-mail built from a static goals description.
#[derive(Debug, Clone, PartialEq, Setters)]
#[setters(into)]
pub struct CoachingJob {
    pub goals: String,
    pub coachee: String,
    pub today: NaiveDate,
    /// Shown in the footer as the place to edit goals.
    pub goals_file: String,
}

impl CoachingJob {
    pub fn new(goals: impl Into<String>, coachee: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            goals: goals.into(),
            coachee: coachee.into(),
            today,
            goals_file: "goals.md".to_string(),
        }
    }

    pub fn subject(&self) -> String {
        format!("Your Daily Coaching — {}", self.today.format("%A, %B %d"))
    }
}

impl Job for CoachingJob {
    fn name(&self) -> &'static str {
        "coaching"
    }

    fn describe(&self) -> String {
        self.today.format("%Y-%m-%d").to_string()
    }

    fn plan(&self, templates: &TemplateEngine) -> anyhow::Result<JobPlan> {
        let prompt = templates.render(
            "coaching-prompt.md",
            &json!({
                "name": self.coachee,
                "today": self.today.format("%B %d, %Y").to_string(),
                "day_of_week": self.today.format("%A").to_string(),
                "goals": self.goals,
            }),
        )?;

        let layout = EmailLayout::new("coaching-email.html", ACCENT)
            .labels(LABELS.map(String::from).to_vec())
            .variable("name", self.coachee.as_str())
            .variable("date_label", self.today.format("%A, %B %d, %Y").to_string())
            .variable("goals_file", self.goals_file.as_str());

        Ok(JobPlan {
            prompt,
            max_tokens: COACHING_MAX_TOKENS,
            tools: Vec::new(),
            subject: self.subject(),
            layout,
        })
    }
}

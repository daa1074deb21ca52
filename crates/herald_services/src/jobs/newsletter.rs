use herald_domain::{DateWindow, ToolSpec};
use serde_json::json;

use super::{Job, JobPlan};
use crate::{EmailLayout, TemplateEngine};

pub const NEWSLETTER_MAX_TOKENS: u32 = 4096;
const ACCENT: &str = "#2563eb";

/// Weekly newsletter covering the previous Monday to Sunday, researched with
/// the responder's web search tool.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsletterJob {
    pub window: DateWindow,
    pub max_search_uses: u32,
}

impl NewsletterJob {
    pub fn new(window: DateWindow, max_search_uses: u32) -> Self {
        Self { window, max_search_uses }
    }

    pub fn subject(&self) -> String {
        format!(
            "Weekly AI & Data Engineering Brief – {} to {}",
            self.window.start_label(),
            self.window.end_label()
        )
    }
}

impl Job for NewsletterJob {
    fn name(&self) -> &'static str {
        "newsletter"
    }

    fn describe(&self) -> String {
        format!("{} to {}", self.window.start_label(), self.window.end_label())
    }

    fn plan(&self, templates: &TemplateEngine) -> anyhow::Result<JobPlan> {
        let subject = self.subject();
        let prompt = templates.render(
            "newsletter-prompt.md",
            &json!({
                "start_date": self.window.start_label(),
                "end_date": self.window.end_label(),
                "title": subject,
            }),
        )?;

        let layout = EmailLayout::new("newsletter-email.html", ACCENT)
            .labels(vec!["Application:".to_string()])
            .variable("window_label", self.describe());

        Ok(JobPlan {
            prompt,
            max_tokens: NEWSLETTER_MAX_TOKENS,
            tools: vec![ToolSpec::web_search(self.max_search_uses)],
            subject,
            layout,
        })
    }
}

mod coaching;
mod newsletter;

pub use coaching::*;
pub use newsletter::*;

use herald_domain::ToolSpec;

use crate::{EmailLayout, TemplateEngine};

/// Everything a run needs to know about one job, resolved up front.
#[derive(Debug, Clone, PartialEq)]
pub struct JobPlan {
    pub prompt: String,
    pub max_tokens: u32,
    pub tools: Vec<ToolSpec>,
    pub subject: String,
    pub layout: EmailLayout,
}

/// A scheduled e-mail job.
pub trait Job: Send + Sync {
    /// Short name used in log markers, e.g. `coaching`.
    fn name(&self) -> &'static str;

    /// What the run is about, e.g. the date or reporting window.
    fn describe(&self) -> String;

    fn plan(&self, templates: &TemplateEngine) -> anyhow::Result<JobPlan>;
}

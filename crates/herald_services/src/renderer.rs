use std::sync::Arc;

use derive_setters::Setters;
use serde_json::{Map, Value};

use crate::TemplateEngine;
use crate::markdown::{self, Highlight};

/// Describes how a document is dressed up as an HTML e-mail: which embedded
/// layout wraps it, which bold labels get the accent colour, and the extra
/// values the layout header needs.
#[derive(Debug, Clone, PartialEq, Setters)]
#[setters(into)]
pub struct EmailLayout {
    pub template: String,
    pub labels: Vec<String>,
    pub accent: String,
    pub variables: Map<String, Value>,
}

impl EmailLayout {
    pub fn new(template: impl Into<String>, accent: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            labels: Vec::new(),
            accent: accent.into(),
            variables: Map::new(),
        }
    }

    pub fn variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }
}

/// The two alternatives of an outgoing e-mail body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBody {
    pub plain: String,
    pub html: String,
}

pub struct Renderer {
    templates: Arc<TemplateEngine>,
}

impl Renderer {
    pub fn new(templates: Arc<TemplateEngine>) -> Self {
        Self { templates }
    }

    /// The plain alternative is the markdown unchanged; the HTML alternative
    /// is the converted markdown wrapped in the layout template.
    pub fn render(
        &self,
        markdown: &str,
        subject: &str,
        layout: &EmailLayout,
    ) -> anyhow::Result<RenderedBody> {
        let content = markdown::to_html(
            markdown,
            Highlight { labels: &layout.labels, colour: &layout.accent },
        );

        let mut data = layout.variables.clone();
        data.insert("subject".to_string(), Value::from(subject));
        data.insert("content".to_string(), Value::from(content));

        let html = self.templates.render(&layout.template, &data)?;

        Ok(RenderedBody { plain: markdown.to_string(), html })
    }
}

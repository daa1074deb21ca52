use anyhow::Context;
use handlebars::Handlebars;
use include_dir::{Dir, DirEntry, File, include_dir};
use serde::Serialize;

static TEMPLATES: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Renders the prompt and e-mail templates embedded into the binary.
///
/// Template names are file paths relative to the `templates` directory, e.g.
/// `coaching-prompt.md`. Values are HTML-escaped unless the template uses a
/// triple-stash (`{{{value}}}`).
#[derive(Clone)]
pub struct TemplateEngine {
    hb: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new() -> anyhow::Result<Self> {
        let mut hb = Handlebars::new();
        hb.set_strict_mode(true);

        for file in files(&TEMPLATES) {
            let name = file.path().to_string_lossy();
            let content = file
                .contents_utf8()
                .with_context(|| format!("Embedded template '{name}' is not valid UTF-8"))?;
            hb.register_template_string(&name, content)
                .with_context(|| format!("Failed to register template '{name}'"))?;
        }

        Ok(Self { hb })
    }

    pub fn render(&self, name: &str, data: &impl Serialize) -> anyhow::Result<String> {
        self.hb
            .render(name, data)
            .with_context(|| format!("Failed to render template '{name}'"))
    }
}

fn files(dir: &'static Dir<'static>) -> impl Iterator<Item = &'static File<'static>> {
    dir.entries().iter().flat_map(walk_entry)
}

fn walk_entry(
    entry: &'static DirEntry<'static>,
) -> Box<dyn Iterator<Item = &'static File<'static>>> {
    match entry {
        DirEntry::File(file) => Box::new(std::iter::once(file)),
        DirEntry::Dir(dir) => Box::new(dir.entries().iter().flat_map(walk_entry)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_all_embedded_templates_are_registered() {
        let fixture = TemplateEngine::new().unwrap();

        let mut actual: Vec<_> = fixture.hb.get_templates().keys().cloned().collect();
        actual.sort();

        let expected = vec![
            "coaching-email.html".to_string(),
            "coaching-prompt.md".to_string(),
            "newsletter-email.html".to_string(),
            "newsletter-prompt.md".to_string(),
        ];
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_strict_mode_rejects_missing_variables() {
        let fixture = TemplateEngine::new().unwrap();

        let actual = fixture.render("newsletter-prompt.md", &json!({"start_date": "x"}));

        assert!(actual.is_err());
    }

    #[test]
    fn test_prompt_values_are_not_escaped() {
        let fixture = TemplateEngine::new().unwrap();

        let actual = fixture
            .render(
                "newsletter-prompt.md",
                &json!({
                    "start_date": "March 03, 2025",
                    "end_date": "March 09, 2025",
                    "title": "AI & Data – \"weekly\"",
                }),
            )
            .unwrap();

        assert!(actual.contains("Title: \"AI & Data – \"weekly\"\""));
    }
}

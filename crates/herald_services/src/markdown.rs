use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};

/// Bold spans whose text contains one of `labels` are emitted with an inline
/// `color` style.
#[derive(Debug, Clone, Copy)]
pub struct Highlight<'a> {
    pub labels: &'a [String],
    pub colour: &'a str,
}

/// Converts the generated markdown into an HTML fragment. Single newlines are
/// kept as line breaks; unknown syntax passes through as text.
pub fn to_html(markdown: &str, highlight: Highlight<'_>) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events = Parser::new_ext(markdown, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        event => event,
    });

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, highlight_labels(events, highlight).into_iter());
    output
}

fn highlight_labels<'a>(
    events: impl Iterator<Item = Event<'a>>,
    highlight: Highlight<'_>,
) -> Vec<Event<'a>> {
    let mut output = Vec::new();
    let mut span: Option<Vec<Event<'a>>> = None;
    let mut depth = 0usize;

    for event in events {
        let opens = matches!(event, Event::Start(Tag::Strong));
        let closes = matches!(event, Event::End(TagEnd::Strong));

        if span.is_none() {
            if opens {
                span = Some(Vec::new());
            } else {
                output.push(event);
            }
            continue;
        }

        if closes && depth == 0 {
            let inner = span.take().unwrap_or_default();
            output.extend(strong_span(inner, highlight));
            continue;
        }

        if opens {
            depth += 1;
        } else if closes {
            depth -= 1;
        }
        if let Some(inner) = span.as_mut() {
            inner.push(event);
        }
    }

    if let Some(inner) = span {
        output.push(Event::Start(Tag::Strong));
        output.extend(inner);
    }

    output
}

fn strong_span<'a>(inner: Vec<Event<'a>>, highlight: Highlight<'_>) -> Vec<Event<'a>> {
    let text: String = inner
        .iter()
        .filter_map(|event| match event {
            Event::Text(text) | Event::Code(text) => Some(text.as_ref()),
            _ => None,
        })
        .collect();

    let (open, close) = if highlight.labels.iter().any(|label| text.contains(label.as_str())) {
        (
            Event::InlineHtml(format!("<strong style=\"color:{};\">", highlight.colour).into()),
            Event::InlineHtml("</strong>".into()),
        )
    } else {
        (Event::Start(Tag::Strong), Event::End(TagEnd::Strong))
    };

    let mut events = Vec::with_capacity(inner.len() + 2);
    events.push(open);
    events.extend(inner);
    events.push(close);
    events
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn fixture_labels() -> Vec<String> {
        vec!["Morning Intention".to_string(), "Application:".to_string()]
    }

    fn render(markdown: &str) -> String {
        let labels = fixture_labels();
        to_html(markdown, Highlight { labels: &labels, colour: "#2563eb" })
    }

    #[test]
    fn test_label_in_bold_span_is_coloured() {
        let actual = render("**Application:** ship it");

        let expected = "<p><strong style=\"color:#2563eb;\">Application:</strong> ship it</p>\n";
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_numbered_heading_containing_label_is_coloured() {
        let actual = render("**1. Morning Intention**");

        let expected = "<p><strong style=\"color:#2563eb;\">1. Morning Intention</strong></p>\n";
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_other_bold_text_is_untouched() {
        let actual = render("**Elsewhere**");

        assert_eq!(actual, "<p><strong>Elsewhere</strong></p>\n");
    }

    #[test]
    fn test_single_newline_becomes_line_break() {
        let actual = render("first\nsecond");

        assert_eq!(actual, "<p>first<br />\nsecond</p>\n");
    }

    #[test]
    fn test_tables_are_rendered() {
        let actual = render("| a | b |\n|---|---|\n| 1 | 2 |");

        assert!(actual.contains("<table>"));
        assert!(actual.contains("<td>1</td>"));
    }

    #[test]
    fn test_unbalanced_markup_passes_through_as_text() {
        let actual = render("**not closed");

        assert_eq!(actual, "<p>**not closed</p>\n");
    }
}

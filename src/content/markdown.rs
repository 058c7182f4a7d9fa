//! Markdown rendering as an ordered pipeline of named transformation steps
//!
//! The body of a post is parsed once into a pulldown-cmark event stream, and
//! each configured step rewrites the stream before final HTML emission.
//! Steps are independent; ordering matters only where one step consumes
//! another's output (autolinking reads the ids assigned by the slug step,
//! highlighting reads the fence info rewritten by the title step).

use std::collections::HashMap;

use pulldown_cmark::{html, BlockQuoteKind, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::error::{Error, Result};

/// A single transformation over the parsed document event stream.
pub trait TransformStep: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply<'a>(&self, events: Vec<Event<'a>>) -> Result<Vec<Event<'a>>>;
}

/// Markdown renderer holding the configured step pipeline.
pub struct MarkdownRenderer {
    steps: Vec<Box<dyn TransformStep>>,
}

impl MarkdownRenderer {
    /// Build a renderer from configured step names, in order.
    /// Unknown step names fail construction.
    pub fn from_config(step_names: &[String], highlight_theme: &str) -> Result<Self> {
        let mut steps: Vec<Box<dyn TransformStep>> = Vec::with_capacity(step_names.len());
        for name in step_names {
            steps.push(build_step(name, highlight_theme)?);
        }
        Ok(Self { steps })
    }

    /// Render a post body to HTML.
    pub fn render(&self, body: &str) -> Result<String> {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_GFM;

        let mut events: Vec<Event> = Parser::new_ext(body, options).collect();
        for step in &self.steps {
            events = step.apply(events)?;
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        Ok(html_output)
    }
}

fn build_step(name: &str, highlight_theme: &str) -> Result<Box<dyn TransformStep>> {
    match name {
        "heading-slugs" => Ok(Box::new(HeadingSlugs)),
        "autolink-headings" => Ok(Box::new(AutolinkHeadings)),
        "code-titles" => Ok(Box::new(CodeTitles)),
        "callouts" => Ok(Box::new(Callouts)),
        "highlight" => Ok(Box::new(Highlight::new(highlight_theme))),
        other => Err(Error::Config(format!(
            "unknown markdown pipeline step '{}'",
            other
        ))),
    }
}

/// Assigns slug ids to headings that have none.
///
/// Repeated heading texts get `-1`, `-2`, ... suffixes so ids stay unique
/// within a document.
struct HeadingSlugs;

impl TransformStep for HeadingSlugs {
    fn name(&self) -> &'static str {
        "heading-slugs"
    }

    fn apply<'a>(&self, events: Vec<Event<'a>>) -> Result<Vec<Event<'a>>> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut out = Vec::with_capacity(events.len());
        let mut iter = events.into_iter();

        while let Some(event) = iter.next() {
            match event {
                Event::Start(Tag::Heading {
                    level,
                    id: None,
                    classes,
                    attrs,
                }) => {
                    // Collect the heading's inner events to derive the slug,
                    // then re-emit them unchanged.
                    let mut inner = Vec::new();
                    let mut text = String::new();
                    for ev in iter.by_ref() {
                        match &ev {
                            Event::Text(t) | Event::Code(t) => text.push_str(t),
                            _ => {}
                        }
                        let done = matches!(ev, Event::End(TagEnd::Heading(l)) if l == level);
                        inner.push(ev);
                        if done {
                            break;
                        }
                    }

                    let base = slug::slugify(&text);
                    let count = seen.entry(base.clone()).or_insert(0);
                    let id = if *count == 0 {
                        base.clone()
                    } else {
                        format!("{}-{}", base, count)
                    };
                    *count += 1;

                    out.push(Event::Start(Tag::Heading {
                        level,
                        id: Some(CowStr::from(id)),
                        classes,
                        attrs,
                    }));
                    out.extend(inner);
                }
                other => out.push(other),
            }
        }

        Ok(out)
    }
}

/// Injects an anchor link span into headings that carry an id.
/// Requires `heading-slugs` to have run first.
struct AutolinkHeadings;

impl TransformStep for AutolinkHeadings {
    fn name(&self) -> &'static str {
        "autolink-headings"
    }

    fn apply<'a>(&self, events: Vec<Event<'a>>) -> Result<Vec<Event<'a>>> {
        let mut out = Vec::with_capacity(events.len());
        for event in events {
            let anchor = match &event {
                Event::Start(Tag::Heading { id: Some(id), .. }) => Some(format!(
                    r##"<a href="#{}" aria-hidden="true" tabindex="-1" class="anchor"></a>"##,
                    id
                )),
                _ => None,
            };
            out.push(event);
            if let Some(anchor) = anchor {
                out.push(Event::InlineHtml(CowStr::from(anchor)));
            }
        }
        Ok(out)
    }
}

/// Hoists a `lang:title=NAME` fence annotation into a visible label.
struct CodeTitles;

impl TransformStep for CodeTitles {
    fn name(&self) -> &'static str {
        "code-titles"
    }

    fn apply<'a>(&self, events: Vec<Event<'a>>) -> Result<Vec<Event<'a>>> {
        let mut out = Vec::with_capacity(events.len());
        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    match split_code_title(&info) {
                        Some((lang, title)) => {
                            out.push(Event::Html(CowStr::from(format!(
                                "<div class=\"code-title\">{}</div>\n",
                                html_escape(&title)
                            ))));
                            out.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(
                                CowStr::from(lang),
                            ))));
                        }
                        None => {
                            out.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))));
                        }
                    }
                }
                other => out.push(other),
            }
        }
        Ok(out)
    }
}

/// Split a fence info string like `rust:title=main.rs` into (lang, title).
fn split_code_title(info: &str) -> Option<(String, String)> {
    let (lang, rest) = info.split_once(':')?;
    let title = rest.strip_prefix("title=")?;
    if title.is_empty() {
        return None;
    }
    Some((lang.to_string(), title.to_string()))
}

/// Wraps specially-marked blockquotes (`> [!NOTE]` etc.) as callout boxes.
///
/// The GFM extension parses the marker into a `BlockQuoteKind`; this step
/// turns the surrounding blockquote into a classed element.
struct Callouts;

impl Callouts {
    fn class_for(kind: BlockQuoteKind) -> &'static str {
        match kind {
            BlockQuoteKind::Note => "note",
            BlockQuoteKind::Tip => "tip",
            BlockQuoteKind::Important => "important",
            BlockQuoteKind::Warning => "warning",
            BlockQuoteKind::Caution => "caution",
        }
    }
}

impl TransformStep for Callouts {
    fn name(&self) -> &'static str {
        "callouts"
    }

    fn apply<'a>(&self, events: Vec<Event<'a>>) -> Result<Vec<Event<'a>>> {
        let mut out = Vec::with_capacity(events.len());

        // The end tag carries the kind too, so marked and plain blockquotes
        // pair up without tracking nesting.
        for event in events {
            match event {
                Event::Start(Tag::BlockQuote(Some(kind))) => {
                    out.push(Event::Html(CowStr::from(format!(
                        "<blockquote class=\"callout callout-{}\">\n",
                        Self::class_for(kind)
                    ))));
                }
                Event::End(TagEnd::BlockQuote(Some(_))) => {
                    out.push(Event::Html(CowStr::from("</blockquote>\n")));
                }
                other => out.push(other),
            }
        }

        Ok(out)
    }
}

/// Applies syntect highlighting to fenced code blocks.
struct Highlight {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl Highlight {
    fn new(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
        }
    }

    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .unwrap_or_else(|| {
                self.theme_set
                    .themes
                    .values()
                    .next()
                    .expect("No themes available")
            });

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => highlighted,
            Err(_) => {
                // Fallback to a plain escaped code block
                format!(
                    "<pre><code class=\"language-{}\">{}</code></pre>\n",
                    lang,
                    html_escape(code)
                )
            }
        }
    }
}

impl TransformStep for Highlight {
    fn name(&self) -> &'static str {
        "highlight"
    }

    fn apply<'a>(&self, events: Vec<Event<'a>>) -> Result<Vec<Event<'a>>> {
        let mut out = Vec::with_capacity(events.len());
        let mut in_code_block = false;
        let mut lang: Option<String> = None;
        let mut buffer = String::new();

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    lang = match kind {
                        CodeBlockKind::Fenced(info) if !info.is_empty() => info
                            .split(|c: char| c == ':' || c.is_whitespace())
                            .next()
                            .map(|s| s.to_string()),
                        _ => None,
                    };
                    buffer.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let highlighted = self.highlight_code(&buffer, lang.as_deref());
                    out.push(Event::Html(CowStr::from(highlighted)));
                    in_code_block = false;
                    lang = None;
                }
                Event::Text(text) if in_code_block => {
                    buffer.push_str(&text);
                }
                other => out.push(other),
            }
        }

        Ok(out)
    }
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_pipeline;

    fn renderer() -> MarkdownRenderer {
        MarkdownRenderer::from_config(&default_pipeline(), "base16-ocean.dark").unwrap()
    }

    #[test]
    fn test_render_basic_markdown() {
        let html = renderer().render("Hello **world**, a test.").unwrap();
        assert!(html.contains("<strong>world</strong>"));
    }

    #[test]
    fn test_unknown_step_fails_construction() {
        assert!(matches!(
            MarkdownRenderer::from_config(&["mystery".to_string()], "base16-ocean.dark"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_heading_slugs_and_autolink() {
        let html = renderer().render("# Hello World\n\ntext").unwrap();
        assert!(html.contains(r#"id="hello-world""#), "{html}");
        assert!(html.contains(r##"href="#hello-world""##), "{html}");
        assert!(html.contains(r#"class="anchor""#));
    }

    #[test]
    fn test_duplicate_headings_get_unique_slugs() {
        let html = renderer().render("# Setup\n\n# Setup\n").unwrap();
        assert!(html.contains(r#"id="setup""#));
        assert!(html.contains(r#"id="setup-1""#));
    }

    #[test]
    fn test_autolink_without_slugs_is_inert() {
        // Order sensitivity: without the slug step, no ids exist to link to.
        let r = MarkdownRenderer::from_config(
            &["autolink-headings".to_string()],
            "base16-ocean.dark",
        )
        .unwrap();
        let html = r.render("# Hello World").unwrap();
        assert!(!html.contains("anchor"));
    }

    #[test]
    fn test_code_title_hoisted() {
        let html = renderer()
            .render("```rust:title=main.rs\nfn main() {}\n```")
            .unwrap();
        assert!(html.contains(r#"<div class="code-title">main.rs</div>"#), "{html}");
    }

    #[test]
    fn test_code_block_highlighted() {
        let html = renderer().render("```rust\nfn main() {}\n```").unwrap();
        // syntect wraps output in a styled <pre>
        assert!(html.contains("<pre"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_callout_blockquote() {
        let html = renderer()
            .render("> [!NOTE]\n> Something worth knowing.")
            .unwrap();
        assert!(html.contains(r#"class="callout callout-note""#), "{html}");
        assert!(html.contains("Something worth knowing."));
    }

    #[test]
    fn test_callout_and_plain_blockquote_coexist() {
        let html = renderer()
            .render("> plain quote\n\n> [!TIP]\n> worth trying")
            .unwrap();
        assert!(html.contains(r#"class="callout callout-tip""#), "{html}");
        assert!(html.contains("<blockquote>\n"), "{html}");
        // Both quotes close: one rewritten, one native.
        assert_eq!(html.matches("</blockquote>").count(), 2, "{html}");
    }

    #[test]
    fn test_plain_blockquote_untouched() {
        let html = renderer().render("> just a quote").unwrap();
        assert!(html.contains("<blockquote>"), "{html}");
        assert!(!html.contains("callout"));
    }
}

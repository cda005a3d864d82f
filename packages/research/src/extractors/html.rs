//! HTML to text conversion.
//!
//! Two converters with different appetites:
//! - [`extract_structured`] finds the dominant content container and keeps
//!   its prose, one line per block element, dropping page chrome.
//! - [`scrape_paragraphs`] is the blunt fallback: every `<p>` and
//!   `<article>` outside of scripts, styles and page furniture, joined
//!   with single spaces.

use scraper::{ElementRef, Html, Node, Selector};

/// Content containers, most specific first.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    "#content",
    "#main-content",
    ".post-content",
    ".entry-content",
    ".article-content",
    ".article-body",
    ".story-body",
    ".content",
];

/// Navigational chrome, embedded media and non-prose elements.
const CHROME: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer", "aside", "form",
    "button", "select", "iframe", "svg", "img", "picture", "figure", "video", "audio", "canvas",
];

/// Elements stripped by the paragraph scraper.
const STRIPPED: &[&str] = &["script", "style", "nav", "footer", "header"];

/// Elements that start a new line of text.
const BLOCKS: &[&str] = &[
    "p", "div", "section", "article", "main", "li", "ul", "ol", "dl", "dt", "dd", "h1", "h2",
    "h3", "h4", "h5", "h6", "blockquote", "pre", "table", "tr", "td", "th", "br", "hr", "body",
];

/// A container shorter than this is passed over for the next candidate.
const MIN_CONTAINER_CHARS: usize = 200;

/// Readability-style extraction of the page's main text.
///
/// Returns an empty string when the page has no prose outside of chrome.
pub fn extract_structured(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut shortest_candidate: Option<String> = None;

    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for element in document.select(&selector) {
            if has_ancestor_in(element, CHROME) {
                continue;
            }
            let text = block_text(element, CHROME);
            if text.chars().count() >= MIN_CONTAINER_CHARS {
                return text;
            }
            if !text.is_empty() && shortest_candidate.is_none() {
                shortest_candidate = Some(text);
            }
        }
    }

    let body_text = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .map(|body| block_text(body, CHROME))
        .unwrap_or_default();

    if body_text.is_empty() {
        shortest_candidate.unwrap_or_default()
    } else {
        body_text
    }
}

/// Concatenate the text of every `<p>` and `<article>` element.
///
/// `script`, `style`, `nav`, `footer` and `header` subtrees are removed
/// first, so paragraphs inside them never contribute.
pub fn scrape_paragraphs(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("p, article") else {
        return String::new();
    };

    document
        .select(&selector)
        .filter(|element| !has_ancestor_in(*element, STRIPPED))
        .map(|element| inline_text(element, STRIPPED))
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn has_ancestor_in(element: ElementRef<'_>, names: &[&str]) -> bool {
    element.ancestors().any(|node| match node.value() {
        Node::Element(el) => names.contains(&el.name()),
        _ => false,
    })
}

/// Accumulates text, optionally splitting it into lines at block edges.
#[derive(Default)]
struct TextSink {
    lines: Vec<String>,
    current: String,
}

impl TextSink {
    fn push(&mut self, text: &str) {
        self.current.push_str(text);
    }

    fn break_line(&mut self) {
        let line = self.current.split_whitespace().collect::<Vec<_>>().join(" ");
        if !line.is_empty() {
            self.lines.push(line);
        }
        self.current.clear();
    }

    fn finish(mut self) -> String {
        self.break_line();
        self.lines.join("\n")
    }
}

/// Depth-first walk with an explicit stack, so deeply nested markup
/// cannot exhaust the thread's stack.
fn walk(root: ElementRef<'_>, skip: &[&str], split_blocks: bool, sink: &mut TextSink) {
    // (node, closing): a closing entry marks the end of a block element
    let mut stack: Vec<_> = root.children().rev().map(|child| (child, false)).collect();

    while let Some((node, closing)) = stack.pop() {
        if closing {
            sink.break_line();
            continue;
        }
        match node.value() {
            Node::Text(text) => sink.push(text),
            Node::Element(el) if skip.contains(&el.name()) => {}
            Node::Element(el) => {
                if split_blocks && BLOCKS.contains(&el.name()) {
                    sink.break_line();
                    stack.push((node, true));
                }
                stack.extend(node.children().rev().map(|child| (child, false)));
            }
            _ => {}
        }
    }
}

/// Text of `root`, one line per block element, whitespace collapsed.
fn block_text(root: ElementRef<'_>, skip: &[&str]) -> String {
    let mut sink = TextSink::default();
    walk(root, skip, true, &mut sink);
    sink.finish()
}

/// Text of `root` concatenated as-is, skipping the given subtrees.
fn inline_text(root: ElementRef<'_>, skip: &[&str]) -> String {
    let mut sink = TextSink::default();
    walk(root, skip, false, &mut sink);
    sink.current
}

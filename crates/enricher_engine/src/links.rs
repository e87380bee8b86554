use ego_tree::NodeRef;
use enricher_core::SocialLinks;
use scraper::node::Node;
use scraper::{ElementRef, Html};

const FACEBOOK_MARKER: &str = "facebook.com";
const INSTAGRAM_MARKER: &str = "instagram.com";

/// Trimmed, non-empty `href` values of all anchors, in document order.
pub fn anchor_targets(document: &Html) -> Vec<String> {
    let mut targets = Vec::new();
    collect_anchors(document.tree.root(), &mut targets);
    targets
}

fn collect_anchors(node: NodeRef<'_, Node>, targets: &mut Vec<String>) {
    for child in node.children() {
        if let Some(element) = ElementRef::wrap(child) {
            if element.value().name().eq_ignore_ascii_case("a") {
                if let Some(href) = element.value().attr("href").map(str::trim) {
                    if !href.is_empty() {
                        targets.push(href.to_string());
                    }
                }
            }
        }
        collect_anchors(child, targets);
    }
}

/// First Facebook and first Instagram link among the document's anchors.
pub fn extract_profile_links(document: &Html) -> SocialLinks {
    profile_links_from(&anchor_targets(document))
}

fn profile_links_from(targets: &[String]) -> SocialLinks {
    let first_containing =
        |marker: &str| targets.iter().find(|href| href.contains(marker)).cloned();
    SocialLinks {
        facebook: first_containing(FACEBOOK_MARKER),
        instagram: first_containing(INSTAGRAM_MARKER),
    }
}

/// Human-visible text of a document.
///
/// Script-like elements are skipped, whitespace runs collapse to one space
/// and block elements start on a new line, so text from neighbouring blocks
/// never fuses into a single token.
pub fn visible_text(document: &Html) -> String {
    let mut ctx = TextContext::default();
    visit_node(document.tree.root(), &mut ctx);
    ctx.builder.trim().to_string()
}

fn visit_node(node: NodeRef<'_, Node>, ctx: &mut TextContext) {
    match node.value() {
        Node::Text(text) => ctx.append_text(text),
        Node::Element(_) => {
            if let Some(element) = ElementRef::wrap(node) {
                visit_element(element, ctx);
            }
        }
        _ => {
            for child in node.children() {
                visit_node(child, ctx);
            }
        }
    }
}

fn visit_element(element: ElementRef<'_>, ctx: &mut TextContext) {
    let tag = element.value().name().to_ascii_lowercase();
    match tag.as_str() {
        "script" | "style" | "noscript" | "template" | "head" => {}
        "br" | "hr" => ctx.ensure_newline(),
        "p" | "div" | "section" | "article" | "header" | "footer" | "nav" | "main" | "aside"
        | "li" | "ul" | "ol" | "table" | "tr" | "td" | "th" | "blockquote" | "address"
        | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "figure" | "figcaption" | "form" => {
            ctx.ensure_newline();
            visit_children(element, ctx);
            ctx.ensure_newline();
        }
        _ => visit_children(element, ctx),
    }
}

fn visit_children(element: ElementRef<'_>, ctx: &mut TextContext) {
    for child in element.children() {
        visit_node(child, ctx);
    }
}

#[derive(Default)]
struct TextContext {
    builder: String,
    last_char: Option<char>,
}

impl TextContext {
    fn append_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                if matches!(self.last_char, None | Some(' ') | Some('\n')) {
                    continue;
                }
                self.push_char(' ');
            } else {
                self.push_char(ch);
            }
        }
    }

    fn ensure_newline(&mut self) {
        if self.last_char == Some('\n') || self.builder.is_empty() {
            return;
        }
        if self.last_char == Some(' ') {
            self.builder.pop();
        }
        self.push_char('\n');
    }

    fn push_char(&mut self, ch: char) {
        self.builder.push(ch);
        self.last_char = Some(ch);
    }
}

//! Minimal HTML serializer over a parsed tree.
//!
//! Elements rejected by the `skip` predicate are left out together with
//! their subtree, and anchor `href`s are made absolute on the way out.

use html_escape::{encode_double_quoted_attribute, encode_text};
use scraper::{ElementRef, Node};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Make `href` absolute against `base_url` unless it already mentions `http`.
///
/// The check is a case-insensitive substring match, so `HTTPS://x` and
/// `/redirect?to=http://x` are both left alone.
pub fn absolutize(base_url: &str, href: &str) -> String {
    if href.to_ascii_lowercase().contains("http") {
        return href.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        href.trim_start_matches('/')
    )
}

/// Concatenated text of `element`, ignoring skipped subtrees.
pub fn text_content<F>(element: ElementRef<'_>, skip: &F) -> String
where
    F: Fn(ElementRef<'_>) -> bool,
{
    let mut out = String::new();
    collect_text(element, skip, &mut out);
    out
}

fn collect_text<F>(element: ElementRef<'_>, skip: &F, out: &mut String)
where
    F: Fn(ElementRef<'_>) -> bool,
{
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    if !skip(child) {
                        collect_text(child, skip, out);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Serialize the children of `element` back to HTML.
pub fn inner_html<F>(element: ElementRef<'_>, skip: &F, base_url: &str) -> String
where
    F: Fn(ElementRef<'_>) -> bool,
{
    let mut out = String::new();
    write_children(element, skip, base_url, &mut out);
    out
}

fn write_children<F>(element: ElementRef<'_>, skip: &F, base_url: &str, out: &mut String)
where
    F: Fn(ElementRef<'_>) -> bool,
{
    let raw_text = RAW_TEXT_ELEMENTS.contains(&element.value().name());

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                if raw_text {
                    out.push_str(text);
                } else {
                    out.push_str(&encode_text(&**text));
                }
            }
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    if !skip(child) {
                        write_element(child, skip, base_url, out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn write_element<F>(element: ElementRef<'_>, skip: &F, base_url: &str, out: &mut String)
where
    F: Fn(ElementRef<'_>) -> bool,
{
    let el = element.value();
    let name = el.name();

    out.push('<');
    out.push_str(name);
    for (attr, value) in el.attrs() {
        let value = if name == "a" && attr == "href" {
            absolutize(base_url, value)
        } else {
            value.to_string()
        };
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        out.push_str(&encode_double_quoted_attribute(&value));
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&name) {
        return;
    }

    write_children(element, skip, base_url, out);

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

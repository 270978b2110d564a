//! Entry page extraction.
//!
//! Turns the dictionary's entry page into a channel title and a list of
//! [`ExtractedItem`]s:
//!
//! ```text
//! HTML → h1.title → channel title
//!      → li[id]   → (div.aul text, byline date, inner HTML, show.asp?id=…)
//! ```
//!
//! The parsed document is never mutated. Noise (`script` elements and the
//! tables inside `div.aul` bylines) is excluded while reading text and
//! while re-serializing entry bodies.

mod html;

pub use html::absolutize;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::app::{EksiError, Result};
use crate::domain::ExtractedItem;

const TITLE_SELECTOR: &str = "h1.title";
const ENTRY_SELECTOR: &str = "li";
const BYLINE_SELECTOR: &str = "div.aul";
const NOISE_SELECTOR: &str = "script, div.aul table";

/// Characters removed from the page heading.
pub const CHANNEL_TITLE_STRIP: &[char] = &['*'];

/// Characters removed from an entry's author/date line.
pub const ITEM_TITLE_STRIP: &[char] = &['(', ')'];

/// Prefix of entry element ids (`<li id="d123">`).
pub const ENTRY_ID_PREFIX: char = 'd';

/// Timestamp formats found in bylines, most specific first.
const BYLINE_DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M";
const BYLINE_DATE_FORMAT: &str = "%d.%m.%Y";

/// Marks an edit time appended to the original timestamp.
const BYLINE_EDIT_SEPARATOR: &str = " ~ ";

/// Bylines are written in Turkey time, which has no DST.
const SITE_UTC_OFFSET_SECS: i32 = 3 * 3600;

/// Title and entries of one entry page, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,
    pub items: Vec<ExtractedItem>,
}

#[derive(Debug, Clone)]
pub struct Extractor {
    base_url: String,
}

impl Extractor {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn extract(&self, html: &str) -> Result<ExtractedPage> {
        let document = Html::parse_document(html);

        let title_selector = parse_selector(TITLE_SELECTOR)?;
        let entry_selector = parse_selector(ENTRY_SELECTOR)?;
        let byline_selector = parse_selector(BYLINE_SELECTOR)?;
        let noise_selector = parse_selector(NOISE_SELECTOR)?;

        let heading = document
            .select(&title_selector)
            .next()
            .ok_or_else(|| EksiError::Parse(format!("no {} element on page", TITLE_SELECTOR)))?;
        let title = clean_channel_title(&heading.text().collect::<String>());

        let is_noise = |el: ElementRef<'_>| noise_selector.matches(&el);
        let is_noise_or_byline =
            |el: ElementRef<'_>| noise_selector.matches(&el) || byline_selector.matches(&el);

        let mut items = Vec::new();
        for entry in document.select(&entry_selector) {
            if is_noise(entry) || entry.ancestors().filter_map(ElementRef::wrap).any(is_noise) {
                continue;
            }

            let Some(id) = entry_id(entry.value().attr("id").unwrap_or("")) else {
                debug!("Skipping list item without entry id");
                continue;
            };

            let byline: String = entry
                .select(&byline_selector)
                .map(|aul| html::text_content(aul, &is_noise))
                .collect();
            let item_title = clean_item_title(&byline);
            let published = entry_date(&item_title);

            let body_html = html::inner_html(entry, &is_noise_or_byline, &self.base_url);
            let link = format!("{}/show.asp?id={}", self.base_url, id);

            items.push(
                ExtractedItem::new(item_title, body_html, link).with_published(published),
            );
        }

        debug!("Extracted {} entries for {:?}", items.len(), title);
        Ok(ExtractedPage { title, items })
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| EksiError::Parse(format!("invalid selector {:?}: {}", selector, e)))
}

/// Remove every `*` from the page heading.
pub fn clean_channel_title(raw: &str) -> String {
    strip_chars(raw, CHANNEL_TITLE_STRIP)
}

/// Remove every `(` and `)` from an entry byline.
pub fn clean_item_title(raw: &str) -> String {
    strip_chars(raw, ITEM_TITLE_STRIP)
}

fn strip_chars(raw: &str, strip: &[char]) -> String {
    raw.chars()
        .filter(|c| !strip.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Publication time from a cleaned byline such as `ssg, 12.01.2020 10:00`.
///
/// The timestamp is whatever follows the last `, `, up to an edit marker.
/// A date without a time is taken as midnight.
pub fn entry_date(byline: &str) -> Option<DateTime<FixedOffset>> {
    let (_, stamp) = byline.rsplit_once(", ")?;
    let stamp = stamp.split(BYLINE_EDIT_SEPARATOR).next()?.trim();

    let naive = NaiveDateTime::parse_from_str(stamp, BYLINE_DATETIME_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(stamp, BYLINE_DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    FixedOffset::east_opt(SITE_UTC_OFFSET_SECS)?
        .from_local_datetime(&naive)
        .single()
}

/// Entry id from an `li` id attribute, or `None` when nothing is left after
/// dropping the `d` prefix.
pub fn entry_id(raw: &str) -> Option<&str> {
    let id = raw.strip_prefix(ENTRY_ID_PREFIX).unwrap_or(raw);
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://sozluk.sourtimes.org";

    const ENTRY_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>linux - ekşi sözlük</title>
  <script>var tracking = "<li id='d999'>fake</li>";</script>
</head>
<body>
  <h1 class="title">*linux*</h1>
  <ol>
    <li id="d101">
      ilk entry <a href="/show.asp?t=unix">unix</a>
      <div class="aul">(<a href="/info.asp?n=ssg">ssg</a>, 12.01.2020 10:00)<table><tr><td>vote</td></tr></table></div>
    </li>
    <li id="d">
      reklam
      <div class="aul">(nobody)</div>
    </li>
    <li id="d102">
      ikinci entry <a href="http://other.example/x">dis link</a>
      <script>alert(1)</script>
      <div class="aul">(kullanici, 13.01.2020)</div>
    </li>
    <li>
      no id at all
    </li>
    <li id="d103">
      ucuncu entry
      <div class="aul">()</div>
    </li>
  </ol>
</body>
</html>"#;

    fn extract(html: &str) -> ExtractedPage {
        Extractor::new(BASE).extract(html).unwrap()
    }

    #[test]
    fn test_channel_title_strips_asterisks() {
        assert_eq!(extract(ENTRY_PAGE).title, "linux");
        assert_eq!(clean_channel_title("*Example*"), "Example");
    }

    #[test]
    fn test_item_title_strips_parentheses() {
        assert_eq!(clean_item_title("(12 Jan 2020)"), "12 Jan 2020");
    }

    #[test]
    fn test_only_items_with_ids_are_emitted() {
        let page = extract(ENTRY_PAGE);
        let links: Vec<&str> = page.items.iter().map(|i| i.link.as_str()).collect();
        assert_eq!(
            links,
            vec![
                "http://sozluk.sourtimes.org/show.asp?id=101",
                "http://sozluk.sourtimes.org/show.asp?id=102",
                "http://sozluk.sourtimes.org/show.asp?id=103",
            ]
        );
    }

    #[test]
    fn test_item_title_comes_from_byline_without_table() {
        let page = extract(ENTRY_PAGE);
        assert_eq!(page.items[0].title, "ssg, 12.01.2020 10:00");
        assert_eq!(page.items[1].title, "kullanici, 13.01.2020");
    }

    #[test]
    fn test_empty_item_title_is_still_emitted() {
        let page = extract(ENTRY_PAGE);
        assert_eq!(page.items[2].title, "");
        assert!(page.items[2].body_html.contains("ucuncu entry"));
    }

    #[test]
    fn test_body_excludes_byline_and_scripts() {
        let page = extract(ENTRY_PAGE);
        for item in &page.items {
            assert!(!item.body_html.contains("aul"));
            assert!(!item.body_html.contains("<script"));
            assert!(!item.body_html.contains("vote"));
        }
        assert!(!page.items[1].body_html.contains("alert"));
    }

    #[test]
    fn test_relative_links_made_absolute() {
        let page = extract(ENTRY_PAGE);
        assert!(page.items[0]
            .body_html
            .contains(r#"href="http://sozluk.sourtimes.org/show.asp?t=unix""#));
        assert!(page.items[1]
            .body_html
            .contains(r#"href="http://other.example/x""#));
    }

    #[test]
    fn test_missing_heading_is_parse_error() {
        let err = Extractor::new(BASE)
            .extract("<html><body><ol><li id='d1'>x</li></ol></body></html>")
            .unwrap_err();
        assert!(matches!(err, EksiError::Parse(_)));
    }

    #[test]
    fn test_page_without_entries() {
        let page = extract(r#"<h1 class="title">bos</h1><p>no entries</p>"#);
        assert_eq!(page.title, "bos");
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_entry_date_from_byline() {
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();

        assert_eq!(
            entry_date("ssg, 12.01.2020 10:00"),
            Some(tz.with_ymd_and_hms(2020, 1, 12, 10, 0, 0).unwrap())
        );
        assert_eq!(
            entry_date("kullanici, 13.01.2020"),
            Some(tz.with_ymd_and_hms(2020, 1, 13, 0, 0, 0).unwrap())
        );
        assert_eq!(
            entry_date("ssg, 12.01.2020 10:00 ~ 14:30"),
            Some(tz.with_ymd_and_hms(2020, 1, 12, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_entry_date_unparseable() {
        assert_eq!(entry_date(""), None);
        assert_eq!(entry_date("nobody"), None);
        assert_eq!(entry_date("ssg, dun aksam"), None);
        assert_eq!(entry_date("ssg, 32.13.2020 25:00"), None);
    }

    #[test]
    fn test_extracted_items_carry_dates() {
        let page = extract(ENTRY_PAGE);
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();

        assert_eq!(
            page.items[0].published,
            Some(tz.with_ymd_and_hms(2020, 1, 12, 10, 0, 0).unwrap())
        );
        assert!(page.items[1].published.is_some());
        assert_eq!(page.items[2].published, None);
    }

    #[test]
    fn test_entry_id_prefix() {
        assert_eq!(entry_id("d12345"), Some("12345"));
        assert_eq!(entry_id("d"), None);
        assert_eq!(entry_id(""), None);
        assert_eq!(entry_id("777"), Some("777"));
    }
}

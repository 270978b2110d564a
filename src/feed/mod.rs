//! RSS 2.0 document assembly.
//!
//! Every document starts from the same channel template with no items.
//! Items are prepended, so adding entries in page order yields a feed whose
//! first item is the last entry on the page.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use html_escape::encode_text;

use crate::config::DEFAULT_SITE_NAME;
use crate::domain::ExtractedItem;

/// Content type the serialized document is served with.
pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

const GENERATOR: &str = concat!("eksirss/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq)]
pub struct FeedDocument {
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    pub language: String,
    pub last_build_date: DateTime<Utc>,
    items: VecDeque<ExtractedItem>,
}

impl FeedDocument {
    /// Insert `item` as the first item of the channel.
    pub fn add_item(&mut self, item: ExtractedItem) {
        self.items.push_front(item);
    }

    pub fn items(&self) -> impl Iterator<Item = &ExtractedItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render the document as UTF-8 XML.
    pub fn serialize(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for FeedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(f, r#"<rss version="2.0">"#)?;
        writeln!(f, "  <channel>")?;
        writeln!(f, "    <title>{}</title>", xml_text(&self.title))?;
        if let Some(link) = &self.link {
            writeln!(f, "    <link>{}</link>", xml_text(link))?;
        }
        writeln!(
            f,
            "    <description>{}</description>",
            xml_text(&self.description)
        )?;
        writeln!(f, "    <language>{}</language>", xml_text(&self.language))?;
        writeln!(
            f,
            "    <lastBuildDate>{}</lastBuildDate>",
            self.last_build_date.to_rfc2822()
        )?;
        writeln!(f, "    <generator>{}</generator>", GENERATOR)?;

        for item in &self.items {
            writeln!(f, "    <item>")?;
            writeln!(f, "      <title>{}</title>", xml_text(&item.title))?;
            writeln!(
                f,
                "      <description>{}</description>",
                xml_text(&item.body_html)
            )?;
            writeln!(f, "      <link>{}</link>", xml_text(&item.link))?;
            writeln!(
                f,
                r#"      <guid isPermaLink="false">{}</guid>"#,
                xml_text(&item.link)
            )?;
            if let Some(published) = &item.published {
                writeln!(f, "      <pubDate>{}</pubDate>", published.to_rfc2822())?;
            }
            writeln!(f, "    </item>")?;
        }

        writeln!(f, "  </channel>")?;
        writeln!(f, "</rss>")
    }
}

/// Whether `c` may appear in an XML 1.0 document (the `Char` production).
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}'
            | '\u{A}'
            | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Escape `raw` for XML character data, dropping characters XML 1.0 forbids.
fn xml_text(raw: &str) -> Cow<'_, str> {
    if raw.chars().all(is_xml_char) {
        encode_text(raw)
    } else {
        let cleaned: String = raw.chars().filter(|&c| is_xml_char(c)).collect();
        Cow::Owned(encode_text(&cleaned).into_owned())
    }
}

#[derive(Debug, Clone)]
pub struct FeedBuilder {
    site_name: String,
    language: String,
}

impl Default for FeedBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_SITE_NAME)
    }
}

impl FeedBuilder {
    pub fn new(site_name: &str) -> Self {
        Self {
            site_name: site_name.to_string(),
            language: "tr".to_string(),
        }
    }

    /// Empty channel for `channel_title`, built now.
    pub fn build(&self, channel_title: &str) -> FeedDocument {
        self.build_at(channel_title, Utc::now())
    }

    pub fn build_at(&self, channel_title: &str, now: DateTime<Utc>) -> FeedDocument {
        FeedDocument {
            title: channel_title.to_string(),
            description: format!("{} on {}", channel_title, self.site_name),
            link: None,
            language: self.language.clone(),
            last_build_date: now,
            items: VecDeque::new(),
        }
    }

    /// Channel populated with `items`, given in page order.
    pub fn build_with_items(
        &self,
        channel_title: &str,
        items: impl IntoIterator<Item = ExtractedItem>,
    ) -> FeedDocument {
        let mut doc = self.build(channel_title);
        for item in items {
            doc.add_item(item);
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn item(id: u32) -> ExtractedItem {
        ExtractedItem::new(
            format!("yazar {}", id),
            format!(r#"entry <a href="http://x/show.asp?t=a&amp;b">{}</a>"#, id),
            format!("http://sozluk.sourtimes.org/show.asp?id={}", id),
        )
    }

    fn istanbul() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).unwrap()
    }

    fn sample() -> FeedDocument {
        let builder = FeedBuilder::new("Ekşi Sözlük");
        let now = Utc.with_ymd_and_hms(2020, 1, 12, 10, 30, 0).unwrap();
        let mut doc = builder.build_at("linux", now);
        doc.link = Some("http://sozluk.sourtimes.org/show.asp?t=linux&i=900090020".into());
        for id in [1, 2, 3] {
            doc.add_item(item(id));
        }
        let dated = item(4).with_published(Some(
            istanbul().with_ymd_and_hms(2020, 1, 12, 10, 0, 0).unwrap(),
        ));
        doc.add_item(dated);
        doc
    }

    #[test]
    fn test_build_sets_channel_fields() {
        let doc = FeedBuilder::default().build("linux");
        assert_eq!(doc.title, "linux");
        assert_eq!(doc.description, "linux on Ekşi Sözlük");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_items_are_prepended() {
        let doc = sample();
        let links: Vec<&str> = doc.items().map(|i| i.link.as_str()).collect();
        assert_eq!(
            links,
            vec![
                "http://sozluk.sourtimes.org/show.asp?id=4",
                "http://sozluk.sourtimes.org/show.asp?id=3",
                "http://sozluk.sourtimes.org/show.asp?id=2",
                "http://sozluk.sourtimes.org/show.asp?id=1",
            ]
        );
    }

    #[test]
    fn test_serialized_item_count() {
        let xml = String::from_utf8(sample().serialize()).unwrap();
        assert_eq!(xml.matches("<item>").count(), 4);
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    }

    #[test]
    fn test_last_build_date_is_rfc822() {
        let xml = String::from_utf8(sample().serialize()).unwrap();
        assert!(xml.contains("<lastBuildDate>Sun, 12 Jan 2020 10:30:00 +0000</lastBuildDate>"));
    }

    #[test]
    fn test_body_is_escaped() {
        let xml = String::from_utf8(sample().serialize()).unwrap();
        assert!(xml.contains("entry &lt;a href=\"http://x/show.asp?t=a&amp;amp;b\"&gt;3&lt;/a&gt;"));
        assert!(xml.contains("show.asp?t=linux&amp;i=900090020"));
    }

    #[test]
    fn test_round_trip_through_feed_parser() {
        let doc = sample();
        let parsed = feed_rs::parser::parse(doc.serialize().as_slice()).unwrap();

        assert_eq!(parsed.title.unwrap().content, "linux");
        assert_eq!(parsed.description.unwrap().content, "linux on Ekşi Sözlük");
        assert_eq!(parsed.updated, Some(doc.last_build_date));

        assert_eq!(parsed.entries.len(), 4);
        for (entry, expected) in parsed.entries.iter().zip(doc.items()) {
            assert_eq!(entry.title.as_ref().unwrap().content, expected.title);
            assert_eq!(entry.summary.as_ref().unwrap().content, expected.body_html);
            assert_eq!(entry.links[0].href, expected.link);
            assert_eq!(
                entry.published,
                expected.published.map(|p| p.with_timezone(&Utc))
            );
        }
    }

    #[test]
    fn test_pub_date_only_for_dated_items() {
        let xml = String::from_utf8(sample().serialize()).unwrap();
        assert_eq!(xml.matches("<pubDate>").count(), 1);
        assert!(xml.contains("<pubDate>Sun, 12 Jan 2020 10:00:00 +0300</pubDate>"));
    }

    #[test]
    fn test_forbidden_xml_chars_are_dropped() {
        let mut doc = FeedBuilder::default().build("li\u{0}nux");
        doc.add_item(ExtractedItem::new(
            "a\u{8}b",
            "bad \u{1} char\u{B}\u{FFFE}\ttab",
            "http://sozluk.sourtimes.org/show.asp?id=1",
        ));

        let xml = String::from_utf8(doc.serialize()).unwrap();

        assert!(xml.chars().all(is_xml_char));
        assert!(xml.contains("<title>linux</title>"));
        assert!(xml.contains("<title>ab</title>"));
        assert!(xml.contains("<description>bad  char\ttab</description>"));

        let parsed = feed_rs::parser::parse(xml.as_bytes()).unwrap();
        assert_eq!(parsed.entries[0].title.as_ref().unwrap().content, "ab");
    }

    #[test]
    fn test_extracted_page_with_control_chars_serializes_cleanly() {
        let html = concat!(
            r#"<h1 class="title">x</h1>"#,
            r#"<ol><li id="d1">bad "#,
            "\u{1}",
            r#" char<div class="aul">(a"#,
            "\u{8}",
            r#"b)</div></li></ol>"#,
        );
        let page = crate::extractor::Extractor::new("http://sozluk.sourtimes.org")
            .extract(html)
            .unwrap();
        let doc = FeedBuilder::default().build_with_items(&page.title, page.items);

        let xml = String::from_utf8(doc.serialize()).unwrap();

        assert!(xml.chars().all(is_xml_char));
        assert!(xml.contains("<title>ab</title>"));
    }
}

use chrono::{DateTime, FixedOffset};

/// One dictionary entry scraped from an entry page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedItem {
    /// Author and date line of the entry, parentheses removed
    pub title: String,
    /// Remaining inner HTML of the entry, unescaped
    pub body_html: String,
    /// Absolute permalink of the entry
    pub link: String,
    /// Time the entry was written, when the byline carries one
    pub published: Option<DateTime<FixedOffset>>,
}

impl ExtractedItem {
    pub fn new(
        title: impl Into<String>,
        body_html: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body_html: body_html.into(),
            link: link.into(),
            published: None,
        }
    }

    pub fn with_published(mut self, published: Option<DateTime<FixedOffset>>) -> Self {
        self.published = published;
        self
    }
}

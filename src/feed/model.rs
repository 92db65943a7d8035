use serde::{Deserialize, Serialize};

/// One qualifying news item. Every field is present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub source_domain: String,
    pub source_title: String,
    /// Publication date exactly as the feed wrote it.
    pub published: String,
}

impl Article {
    pub fn from_item(item: &rss::Item) -> Option<Self> {
        let source = item.source()?;
        Some(Article {
            title: non_empty(item.title())?,
            link: non_empty(item.link())?,
            source_domain: non_empty(Some(source.url()))?,
            source_title: non_empty(source.title())?,
            published: non_empty(item.pub_date())?,
        })
    }
}

fn non_empty(field: Option<&str>) -> Option<String> {
    field.filter(|s| !s.is_empty()).map(str::to_owned)
}

//! Post model and the typed editor input used to save posts

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Date used when a post carries none
fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Parse the calendar date out of an ISO 8601 date or datetime
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(datetime.date());
    }
    // e.g. "2024-01-15 10:30"
    text.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Lenient `date` field: full datetimes keep their date part, blank or
/// unreadable values fall back to the default date.
fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    if text.trim().is_empty() {
        return Ok(epoch());
    }
    Ok(parse_iso_date(&text).unwrap_or_else(|| {
        tracing::warn!("Unreadable post date {:?}, using {}", text, epoch());
        epoch()
    }))
}

/// Publication state of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    /// Position-derived identifier, dense over `1..=len`
    pub id: u64,

    /// URL-safe name, unique among posts when non-empty
    pub slug: String,

    /// Post title
    pub title: String,

    /// Short summary shown in listings
    pub excerpt: String,

    /// Full body
    pub content: String,

    /// Author display name
    pub author: String,

    /// Category name
    pub category: String,

    /// Publication date
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,

    /// Post tags, in author order
    pub tags: Vec<String>,

    /// Cover image URL
    pub image: Option<String>,

    /// Whether the post is promoted to the featured slot
    pub featured: bool,

    pub status: PostStatus,

    /// Read counter
    pub views: u64,

    /// Comment counter
    pub comments: u64,
}

impl Default for Post {
    fn default() -> Self {
        Self {
            id: 0,
            slug: String::new(),
            title: String::new(),
            excerpt: String::new(),
            content: String::new(),
            author: String::new(),
            category: String::new(),
            date: epoch(),
            tags: Vec::new(),
            image: None,
            featured: false,
            status: PostStatus::Draft,
            views: 0,
            comments: 0,
        }
    }
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Case-insensitive match against title, excerpt and tags.
    /// `needle` must already be lower-cased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.excerpt.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// Editor input for [`crate::content::ContentStore::save_post`]
///
/// Every field is optional. When the draft targets an existing post, present
/// fields overwrite the stored values and absent fields keep them. Counters
/// are not part of a draft; they only change through read tracking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostDraft {
    pub id: Option<u64>,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
    /// `Some(None)` removes the stored image
    pub image: Option<Option<String>>,
    pub featured: Option<bool>,
    pub status: Option<PostStatus>,
}

impl PostDraft {
    /// Start a draft for a new post
    pub fn new(title: impl Into<String>, excerpt: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            excerpt: Some(excerpt.into()),
            ..Default::default()
        }
    }

    /// Start a draft that edits the post with `id`
    pub fn edit(id: u64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(Some(image.into()));
        self
    }

    /// Remove the cover image when applied
    pub fn clear_image(mut self) -> Self {
        self.image = Some(None);
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    pub fn status(mut self, status: PostStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn published(self) -> Self {
        self.status(PostStatus::Published)
    }

    /// Overlay the draft onto an existing post, field by field
    pub fn apply_to(self, post: &mut Post) {
        if let Some(slug) = self.slug {
            post.slug = slug;
        }
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(excerpt) = self.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(author) = self.author {
            post.author = author;
        }
        if let Some(category) = self.category {
            post.category = category;
        }
        if let Some(date) = self.date {
            post.date = date;
        }
        if let Some(tags) = self.tags {
            post.tags = tags;
        }
        if let Some(image) = self.image {
            post.image = image;
        }
        if let Some(featured) = self.featured {
            post.featured = featured;
        }
        if let Some(status) = self.status {
            post.status = status;
        }
    }

    /// Materialize a brand new post with `id`.
    /// Missing fields fall back to defaults; the date defaults to today.
    pub fn into_post(self, id: u64, default_author: &str) -> Post {
        let mut post = Post {
            id,
            author: default_author.to_string(),
            date: Local::now().date_naive(),
            ..Default::default()
        };
        self.apply_to(&mut post);
        post.id = id;
        post
    }
}

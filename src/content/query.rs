//! Read-only queries over a post sequence
//!
//! Every function here borrows the posts and preserves store order unless it
//! says otherwise. Only published posts are ever returned.

use serde::Serialize;
use std::collections::HashMap;

use super::Post;

/// Published posts, in store order
pub fn published_posts(posts: &[Post]) -> Vec<&Post> {
    posts.iter().filter(|p| p.is_published()).collect()
}

/// First published post flagged as featured, else the first published post
pub fn featured_post(posts: &[Post]) -> Option<&Post> {
    posts
        .iter()
        .find(|p| p.is_published() && p.featured)
        .or_else(|| posts.iter().find(|p| p.is_published()))
}

/// Published, non-featured posts eligible for the listing grid
fn listing(posts: &[Post]) -> impl Iterator<Item = &Post> {
    posts.iter().filter(|p| p.is_published() && !p.featured)
}

/// The first `page_size` listing posts
pub fn paged_posts(posts: &[Post], page_size: usize) -> Vec<&Post> {
    listing(posts).take(page_size).collect()
}

/// Published posts by views, descending. Ties keep store order.
pub fn popular_posts(posts: &[Post], n: usize) -> Vec<&Post> {
    let mut ranked = published_posts(posts);
    // sort_by is stable
    ranked.sort_by(|a, b| b.views.cmp(&a.views));
    ranked.truncate(n);
    ranked
}

/// Published posts whose title, excerpt or any tag contains `query`,
/// ignoring case
pub fn search_posts<'a>(posts: &'a [Post], query: &str) -> Vec<&'a Post> {
    let needle = query.to_lowercase();
    posts
        .iter()
        .filter(|p| p.is_published() && p.matches(&needle))
        .collect()
}

/// Published posts in exactly `category`
pub fn posts_by_category<'a>(posts: &'a [Post], category: &str) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|p| p.is_published() && p.category == category)
        .collect()
}

/// One page of the listing sequence
#[derive(Debug, Clone, Serialize)]
pub struct Page<'a> {
    pub posts: Vec<&'a Post>,
    pub page: usize,
    pub total_pages: usize,
    pub has_next: bool,
}

/// 1-based pagination over the same sequence as [`paged_posts`].
/// Page 0 is treated as page 1; a zero page size yields empty pages.
pub fn paginate(posts: &[Post], page: usize, page_size: usize) -> Page<'_> {
    let page = page.max(1);
    let total = listing(posts).count();
    let total_pages = if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    };

    let posts = if page_size == 0 {
        Vec::new()
    } else {
        listing(posts)
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect()
    };

    Page {
        posts,
        page,
        total_pages,
        has_next: page < total_pages,
    }
}

/// Category name with its published post count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// Published post counts per category, most populated first, then by name
pub fn category_counts(posts: &[Post]) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for post in posts.iter().filter(|p| p.is_published()) {
        if !post.category.is_empty() {
            *counts.entry(post.category.as_str()).or_insert(0) += 1;
        }
    }

    let mut sorted: Vec<_> = counts
        .into_iter()
        .map(|(name, count)| CategoryCount {
            name: name.to_string(),
            count,
        })
        .collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostStatus;

    fn post(id: u64, views: u64, published: bool) -> Post {
        Post {
            id,
            title: format!("Post {}", id),
            excerpt: "excerpt".to_string(),
            views,
            status: if published {
                PostStatus::Published
            } else {
                PostStatus::Draft
            },
            ..Default::default()
        }
    }

    fn ids(posts: &[&Post]) -> Vec<u64> {
        posts.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_published_filters_drafts() {
        let posts = vec![post(1, 0, true), post(2, 0, false), post(3, 0, true)];
        assert_eq!(ids(&published_posts(&posts)), vec![1, 3]);
    }

    #[test]
    fn test_featured_prefers_flag() {
        let mut posts = vec![post(1, 0, true), post(2, 0, true), post(3, 0, true)];
        posts[2].featured = true;
        assert_eq!(featured_post(&posts).map(|p| p.id), Some(3));
    }

    #[test]
    fn test_featured_falls_back_to_first_published() {
        let mut posts = vec![post(1, 0, false), post(2, 0, true)];
        // featured drafts never win
        posts[0].featured = true;
        assert_eq!(featured_post(&posts).map(|p| p.id), Some(2));
        assert!(featured_post(&[post(1, 0, false)]).is_none());
    }

    #[test]
    fn test_paged_skips_featured_and_drafts() {
        let mut posts = vec![
            post(1, 0, true),
            post(2, 0, true),
            post(3, 0, false),
            post(4, 0, true),
            post(5, 0, true),
        ];
        posts[0].featured = true;
        assert_eq!(ids(&paged_posts(&posts, 2)), vec![2, 4]);
        assert_eq!(ids(&paged_posts(&posts, 10)), vec![2, 4, 5]);
    }

    #[test]
    fn test_popular_is_stable() {
        let posts = vec![
            post(1, 5, true),
            post(2, 50, true),
            post(3, 5, true),
            post(4, 20, true),
        ];
        let top = popular_posts(&posts, 3);
        assert_eq!(top.iter().map(|p| p.views).collect::<Vec<_>>(), vec![50, 20, 5]);
        assert_eq!(ids(&top), vec![2, 4, 1]);
        assert_eq!(ids(&popular_posts(&posts, 4)), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_popular_ignores_drafts() {
        let posts = vec![post(1, 5, true), post(2, 500, false)];
        assert_eq!(ids(&popular_posts(&posts, 5)), vec![1]);
    }

    #[test]
    fn test_search_title_excerpt_and_tags() {
        let mut posts = vec![post(1, 0, true), post(2, 0, true), post(3, 0, true), post(4, 0, false)];
        posts[0].title = "Sprinkler Hydraulics".to_string();
        posts[1].excerpt = "Using the SPRINKLER calculator".to_string();
        posts[2].tags = vec!["fire".to_string(), "sprinklers".to_string()];
        posts[3].title = "Sprinkler draft".to_string();
        assert_eq!(ids(&search_posts(&posts, "sprinkler")), vec![1, 2, 3]);
        assert!(search_posts(&posts, "smoke").is_empty());
    }

    #[test]
    fn test_category_exact_match() {
        let mut posts = vec![post(1, 0, true), post(2, 0, true), post(3, 0, false)];
        posts[0].category = "Egress".to_string();
        posts[1].category = "egress".to_string();
        posts[2].category = "Egress".to_string();
        assert_eq!(ids(&posts_by_category(&posts, "Egress")), vec![1]);
    }

    #[test]
    fn test_paginate_pages() {
        let posts: Vec<_> = (1..=5).map(|id| post(id, 0, true)).collect();
        let first = paginate(&posts, 0, 2);
        assert_eq!(first.page, 1);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next);
        assert_eq!(ids(&first.posts), vec![1, 2]);

        let last = paginate(&posts, 3, 2);
        assert_eq!(ids(&last.posts), vec![5]);
        assert!(!last.has_next);

        assert!(paginate(&posts, 9, 2).posts.is_empty());
        assert_eq!(paginate(&posts, 1, 0).total_pages, 0);
    }

    #[test]
    fn test_category_counts_sorted() {
        let mut posts = vec![post(1, 0, true), post(2, 0, true), post(3, 0, true), post(4, 0, false)];
        posts[0].category = "Smoke".to_string();
        posts[1].category = "Egress".to_string();
        posts[2].category = "Smoke".to_string();
        posts[3].category = "Egress".to_string();
        let counts = category_counts(&posts);
        assert_eq!(
            counts,
            vec![
                CategoryCount { name: "Smoke".to_string(), count: 2 },
                CategoryCount { name: "Egress".to_string(), count: 1 },
            ]
        );
    }
}

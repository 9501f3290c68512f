//! List site content

use anyhow::Result;

use crate::content::Post;
use crate::helpers::format_date;
use crate::BlogCms;

/// List site content by type
pub fn run(cms: &BlogCms, content_type: &str, limit: usize) -> Result<()> {
    let store = cms.open_store()?;
    let date_format = &cms.config.date_format;

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", store.posts().len());
            for post in store.posts() {
                print_post(post, date_format);
            }
        }
        "published" => {
            let posts = store.published_posts();
            println!("Published ({}):", posts.len());
            for post in posts {
                print_post(post, date_format);
            }
        }
        "popular" => {
            println!("Most viewed:");
            for post in store.popular_posts(limit) {
                println!("  {:>6} views  {} [{}]", post.views, post.title, post.slug);
            }
        }
        "category" | "categories" => {
            let counts = store.category_counts();
            println!("Categories ({}):", store.categories().len());
            for name in store.categories() {
                let count = counts
                    .iter()
                    .find(|c| &c.name == name)
                    .map(|c| c.count)
                    .unwrap_or(0);
                println!("  {} ({})", name, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, published, popular, categories",
                content_type
            );
        }
    }

    Ok(())
}

/// Print published posts matching `query`
pub fn search(cms: &BlogCms, query: &str) -> Result<()> {
    let store = cms.open_store()?;
    let posts = store.search_posts(query);
    println!("Matches for {:?} ({}):", query, posts.len());
    for post in posts {
        print_post(post, &cms.config.date_format);
    }
    Ok(())
}

/// Print published posts in `category`
pub fn category(cms: &BlogCms, category: &str) -> Result<()> {
    let store = cms.open_store()?;
    let posts = store.posts_by_category(category);
    println!("{} ({}):", category, posts.len());
    for post in posts {
        print_post(post, &cms.config.date_format);
    }
    Ok(())
}

fn print_post(post: &Post, date_format: &str) {
    let flag = if post.featured { "*" } else { " " };
    println!(
        "{} {:>3}  {} - {} [{}] ({:?})",
        flag,
        post.id,
        format_date(&post.date, date_format),
        post.title,
        post.slug,
        post.status
    );
}

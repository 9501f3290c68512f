//! CLI entry point for blogcms

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blogcms_rs::content::{PostDraft, PostStatus};
use blogcms_rs::BlogCms;

#[derive(Parser)]
#[command(name = "blogcms")]
#[command(version)]
#[command(about = "Manage the posts of a JSON-backed blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Post fields shared by `new` and `edit`
#[derive(Args, Default)]
struct PostFields {
    /// Short summary shown in listings
    #[arg(short, long)]
    excerpt: Option<String>,

    /// Full post body
    #[arg(long)]
    content: Option<String>,

    #[arg(short, long)]
    author: Option<String>,

    #[arg(short = 'C', long)]
    category: Option<String>,

    /// Tag (repeatable)
    #[arg(short, long = "tag")]
    tags: Vec<String>,

    /// Cover image URL
    #[arg(long, conflicts_with = "clear_image")]
    image: Option<String>,

    /// Remove the cover image
    #[arg(long)]
    clear_image: bool,

    /// URL slug (derived from the title when omitted)
    #[arg(long)]
    slug: Option<String>,

    /// Publication date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Promote to the featured slot
    #[arg(long)]
    featured: Option<bool>,

    /// Mark as published
    #[arg(long, conflicts_with = "unpublish")]
    publish: bool,

    /// Move back to draft
    #[arg(long)]
    unpublish: bool,
}

impl PostFields {
    fn into_draft(self, title: Option<String>) -> PostDraft {
        let status = if self.publish {
            Some(PostStatus::Published)
        } else if self.unpublish {
            Some(PostStatus::Draft)
        } else {
            None
        };

        PostDraft {
            id: None,
            slug: self.slug,
            title,
            excerpt: self.excerpt,
            content: self.content,
            author: self.author,
            category: self.category,
            date: self.date,
            tags: if self.tags.is_empty() {
                None
            } else {
                Some(self.tags)
            },
            image: if self.clear_image {
                Some(None)
            } else {
                self.image.map(Some)
            },
            featured: self.featured,
            status,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        #[command(flatten)]
        fields: PostFields,
    },

    /// Edit an existing post
    Edit {
        /// Id of the post to edit
        id: u64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        fields: PostFields,
    },

    /// Delete a post
    Delete {
        /// Id of the post to delete
        id: u64,
    },

    /// List site information
    List {
        /// Type of content to list (posts, published, popular, categories)
        #[arg(default_value = "posts")]
        r#type: String,

        /// Number of entries for `popular`
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Search published posts
    Search {
        query: String,
    },

    /// List published posts in a category
    Category {
        name: String,
    },

    /// Export the content document to a backup file
    Export {
        /// Output file (defaults to backups/blog-backup-<date>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace all content with an exported document
    Import {
        file: PathBuf,
    },

    /// Start the read-only JSON API
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long)]
        ip: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blogcms_rs=debug,blogcms=debug,tower_http=debug,info"
    } else {
        "blogcms_rs=info,blogcms=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            blogcms_rs::commands::init::init_site(&target_dir)?;
            println!("Initialized empty blog in {:?}", target_dir);
        }

        Commands::New { title, fields } => {
            let cms = BlogCms::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let draft = fields.into_draft(Some(title));
            blogcms_rs::commands::new::create_post(&cms, draft)?;
        }

        Commands::Edit { id, title, fields } => {
            let cms = BlogCms::new(&base_dir)?;
            let draft = fields.into_draft(title);
            blogcms_rs::commands::new::edit_post(&cms, id, draft)?;
        }

        Commands::Delete { id } => {
            let cms = BlogCms::new(&base_dir)?;
            blogcms_rs::commands::new::delete_post(&cms, id)?;
        }

        Commands::List { r#type, limit } => {
            let cms = BlogCms::new(&base_dir)?;
            blogcms_rs::commands::list::run(&cms, &r#type, limit)?;
        }

        Commands::Search { query } => {
            let cms = BlogCms::new(&base_dir)?;
            blogcms_rs::commands::list::search(&cms, &query)?;
        }

        Commands::Category { name } => {
            let cms = BlogCms::new(&base_dir)?;
            blogcms_rs::commands::list::category(&cms, &name)?;
        }

        Commands::Export { output } => {
            let cms = BlogCms::new(&base_dir)?;
            blogcms_rs::commands::transfer::export(&cms, output.as_deref())?;
        }

        Commands::Import { file } => {
            let cms = BlogCms::new(&base_dir)?;
            let file = if file.is_absolute() {
                file
            } else {
                base_dir.join(file)
            };
            blogcms_rs::commands::transfer::import(&cms, &file)?;
        }

        Commands::Serve { port, ip } => {
            let cms = BlogCms::new(&base_dir)?;
            let store = cms.open_store()?;
            let ip = ip.unwrap_or_else(|| cms.config.server.ip.clone());
            let port = port.unwrap_or(cms.config.server.port);

            tracing::info!("Starting API at http://{}:{}", ip, port);
            blogcms_rs::server::start(store, &ip, port).await?;
        }
    }

    Ok(())
}

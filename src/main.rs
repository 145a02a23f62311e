use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use lounge::application::{FeedFilter, PostQuery, PreloadFeedImagesUseCase};
use lounge::domain::entities::Post;
use lounge::domain::services::preview_text;
use lounge::infrastructure::{
    AppConfig, CliArgs, HttpImageFetcher, ImagePreloader, StorageManager, load_feed,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let mut config = match (StorageManager::new(), args.config.as_deref()) {
        (Ok(storage), path) => storage.load_config(path)?,
        (Err(_), Some(path)) => {
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            StorageManager::with_dir(dir).load_config(Some(path))?
        }
        (Err(_), None) => AppConfig::default(),
    };

    config.merge_with_args(args);
    Ok(config)
}

fn build_query(args: &CliArgs, config: &AppConfig) -> PostQuery {
    PostQuery {
        tag: args.tag.clone(),
        category: args.category.clone(),
        kind: args.kind.clone(),
        excellent_only: args.excellent,
        search: args.search.clone(),
        sort: config.feed.sort.into(),
    }
}

fn render_post(post: &Post, config: &AppConfig) -> String {
    let badge = if post.is_excellent { "★ " } else { "" };
    let category = post.category.as_deref().unwrap_or("-");

    format!(
        "{badge}{title} [{category}] {date}  ♥ {likes}  ⚑ {scraps}  💬 {comments}\n    {preview}",
        title = post.title,
        date = post.created_at.format(&config.feed.timestamp_format),
        likes = post.like_count,
        scraps = post.scrap_count,
        comments = post.comment_count,
        preview = preview_text(&post.content, config.feed.preview_len),
    )
}

async fn run(args: &CliArgs, config: &AppConfig) -> Result<()> {
    let posts = load_feed(&args.feed)
        .await
        .wrap_err("could not load feed snapshot")?;

    let listed = FeedFilter::new().apply(&posts, &build_query(args, config));
    info!(total = posts.len(), listed = listed.len(), sort = %config.feed.sort, "Feed filtered");

    for post in &listed {
        println!("{}", render_post(post, config));
    }

    if !config.feed.preload_images {
        return Ok(());
    }

    let fetcher = Arc::new(
        HttpImageFetcher::new(&config.http).wrap_err("could not create HTTP client")?,
    );
    let preloader = ImagePreloader::with_config(fetcher, config.preload.clone());

    let outcome = PreloadFeedImagesUseCase::new(preloader.clone())
        .execute(&listed)
        .await;
    let lazy = outcome.lazy.join().await;

    info!(
        critical = outcome.critical.len(),
        lazy = lazy.len(),
        "Image preload finished"
    );
    println!("{}", preloader.stats());

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    init_logging(&config)?;

    info!(version = lounge::VERSION, "Starting lounge");

    run(&args, &config).await
}

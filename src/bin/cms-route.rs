use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use cms_router::config::{load_config, RouterConfig};
use cms_router::routing::{RouteAction, RouteRequest};
use cms_router::sitemap::SitemapGenerator;
use cms_router::store::{Api, MemoryStore};
use cms_router::Resolver;

#[derive(Parser)]
#[command(name = "cms-route")]
#[command(about = "Resolve URLs and render sitemaps against a content file", long_about = None)]
struct Cli {
    /// JSON content file.
    #[arg(long, default_value = "data/content.json")]
    content: PathBuf,

    /// Optional TOML configuration for routing switches and sitemap base URL.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print how a URL resolves, as JSON
    Resolve { url: String },
    /// Print the XML sitemap of the site serving a URL
    Sitemap { url: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    let store = Arc::new(MemoryStore::load_from_file(Path::new(&cli.content))?);
    let api = Api::from_store(store);
    let resolver = Resolver::new(api.clone(), config.routing.clone());

    match cli.command {
        Commands::Resolve { url } => {
            let url = url::Url::parse(&url)?;
            let resolution = resolver.resolve(&RouteRequest::from_url(&url)).await?;
            println!("{}", serde_json::to_string_pretty(&resolution)?);
        }
        Commands::Sitemap { url } => {
            let url = url::Url::parse(&url)?;
            let resolution = resolver.resolve(&RouteRequest::from_url(&url)).await?;
            let Some(context) = resolution.context else {
                eprintln!("Error: no site serves {}", url);
                std::process::exit(1);
            };
            if resolution.action != RouteAction::Sitemap {
                eprintln!("Note: {} is not a sitemap URL, using its site", url);
            }

            let base_url = match &config.sitemap.base_url {
                Some(base) => base.trim_end_matches('/').to_string(),
                None => match &context.site.prefix {
                    Some(prefix) => format!("{}/{}", url.origin().ascii_serialization(), prefix),
                    None => url.origin().ascii_serialization(),
                },
            };

            let generator = SitemapGenerator::new(api.posts.clone(), api.page_types.clone());
            let xml = generator.generate(&context.site.sitemap, &base_url).await?;
            println!("{}", xml);
        }
    }

    Ok(())
}

use std::path::PathBuf;

use blog_sdk::{ArticleInput, BlogClient};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "blog-cli")]
#[command(about = "Command-line client for the blog API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[arg(long, default_value = "/api/posts")]
    api_prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every article
    List,
    /// Show one article
    Show { id: String },
    /// Create an article
    Add(ArticleArgs),
    /// Overwrite an article's fields (image kept unless --image is given)
    Update {
        id: String,
        #[command(flatten)]
        article: ArticleArgs,
    },
    /// Delete an article
    Delete { id: String },
    /// Fetch the relayed top headlines
    News,
}

#[derive(Args)]
struct ArticleArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    subtitle: Option<String>,
    #[arg(long)]
    content: Option<String>,
    #[arg(long)]
    category: Option<String>,
    /// Image file to upload
    #[arg(long)]
    image: Option<PathBuf>,
}

impl ArticleArgs {
    fn input(&self) -> ArticleInput {
        ArticleInput {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            content: self.content.clone(),
            category: self.category.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = BlogClient::with_prefix(&cli.url, &cli.api_prefix);

    match cli.command {
        Commands::List => print_json(&client.list().await?)?,
        Commands::Show { id } => print_json(&client.get(&id).await?)?,
        Commands::Add(article) => {
            let message = client.create(&article.input(), article.image.as_deref()).await?;
            println!("{}", message);
        }
        Commands::Update { id, article } => {
            let message = client
                .update(&id, &article.input(), article.image.as_deref())
                .await?;
            println!("{}", message);
        }
        Commands::Delete { id } => println!("{}", client.delete(&id).await?),
        Commands::News => print_json(&client.top_news().await?)?,
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

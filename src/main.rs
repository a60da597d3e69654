use clap::{Parser, Subcommand};
use cos_client::{CosClient, CosConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cosctl", about = "IBM Cloud Object Storage command line client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all buckets in the service instance
    ListBuckets,
    /// Create a bucket
    CreateBucket { bucket: String },
    /// Upload a local file (key defaults to the file name)
    Upload {
        bucket: String,
        path: PathBuf,
        #[arg(long)]
        key: Option<String>,
    },
    /// Upload text from the command line
    UploadText {
        bucket: String,
        key: String,
        text: String,
    },
    /// Download an object (path defaults to the key's base name)
    Download {
        bucket: String,
        key: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a text object
    Read { bucket: String, key: String },
    /// Print the most recently modified text object in a bucket
    Latest { bucket: String },
    /// List the objects in a bucket
    List { bucket: String },
    /// Delete an object
    Delete { bucket: String, key: String },
    /// Show object metadata without downloading it
    Head { bucket: String, key: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cos_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // A missing credential is fatal here; operation failures below are
    // reported and turned into a non-zero exit instead.
    let config = CosConfig::from_env()?;
    let client = CosClient::new(&config)
        .await
        .map_err(|e| anyhow::anyhow!("client bootstrap failed: {e}"))?;

    let ok = match cli.command {
        Command::ListBuckets => {
            let buckets = client.list_buckets().await;
            for bucket in &buckets {
                match bucket.creation_date {
                    Some(created) => println!("{}\t{}", bucket.name, created),
                    None => println!("{}", bucket.name),
                }
            }
            true
        }
        Command::CreateBucket { bucket } => client.create_bucket(&bucket).await,
        Command::Upload { bucket, path, key } => {
            client.upload_file(&bucket, &path, key.as_deref()).await
        }
        Command::UploadText { bucket, key, text } => {
            client.upload_text(&bucket, &text, &key).await
        }
        Command::Download { bucket, key, out } => {
            client.download_to_path(&bucket, &key, out.as_deref()).await
        }
        Command::Read { bucket, key } => match client.read_text(&bucket, &key).await {
            Some(text) => {
                print!("{text}");
                true
            }
            None => false,
        },
        Command::Latest { bucket } => match client.latest_text_object(&bucket).await {
            Some(text) => {
                print!("{text}");
                true
            }
            None => false,
        },
        Command::List { bucket } => {
            let objects = client.list_objects(&bucket).await;
            for object in &objects {
                let modified = object
                    .last_modified
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string());
                println!("{}\t{}\t{}", object.key, object.size, modified);
            }
            true
        }
        Command::Delete { bucket, key } => client.delete_object(&bucket, &key).await,
        Command::Head { bucket, key } => match client.head_object(&bucket, &key).await {
            Some(info) => {
                let modified = info
                    .last_modified
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "size: {}\nlast-modified: {}\ncontent-type: {}",
                    info.size,
                    modified,
                    info.content_type.as_deref().unwrap_or("unknown")
                );
                true
            }
            None => false,
        },
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

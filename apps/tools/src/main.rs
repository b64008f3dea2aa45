use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use repo_sync::{GitSyncClient, LocalOnlySync, SyncClient, DEFAULT_COMMIT_MESSAGE};
use server_api::SessionController;
use shared::{
    domain::{RatingField, RatingTable},
    protocol::{NoticeLevel, RatingForm},
};
use storage::{FileStore, DEFAULT_DATA_FILE};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "./repo")]
    repo_path: PathBuf,
    #[arg(long, default_value = DEFAULT_DATA_FILE)]
    data_file: String,
    #[arg(long)]
    repo_url: Option<String>,
    /// Keep changes in the local checkout; never pull or push.
    #[arg(long)]
    no_sync: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clone the ratings repository if it is not there yet.
    Checkout,
    /// Print the stored ratings.
    Show,
    /// Append comma-separated ratings, then commit and push.
    Submit {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        beer: String,
        #[arg(long, default_value = "")]
        wine: String,
        #[arg(long, default_value = "")]
        whiskey: String,
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long, default_value = DEFAULT_COMMIT_MESSAGE)]
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    let cli = Cli::parse();

    let store = Arc::new(FileStore::in_repo(&cli.repo_path, &cli.data_file)?);
    let sync: Arc<dyn SyncClient> = if cli.no_sync {
        Arc::new(LocalOnlySync)
    } else {
        Arc::new(GitSyncClient::new(cli.repo_path.clone(), cli.repo_url.clone()))
    };

    match cli.command {
        Command::Checkout => {
            sync.ensure_checkout().await?;
            println!("checkout ready at {}", cli.repo_path.display());
        }
        Command::Show => {
            let session = SessionController::new(store, sync);
            print_table(&session.current_table().await?);
        }
        Command::Submit {
            name,
            beer,
            wine,
            whiskey,
            username,
            message,
        } => {
            let session = SessionController::new(store, sync).with_commit_message(message);
            let report = session
                .submit(&RatingForm {
                    name,
                    beer,
                    wine,
                    whiskey,
                    username,
                })
                .await;

            for notice in &report.notices {
                let tag = match notice.level {
                    NoticeLevel::Success => "ok",
                    NoticeLevel::Info => "info",
                    NoticeLevel::Warning => "warning",
                    NoticeLevel::Error => "error",
                };
                eprintln!("{tag}: {}", notice.message);
            }
            if let Some(err) = report.error() {
                bail!("submission rejected: {err}");
            }
            print_table(&report.table);
        }
    }

    Ok(())
}

fn print_table(table: &RatingTable) {
    if table.is_empty() {
        println!("No data available yet. Add some ratings!");
        return;
    }

    let name_width = table
        .rows()
        .map(|row| row.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(RatingField::Name.key().len());

    println!(
        "{:>4}  {:<name_width$}  {:>4}  {:>4}  {:>7}  {}",
        "",
        RatingField::Name.key(),
        RatingField::Beer.key(),
        RatingField::Wine.key(),
        RatingField::Whiskey.key(),
        RatingField::Username.key(),
    );
    for row in table.rows() {
        println!(
            "{:>4}  {:<name_width$}  {:>4}  {:>4}  {:>7}  {}",
            row.index, row.name, row.beer, row.wine, row.whiskey, row.username,
        );
    }
}

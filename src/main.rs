//! autocommit - CLI entry point.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use autocommit::git::{
    GitClient, check_git_installed, configure_remote, ensure_repository, open_repository,
    pending_changes,
};
use autocommit::summary::{ChangeBatch, SharedBatch, summarize};
use autocommit::watch::{
    CommitCycle, DEFAULT_BRANCH, DEFAULT_INTERVAL_SECS, DEFAULT_REMOTE, Notification,
    NotificationLevel, Notifier, WatchConfig, WatchSession, is_ignored,
};

/// Watch a directory and commit its changes with generated messages.
#[derive(Parser, Debug)]
#[command(name = "autocommit")]
#[command(about = "Watch a directory and commit its changes with generated messages")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watch a directory and commit changes on an interval until Ctrl-C
    Watch(WatchArgs),

    /// Print the commit message for the repository's pending changes
    Message {
        /// Repository root
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Configure the remote that commits are pushed to
    Remote {
        /// Remote URL
        url: String,

        /// Repository root
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Remote name
        #[arg(long = "remote-name", default_value = DEFAULT_REMOTE)]
        remote_name: String,
    },
}

#[derive(Args, Debug)]
struct WatchArgs {
    /// Directory to watch
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Seconds between commits
    #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS)]
    interval: u64,

    /// Branch to commit on and push
    #[arg(long, default_value = DEFAULT_BRANCH)]
    branch: String,

    /// Remote to push to
    #[arg(long = "remote-name", default_value = DEFAULT_REMOTE)]
    remote_name: String,

    /// Configure the remote with this URL before watching
    #[arg(long)]
    remote: Option<String>,

    /// Print notifications as JSON lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "autocommit=debug" } else { "autocommit=info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Command::Watch(args) => run_watch(args).await,
        Command::Message { dir } => run_message(&dir),
        Command::Remote {
            url,
            dir,
            remote_name,
        } => run_remote(&dir, &remote_name, &url),
    }
}

/// Bootstrap the repository and watch until Ctrl-C.
async fn run_watch(args: WatchArgs) -> Result<()> {
    if args.interval == 0 {
        bail!("--interval must be at least 1 second");
    }
    if let Err(e) = check_git_installed() {
        eprintln!("Warning: {}. Commits will work but pushes will fail.", e);
    }

    let root = resolve_root(&args.dir)?;
    let config = WatchConfig {
        root: root.clone(),
        interval: Duration::from_secs(args.interval),
        branch: args.branch,
        remote: args.remote_name,
    };

    let (notifier, mut notifications) = Notifier::channel();
    let json = args.json;
    let printer = tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            print_notification(&notification, json);
        }
    });

    let (repo, bootstrap) = ensure_repository(&root, &config.branch)
        .with_context(|| format!("Git initialization failed in {}", root.display()))?;
    notifier.success(bootstrap.to_string());

    if let Some(url) = &args.remote {
        configure_remote(&repo, &config.remote, url).context("Failed to configure remote")?;
        notifier.success(format!("Remote repository configured: {url}"));
    }
    drop(repo);

    let client = GitClient::new(&root);
    let cycle = Arc::new(CommitCycle::new(
        client.clone(),
        client,
        SharedBatch::new(),
        notifier,
        &config,
    ));
    let session = WatchSession::start(&root, config.interval, cycle)
        .context("Failed to start watching")?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    session.stop().await;
    // The notifier was moved into the session; its last sender is gone now.
    let _ = printer.await;

    Ok(())
}

/// Dry run: describe what is pending in the work tree.
fn run_message(dir: &Path) -> Result<()> {
    let root = resolve_root(dir)?;
    let repo = open_repository(&root).context("Not a git repository")?;

    let batch: ChangeBatch = pending_changes(&repo)
        .context("Failed to read repository status")?
        .into_iter()
        .filter(|(path, _)| !is_ignored(path, &root))
        .collect();

    match summarize(&batch, &GitClient::new(&root)) {
        Some(message) => println!("{}", message),
        None => println!("No pending changes."),
    }

    Ok(())
}

/// Replace the named remote with `url`.
fn run_remote(dir: &Path, name: &str, url: &str) -> Result<()> {
    let root = resolve_root(dir)?;
    let repo = open_repository(&root).context("Not a git repository")?;

    configure_remote(&repo, name, url).context("Failed to configure remote")?;
    println!("✓ Remote repository configured: {} -> {}", name, url);

    Ok(())
}

fn resolve_root(dir: &Path) -> Result<PathBuf> {
    let root = dir
        .canonicalize()
        .with_context(|| format!("Cannot access {}", dir.display()))?;
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }
    Ok(root)
}

fn print_notification(notification: &Notification, json: bool) {
    if json {
        match serde_json::to_string(notification) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("Warning: could not encode notification: {}", e),
        }
        return;
    }

    let marker = match notification.level {
        NotificationLevel::Info => "·",
        NotificationLevel::Success => "✓",
        NotificationLevel::Warning => "!",
        NotificationLevel::Error => "✗",
    };
    println!(
        "[{}] {} {}",
        notification.timestamp.format("%H:%M:%S"),
        marker,
        notification.message
    );
}

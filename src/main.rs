//! CLI entry point for `mailfiler`.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};

use mailfiler::config::{self, Backend, Config};
use mailfiler::model::event::RouteRequest;
use mailfiler::store::{LocalStore, MemoryStore, ObjectStore};
use mailfiler::EmailAttachmentRouter;

#[derive(Parser)]
#[command(
    name = "mailfiler",
    version,
    about = "File emailed course materials into per-course storage folders"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Route the attachments of one email and print the JSON result
    Route {
        /// JSON event file (`{"content": "<base64>"}`); `-` or omitted reads stdin
        #[arg(long, value_name = "FILE", conflicts_with = "eml")]
        event: Option<PathBuf>,

        /// Raw .eml file to route instead of a JSON event
        #[arg(long, value_name = "FILE")]
        eml: Option<PathBuf>,

        /// Destination bucket
        #[arg(long, env = "BUCKET_NAME")]
        bucket: Option<String>,

        /// Storage backend (defaults to `[storage] backend` in the config)
        #[arg(long, value_enum)]
        backend: Option<Backend>,

        /// Root directory of the local object store
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,

        /// Route into memory without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the JSON event for a raw .eml file
    Encode { path: PathBuf },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Commands::Route {
            event,
            eml,
            bucket,
            backend,
            root,
            dry_run,
        } => cmd_route(
            &config,
            event.as_deref(),
            eml.as_deref(),
            bucket.as_deref(),
            backend,
            root,
            dry_run,
        ),
        Commands::Encode { path } => cmd_encode(&path),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
///
/// Stdout is reserved for the JSON result.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = config::log_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "mailfiler.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Route one email and print the response as JSON.
///
/// Error responses are still printed and exit with status 0; only I/O and
/// malformed-event problems fail the command.
fn cmd_route(
    config: &Config,
    event: Option<&Path>,
    eml: Option<&Path>,
    bucket: Option<&str>,
    backend: Option<Backend>,
    root: Option<PathBuf>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let request = match eml {
        Some(path) => RouteRequest::from_raw_email(&read_file(path)?),
        None => read_event(event)?,
    };

    let store: Box<dyn ObjectStore> = if dry_run {
        Box::new(MemoryStore::new())
    } else {
        open_store(config, backend.unwrap_or(config.storage.backend), root)?
    };

    let router =
        EmailAttachmentRouter::with_rules(store, config.bucket(bucket), config.keyword_table());
    tracing::debug!(bucket = router.bucket(), dry_run, "Routing email");

    let response = router.route(&request);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn open_store(
    config: &Config,
    backend: Backend,
    root: Option<PathBuf>,
) -> anyhow::Result<Box<dyn ObjectStore>> {
    match backend {
        Backend::Local => Ok(match root.or_else(|| config.storage.root.clone()) {
            Some(dir) => Box::new(LocalStore::new(dir)),
            None => Box::new(LocalStore::default_location()),
        }),
        #[cfg(feature = "s3")]
        Backend::S3 => {
            let store = mailfiler::store::S3Store::new(&config.storage)
                .context("failed to set up the S3 backend")?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "s3"))]
        Backend::S3 => anyhow::bail!("mailfiler was built without the `s3` feature"),
    }
}

/// Print the JSON event for a raw `.eml` file.
fn cmd_encode(path: &Path) -> anyhow::Result<()> {
    let request = RouteRequest::from_raw_email(&read_file(path)?);
    println!("{}", serde_json::to_string(&request)?);
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "mailfiler", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Read a JSON event from a file, or from stdin for `-` / no path.
fn read_event(path: Option<&Path>) -> anyhow::Result<RouteRequest> {
    let data = match path {
        Some(p) if p != Path::new("-") => read_file(p)?,
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read event from stdin")?;
            buf
        }
    };
    serde_json::from_slice(&data).context("event is not a JSON object with a `content` field")
}

use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use oid_protocol::serialize_json;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

mod http_api;
mod server_security;
mod settings;
mod upload;

use settings::{PathArgs, Settings};

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "oid-remap")]
#[command(about = "Rewrite OID columns of a CSV table through an old-to-new mapping", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// TOML configuration file (defaults to $OID_REMAP_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the remap HTTP API
    ServeHttp(ServeArgs),

    /// Run one remap job over the configured files and print the response
    Run(RunArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address, e.g. 127.0.0.1:8000
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: String,

    /// Allow binding to non-loopback addresses
    #[arg(long)]
    public: bool,

    /// Maximum upload request size in bytes
    #[arg(long)]
    upload_limit_bytes: Option<usize>,

    #[command(flatten)]
    paths: PathArgs,
}

#[derive(Args)]
struct RunArgs {
    /// Pretty-print the response
    #[arg(long)]
    pretty: bool,

    #[command(flatten)]
    paths: PathArgs,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::ServeHttp(args) => {
            settings.apply(&args.paths);
            if let Some(limit) = args.upload_limit_bytes {
                settings.server.upload_limit_bytes = limit;
            }
            serve_http(args, settings).await?;
        }
        Commands::Run(args) => {
            settings.apply(&args.paths);
            run_once(args, settings)?;
        }
    }

    Ok(())
}

fn run_once(args: RunArgs, settings: Settings) -> Result<()> {
    let job = settings.fixed_job();
    let envelope = http_api::envelope_for(job.run(&settings.remap));

    let text = if args.pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serialize_json(&envelope)?
    };
    print_stdout(&text)?;

    if envelope.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

async fn serve_http(args: ServeArgs, settings: Settings) -> Result<()> {
    let plan = server_security::BindPlan::resolve(&args.bind, args.public).await?;

    tokio::fs::create_dir_all(&settings.paths.work_dir)
        .await
        .with_context(|| {
            format!(
                "Cannot create work dir {}",
                settings.paths.work_dir.display()
            )
        })?;

    let state = Arc::new(http_api::HttpState::new(settings));
    let app = http_api::router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    let local_addr = listener.local_addr()?;
    let base_url = format!("http://{local_addr}");

    print_stdout(&format!(
        "Serving remap API: {base_url}{}",
        http_api::FIXED_ROUTE
    ))?;
    print_stdout(&format!(
        "Upload endpoint: {base_url}{}",
        http_api::UPLOAD_ROUTE
    ))?;
    print_stdout(&format!(
        "Catalog endpoint: {base_url}{}",
        http_api::CATALOG_ROUTE
    ))?;
    print_stdout(&format!(
        "Health endpoint: {base_url}{}",
        http_api::HEALTH_ROUTE
    ))?;
    if !plan.exposed().is_empty() {
        print_stdout(&format!(
            "Public bind enabled (--public): {}",
            plan.describe()
        ))?;
    }
    print_stdout(&format!(
        "Try: curl -F mapping=@old_to_new.json -F table=@template.csv {base_url}{}",
        http_api::UPLOAD_ROUTE
    ))?;

    axum::serve(listener, app).await?;
    Ok(())
}

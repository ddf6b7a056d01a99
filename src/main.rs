//! qrmint - QR code and barcode generator CLI and HTTP service.

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use qrmint::cli::{Cli, Command, GenerateArgs, ServeArgs};
use qrmint::config::{self, Config};
use qrmint::context::ServiceContext;
use qrmint::error::AppError;
use qrmint::output::{resolve_output_path, save_png};
use qrmint::params::{validate_size, validate_text};
use qrmint::ports::CodeRequest;
use qrmint::server;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "qrmint=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(AppError::Config)?;
    tracing::debug!(path = %config_path.display(), "configuration loaded");

    let ctx = ServiceContext::new(&config)?;

    match cli.command {
        Command::Generate(args) => generate(&ctx, &config, &args).await,
        Command::Serve(args) => serve(ctx, &config, &args).await,
    }
}

async fn generate(ctx: &ServiceContext, config: &Config, args: &GenerateArgs) -> Result<(), AppError> {
    let text = args.resolve_text()?;
    validate_text(&text).map_err(AppError::InvalidArgument)?;

    let size = args.size.unwrap_or_else(|| ctx.generator.default_size());
    validate_size(size).map_err(AppError::InvalidArgument)?;
    let kind = args.kind.unwrap_or(config.defaults.kind);

    let mut request = CodeRequest { text: text.clone(), symbology: kind, size, icon: None };
    if let Some(icon) = args.icon.as_deref() {
        if kind.supports_icon() {
            request = request.with_icon(load_icon(ctx, icon).await?);
        } else {
            tracing::warn!("--icon is ignored for {kind} output");
        }
    }

    let png = ctx.generate(request).await?;

    let output_path = resolve_output_path(args.output.as_deref(), &text, kind);
    save_png(&png, &output_path)?;
    eprintln!("Saved: {}", output_path.display());
    Ok(())
}

/// Read an icon from an http(s) URL or a local file.
async fn load_icon(ctx: &ServiceContext, source: &str) -> Result<Vec<u8>, AppError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        return ctx.icons.fetch(source).await;
    }
    let bytes = tokio::fs::read(source).await?;
    ctx.icons.check_len(bytes.len())?;
    Ok(bytes)
}

async fn serve(ctx: ServiceContext, config: &Config, args: &ServeArgs) -> Result<(), AppError> {
    let host = args.host.as_deref().unwrap_or(&config.server.host);
    let port = match args.port {
        Some(port) => port,
        None => config.port().map_err(AppError::Config)?,
    };
    tracing::info!(
        default_size = ctx.generator.default_size(),
        max_icon_bytes = ctx.icons.max_bytes(),
        "starting qrmint server"
    );
    server::start_server(ctx, &format!("{host}:{port}")).await
}

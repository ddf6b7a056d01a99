//! CLI argument parsing with clap.

use clap::{Args, Parser, Subcommand};

use crate::params::Symbology;

/// QR code and Code 128 barcode PNG generator.
#[derive(Parser, Debug)]
#[command(name = "qrmint", version, about)]
pub struct Cli {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a code to a PNG file.
    Generate(GenerateArgs),
    /// Run the HTTP service.
    Serve(ServeArgs),
}

/// Arguments for `qrmint generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Text or URL to encode.
    #[arg(conflicts_with = "text_file")]
    pub text: Option<String>,

    /// Path to a file containing the text to encode.
    #[arg(short = 't', long, conflicts_with = "text")]
    pub text_file: Option<String>,

    /// Symbology to render (defaults to the configured kind).
    #[arg(short, long, value_enum)]
    pub kind: Option<Symbology>,

    /// Pixel size, 64-2048 (defaults to the configured size).
    #[arg(short, long)]
    pub size: Option<u32>,

    /// Centre icon for QR codes: a file path or an http(s) URL.
    #[arg(short, long)]
    pub icon: Option<String>,

    /// Output file path (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<String>,
}

impl GenerateArgs {
    /// Resolve the text from either the positional argument or the file flag.
    ///
    /// A single trailing line ending in the file is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if neither text nor text-file is provided,
    /// or if the file cannot be read.
    pub fn resolve_text(&self) -> Result<String, std::io::Error> {
        if let Some(ref text) = self.text {
            Ok(text.clone())
        } else if let Some(ref path) = self.text_file {
            let mut text = std::fs::read_to_string(path)?;
            if text.ends_with('\n') {
                text.pop();
                if text.ends_with('\r') {
                    text.pop();
                }
            }
            Ok(text)
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Provide the text to encode or use -t/--text-file",
            ))
        }
    }
}

/// Arguments for `qrmint serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Interface to bind (overrides config).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config and `PORT`).
    #[arg(short, long)]
    pub port: Option<u16>,
}

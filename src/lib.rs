//! qrmint - QR code and Code 128 barcode PNG generation.
//!
//! The core is [`codegen::ImageCodeGenerator`]: text, an optional centre icon
//! and a pixel size go in, PNG bytes come out. The `server` and `cli`
//! modules are thin transports that validate input and call it through the
//! [`ports::CodeGenerator`] trait.

pub mod adapters;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod context;
pub mod error;
pub mod output;
pub mod params;
pub mod ports;
pub mod server;

pub use codegen::ImageCodeGenerator;
pub use error::{AppError, CodeError};
pub use params::Symbology;
pub use ports::{CodeGenerator, CodeRequest};

//! Port traits defining the boundary between transports and the core.
//!
//! The HTTP and CLI adapters only talk to the generator through these traits.
//! The implementation lives in `src/codegen/`.

pub mod code_generator;

pub use code_generator::{CodeGenerator, CodeRequest};

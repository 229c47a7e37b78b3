//! Output handling for the CLI.

pub mod envelope;

pub use envelope::{EntityType, Envelope, Meta, ResultCode, SCHEMA_VERSION, Status};

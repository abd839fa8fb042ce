//! Types shared across the session gateway crates

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;

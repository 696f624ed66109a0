pub mod payload;

mod client;

pub use client::{RelayClient, RelayError};

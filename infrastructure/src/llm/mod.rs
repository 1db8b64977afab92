//! Remote decision source adapters and payload handling

#[cfg(feature = "remote-llm")]
pub mod http;
pub mod payload;

pub mod app;
pub mod client;
pub mod error;
pub mod interface;
pub mod model;
pub mod router;
pub mod schedule;
pub mod session;
pub mod views;

#[cfg(test)]
pub(crate) mod testutil;

#[cfg(feature = "no-wasm")]
pub use tokio;

mod client;
mod control;
mod server;
mod wire;

pub use client::RemoteClient;
pub use server::{DEFAULT_BASE_URL, REQUEST_TIMEOUT};

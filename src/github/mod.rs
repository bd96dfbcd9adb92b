pub mod client;
pub mod errors;
pub mod models;

pub use client::{GitHubClient, DEFAULT_API_URL};
pub use errors::Error;

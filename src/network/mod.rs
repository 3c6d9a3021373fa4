pub mod client;
pub mod worker;

pub use client::{ApiClient, Operation};
pub use worker::ApiWorker;

pub mod auth;
pub mod cli;
pub mod common;
pub mod config;
pub mod error;
pub mod feed;
pub mod network;
pub mod storage;
pub mod ui;

pub use error::{ClientError, ClientResult};

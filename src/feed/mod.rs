pub mod controller;

pub use controller::{FeedController, FeedState};

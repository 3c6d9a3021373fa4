pub mod gate;
pub mod session;

pub use gate::{Route, guard_feed, resolve_root};
pub use session::{MemoryTokenStore, Session, TokenStore};

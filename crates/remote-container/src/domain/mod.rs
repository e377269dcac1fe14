//! Domain Layer
//!
//! Pure logic, no I/O: load states, lookup results, side config sources,
//! cache-busting.

pub mod cache_bust;
pub mod lookup;
pub mod side_config;
pub mod state;

pub use cache_bust::{cache_busted, now_millis, CACHE_BUST_PARAM};
pub use lookup::ModuleLookup;
pub use side_config::SideConfigSource;
pub use state::{LoadOutcome, LoadStatus};
pub(crate) use state::{LoadState, PendingLoad};

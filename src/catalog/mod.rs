//! Composition catalog: cached provider catalog plus the static command
//! and shortcut tables
//!
//! ```text
//!   query ──► priority table (longest key first, substring)
//!               │ miss
//!               ▼
//!             catalog names (fuzzy similarity OR literal prefix/equality)
//!               │ miss
//!               ▼
//!             shortcut table (exact keyword → shabad)
//!               │ miss
//!               ▼
//!             strategy cascade
//! ```

pub mod cache;
pub mod commands;

pub use cache::{CatalogCache, Clock, ManualClock, SystemClock};
pub use commands::{CommandMatch, CommandResolver, CommandSource, Shortcut};

// Handler modules
pub mod input;
pub mod list;
pub mod score;

// Re-export all handler functions
pub use input::collect_sources;
pub use list::handle_list;
pub use score::{ScoreOptions, handle_score};

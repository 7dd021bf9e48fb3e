// Modules
mod frame;

// Re-exports
pub use frame::{Error, Frame, truncate_label};

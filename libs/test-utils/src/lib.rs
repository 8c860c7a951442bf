//! Test helpers shared across promptbox crates.

pub mod auth;
pub mod cookies;
pub mod image;
pub mod prompt;

pub use auth::{session_for, MemoryAuth};
pub use cookies::MemoryCookies;
pub use image::MemoryImageStore;
pub use prompt::MemoryPromptStore;

//! GPU texture registry.

mod cache;

pub use cache::TextureCache;

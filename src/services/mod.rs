pub mod loader;
pub mod recommender;
pub mod sessions;

pub use loader::{ArtifactPaths, Catalog};
pub use recommender::{recommend, Recommender};
pub use sessions::SessionStore;

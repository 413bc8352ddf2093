/// Replacement tracker tests.
pub mod lru;

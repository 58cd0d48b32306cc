pub mod operation;
pub mod transparent_cache;

pub use operation::PriceOperations;
pub use transparent_cache::TransparentCache;

pub mod enrich;
pub mod fallback;
pub mod normalize;
pub mod pipeline;
pub mod rank;
pub mod record;
pub mod sources;

pub use pipeline::{FinderError, ToolFinder};
pub use record::{Candidate, Pricing, ToolRecord};

pub mod error;
pub mod index;
pub mod persist;
pub mod ranking;
pub mod store;
pub mod tokenizer;

pub use error::{IndexError, IndexResult};
pub use index::{DocEntry, Index, IndexStats, DEFAULT_B, DEFAULT_K1};
pub use ranking::{search, SearchHit, SearchOutcome, SearchResponse};
pub use store::IndexStore;

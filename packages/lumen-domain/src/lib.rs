//! Query handling for the search-augmented chat path: deciding whether to search, classifying,
//! enhancing and splitting queries, plus the canned answers used in test mode.

pub mod classify;
pub mod enhance;
pub mod intent;
pub mod split;
pub mod stub;

pub use classify::{DomainTag, classify, recognized_companies};
pub use enhance::{enhance, enhance_query};
pub use intent::{SearchTrigger, needs_search, search_trigger};
pub use split::split;
pub use stub::{chat_stub, search_stub};

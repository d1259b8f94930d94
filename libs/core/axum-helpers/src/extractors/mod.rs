//! Extractors shared by every domain router.

pub mod uuid_path;
pub mod validated_json;
pub mod validated_query;

pub use uuid_path::{UuidPath, UuidPathPair};
pub use validated_json::ValidatedJson;
pub use validated_query::ValidatedQuery;

pub mod error;
pub mod factory;
pub mod flags;
pub mod omdb;
pub mod traits;

pub use error::SourceError;
pub use factory::{create_flag_lookup, create_provider};
pub use flags::FlagLookup;
pub use omdb::OmdbClient;
pub use traits::MetadataProvider;

pub mod metadata;
pub mod movie;
pub mod rating;
pub mod sentinel;
pub mod update;
pub mod user;

pub use metadata::MovieMetadata;
pub use movie::{MovieRecord, NewMovie};
pub use rating::RawRatingEntry;
pub use sentinel::NOT_AVAILABLE;
pub use update::MovieUpdate;
pub use user::UserRecord;

pub mod error;
pub mod fuzzy;
pub mod library;
pub mod query;
pub mod rating;
pub mod site;
pub mod stats;
pub mod store;

pub use error::CoreError;
pub use library::{AddOutcome, LibraryError, MovieLibrary};
pub use query::{HistogramBin, MovieFilter, SortOrder, DEFAULT_HISTOGRAM_BINS, MAX_HISTOGRAM_BINS};
pub use rating::{normalize_entries, normalize_ratings, parse_rating};
pub use site::SiteError;
pub use stats::CollectionStats;
pub use store::{CollectionStore, StoreError};

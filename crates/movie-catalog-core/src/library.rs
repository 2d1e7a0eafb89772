//! The service layer used by every front end: one store, one metadata provider.

use std::sync::Arc;

use movie_catalog_models::{MovieRecord, MovieUpdate, UserRecord};
use movie_catalog_sources::{MetadataProvider, SourceError};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::fuzzy;
use crate::rating::normalize_entries;
use crate::stats::{self, CollectionStats};
use crate::store::{CollectionStore, StoreError};

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Core(#[from] CoreError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "movie", rename_all = "snake_case")]
pub enum AddOutcome {
    Added(MovieRecord),
    /// Title of the movie already in the collection
    AlreadyInCollection(String),
    /// The query the provider had no match for
    NotFound(String),
}

pub struct MovieLibrary {
    store: CollectionStore,
    provider: Arc<dyn MetadataProvider>,
}

impl MovieLibrary {
    pub fn new(store: CollectionStore, provider: Arc<dyn MetadataProvider>) -> Self {
        Self { store, provider }
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    pub fn close(self) -> Result<(), LibraryError> {
        self.store.close()?;
        Ok(())
    }

    fn require_user(&self, user_id: i64) -> Result<UserRecord, LibraryError> {
        self.store
            .get_user(user_id)?
            .ok_or(LibraryError::Store(StoreError::UserNotFound(user_id)))
    }

    /// Look the title up with the provider and add it to the user's collection.
    ///
    /// Takes `&mut self`: the connection is not `Sync` and is held across the fetch.
    pub async fn add_movie(
        &mut self,
        user_id: i64,
        query: &str,
        note: Option<String>,
    ) -> Result<AddOutcome, LibraryError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CoreError::InvalidArgument("movie title must not be empty".to_string()).into());
        }
        self.require_user(user_id)?;

        if let Some(existing) = self.store.find_movie(user_id, query)? {
            return Ok(AddOutcome::AlreadyInCollection(existing.title));
        }

        debug!(provider = self.provider.provider_name(), query, "Fetching movie metadata");
        let Some(metadata) = self.provider.fetch_movie(query).await? else {
            info!(query, "Movie not found");
            return Ok(AddOutcome::NotFound(query.to_string()));
        };

        if let Some(existing) = self.store.find_movie(user_id, &metadata.title)? {
            return Ok(AddOutcome::AlreadyInCollection(existing.title));
        }

        let rating = normalize_entries(&metadata.ratings);
        let movie = self
            .store
            .add_movie(user_id, &metadata.into_new_movie(rating, note))?;
        Ok(AddOutcome::Added(movie))
    }

    /// `None` when the movie is not in the user's collection
    pub fn set_note(
        &self,
        user_id: i64,
        movie_id: i64,
        note: Option<String>,
    ) -> Result<Option<MovieRecord>, LibraryError> {
        let updated = self
            .store
            .update_movie(user_id, movie_id, &MovieUpdate::new().note(note))?;
        Ok(updated)
    }

    pub fn delete_movie(&self, user_id: i64, movie_id: i64) -> Result<bool, LibraryError> {
        Ok(self.store.delete_movie(user_id, movie_id)?)
    }

    pub fn movies(&self, user_id: i64) -> Result<Vec<MovieRecord>, LibraryError> {
        Ok(self.store.list_movies(user_id)?)
    }

    pub fn search(&self, user_id: i64, query: &str) -> Result<Vec<MovieRecord>, LibraryError> {
        let movies = self.store.list_movies(user_id)?;
        Ok(fuzzy::search(&movies, query).into_iter().cloned().collect())
    }

    pub fn statistics(&self, user_id: i64) -> Result<CollectionStats, LibraryError> {
        let movies = self.store.list_movies(user_id)?;
        Ok(stats::summarize(&movies)?)
    }
}

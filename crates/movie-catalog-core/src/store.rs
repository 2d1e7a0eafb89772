//! SQLite-backed persistence for users and their movie collections.

use std::path::Path;

use movie_catalog_models::sentinel::{from_stored, to_stored};
use movie_catalog_models::{MovieRecord, MovieUpdate, NewMovie, UserRecord};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to create database directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("user '{0}' already exists")]
    DuplicateUser(String),
    #[error("'{title}' is already in the collection")]
    DuplicateMovie { title: String },
    #[error("no user with id {0}")]
    UserNotFound(i64),
    #[error("invalid name: {0}")]
    InvalidName(String),
}

const MOVIE_COLUMNS: &str =
    "id, user_id, title, year, rating, note, country, poster_url, imdb_id";

pub struct CollectionStore {
    conn: Connection,
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

fn clean_name(name: &str) -> Result<String, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidName("name must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Identity of a title within a collection: trimmed and Unicode-lowercased
pub fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn movie_from_row(row: &Row<'_>) -> rusqlite::Result<MovieRecord> {
    let note: String = row.get(5)?;
    let poster_url: String = row.get(7)?;
    Ok(MovieRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        year: row.get(3)?,
        rating: row.get(4)?,
        note: from_stored(&note),
        country: row.get(6)?,
        poster_url: from_stored(&poster_url),
        imdb_id: row.get(8)?,
    })
}

impl CollectionStore {
    /// Open (or create) the database file, creating its directory if needed
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!(path = %path.display(), "Opening collection database");
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS movies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                title_key TEXT NOT NULL,
                year INTEGER NOT NULL,
                rating REAL,
                note TEXT NOT NULL DEFAULT 'N/A',
                country TEXT NOT NULL,
                poster_url TEXT NOT NULL DEFAULT 'N/A',
                imdb_id TEXT NOT NULL,
                UNIQUE(user_id, title_key)
            )",
            [],
        )?;
        Ok(())
    }

    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::Sqlite(e))
    }

    // Users

    pub fn list_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    pub fn get_user(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name FROM users WHERE id = ?1",
                params![id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn find_user(&self, name: &str) -> Result<Option<UserRecord>, StoreError> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name FROM users WHERE name = ?1",
                params![name.trim()],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn create_user(&self, name: &str) -> Result<UserRecord, StoreError> {
        let name = clean_name(name)?;
        match self
            .conn
            .execute("INSERT INTO users (name) VALUES (?1)", params![name])
        {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => return Err(StoreError::DuplicateUser(name)),
            Err(e) => return Err(e.into()),
        }

        let id = self.conn.last_insert_rowid();
        info!(user_id = id, name = %name, "Created user");
        Ok(UserRecord { id, name })
    }

    pub fn rename_user(&self, id: i64, new_name: &str) -> Result<Option<UserRecord>, StoreError> {
        let name = clean_name(new_name)?;
        if self.get_user(id)?.is_none() {
            return Ok(None);
        }

        match self.conn.execute(
            "UPDATE users SET name = ?1 WHERE id = ?2",
            params![name, id],
        ) {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => return Err(StoreError::DuplicateUser(name)),
            Err(e) => return Err(e.into()),
        }

        info!(user_id = id, name = %name, "Renamed user");
        Ok(Some(UserRecord { id, name }))
    }

    /// Deletes the user and, through the cascade, all of their movies
    pub fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1", params![id])?;
        if deleted > 0 {
            info!(user_id = id, "Deleted user");
        }
        Ok(deleted > 0)
    }

    // Movies

    pub fn list_movies(&self, user_id: i64) -> Result<Vec<MovieRecord>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM movies WHERE user_id = ?1 ORDER BY id",
            MOVIE_COLUMNS
        ))?;
        let movies = stmt
            .query_map(params![user_id], movie_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(movies)
    }

    pub fn get_movie(&self, user_id: i64, movie_id: i64) -> Result<Option<MovieRecord>, StoreError> {
        let movie = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM movies WHERE user_id = ?1 AND id = ?2",
                    MOVIE_COLUMNS
                ),
                params![user_id, movie_id],
                movie_from_row,
            )
            .optional()?;
        Ok(movie)
    }

    /// Case-insensitive title lookup within one user's collection
    pub fn find_movie(&self, user_id: i64, title: &str) -> Result<Option<MovieRecord>, StoreError> {
        let movie = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM movies WHERE user_id = ?1 AND title_key = ?2",
                    MOVIE_COLUMNS
                ),
                params![user_id, title_key(title)],
                movie_from_row,
            )
            .optional()?;
        Ok(movie)
    }

    pub fn add_movie(&self, user_id: i64, movie: &NewMovie) -> Result<MovieRecord, StoreError> {
        if self.get_user(user_id)?.is_none() {
            return Err(StoreError::UserNotFound(user_id));
        }

        let title = movie.title.trim().to_string();
        let result = self.conn.execute(
            "INSERT INTO movies (user_id, title, title_key, year, rating, note, country, poster_url, imdb_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                user_id,
                title,
                title_key(&title),
                movie.year,
                movie.rating,
                to_stored(movie.note.as_deref()),
                movie.country,
                to_stored(movie.poster_url.as_deref()),
                movie.imdb_id,
            ],
        );
        match result {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => {
                return Err(StoreError::DuplicateMovie { title })
            }
            Err(e) => return Err(e.into()),
        }

        let id = self.conn.last_insert_rowid();
        info!(user_id, movie_id = id, title = %title, "Added movie");
        Ok(MovieRecord {
            id,
            user_id,
            title,
            year: movie.year,
            rating: movie.rating,
            note: from_stored(&to_stored(movie.note.as_deref())),
            country: movie.country.clone(),
            poster_url: from_stored(&to_stored(movie.poster_url.as_deref())),
            imdb_id: movie.imdb_id.clone(),
        })
    }

    /// Apply the set fields of `update`; `None` when the movie does not exist
    pub fn update_movie(
        &self,
        user_id: i64,
        movie_id: i64,
        update: &MovieUpdate,
    ) -> Result<Option<MovieRecord>, StoreError> {
        if self.get_movie(user_id, movie_id)?.is_none() {
            return Ok(None);
        }

        if let Some(note) = &update.note {
            self.conn.execute(
                "UPDATE movies SET note = ?1 WHERE user_id = ?2 AND id = ?3",
                params![to_stored(note.as_deref()), user_id, movie_id],
            )?;
        }
        if let Some(rating) = &update.rating {
            self.conn.execute(
                "UPDATE movies SET rating = ?1 WHERE user_id = ?2 AND id = ?3",
                params![rating, user_id, movie_id],
            )?;
        }

        if !update.is_empty() {
            info!(user_id, movie_id, "Updated movie");
        }
        self.get_movie(user_id, movie_id)
    }

    pub fn delete_movie(&self, user_id: i64, movie_id: i64) -> Result<bool, StoreError> {
        let deleted = self.conn.execute(
            "DELETE FROM movies WHERE user_id = ?1 AND id = ?2",
            params![user_id, movie_id],
        )?;
        if deleted > 0 {
            info!(user_id, movie_id, "Deleted movie");
        }
        Ok(deleted > 0)
    }

    pub fn delete_movie_by_title(&self, user_id: i64, title: &str) -> Result<bool, StoreError> {
        let deleted = self.conn.execute(
            "DELETE FROM movies WHERE user_id = ?1 AND title_key = ?2",
            params![user_id, title_key(title)],
        )?;
        if deleted > 0 {
            info!(user_id, title = title.trim(), "Deleted movie");
        }
        Ok(deleted > 0)
    }
}

use crate::context::AppContext;
use crate::output::Output;
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use movie_catalog_core::site::escape_html;
use movie_catalog_core::{AddOutcome, LibraryError, MovieLibrary, StoreError};
use movie_catalog_models::{MovieRecord, UserRecord};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// One library for all requests; the mutex serializes access to the store
#[derive(Clone)]
struct AppState {
    library: Arc<Mutex<MovieLibrary>>,
}

#[derive(Debug)]
enum WebError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl From<LibraryError> for WebError {
    fn from(e: LibraryError) -> Self {
        match e {
            LibraryError::Store(StoreError::UserNotFound(id)) => {
                WebError::NotFound(format!("No user with id {}", id))
            }
            other => WebError::Internal(other.to_string()),
        }
    }
}

impl From<StoreError> for WebError {
    fn from(e: StoreError) -> Self {
        LibraryError::from(e).into()
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, title, message) = match self {
            WebError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", msg),
            WebError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad request", msg),
            WebError::Internal(msg) => {
                error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong", msg)
            }
        };
        let body = format!(
            "<p>{}</p>\n<p><a href=\"/\">Back to users</a></p>",
            escape_html(&message)
        );
        (status, Html(page(title, &body))).into_response()
    }
}

#[derive(Deserialize)]
struct UserForm {
    name: String,
}

#[derive(Deserialize)]
struct AddMovieForm {
    title: String,
    #[serde(default)]
    note: String,
}

#[derive(Deserialize)]
struct NoteForm {
    #[serde(default)]
    note: String,
}

pub async fn run_serve(bind: Option<String>, ctx: &AppContext, output: &Output) -> Result<()> {
    let bind = bind.unwrap_or_else(|| ctx.config.server.bind.clone());
    let addr: SocketAddr = bind
        .parse()
        .map_err(|_| eyre!("'{}' is not a valid socket address", bind))?;

    let state = AppState {
        library: Arc::new(Mutex::new(ctx.open_library()?)),
    };
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "Web UI listening");
    output.success(format!("Serving on http://{} (Ctrl+C to stop)", addr));

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    info!("Web UI stopped");
    if let Ok(library) = Arc::try_unwrap(state.library) {
        library.into_inner().close()?;
    }
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/users", post(create_user))
        .route("/users/:user_id/movies", get(user_movies).post(add_movie))
        .route("/users/:user_id/movies/:movie_id/update", post(update_movie))
        .route("/users/:user_id/movies/:movie_id/delete", post(delete_movie))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> WebError {
    WebError::NotFound("There is nothing at this address".to_string())
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let library = state.library.lock().await;
    let users = library.store().list_users()?;
    Ok(Html(render_index(&users)))
}

async fn create_user(
    State(state): State<AppState>,
    Form(form): Form<UserForm>,
) -> Result<Redirect, WebError> {
    let library = state.library.lock().await;
    match library.store().create_user(&form.name) {
        Ok(_) => Ok(Redirect::to("/")),
        Err(StoreError::DuplicateUser(name)) => {
            Err(WebError::BadRequest(format!("User '{}' already exists", name)))
        }
        Err(StoreError::InvalidName(reason)) => Err(WebError::BadRequest(reason)),
        Err(e) => Err(e.into()),
    }
}

fn load_user(library: &MovieLibrary, user_id: i64) -> Result<UserRecord, WebError> {
    library
        .store()
        .get_user(user_id)?
        .ok_or_else(|| WebError::NotFound(format!("No user with id {}", user_id)))
}

async fn user_movies(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Html<String>, WebError> {
    let library = state.library.lock().await;
    let user = load_user(&library, user_id)?;
    let movies = library.movies(user.id)?;
    Ok(Html(render_movies(&user, &movies, None)))
}

async fn add_movie(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Form(form): Form<AddMovieForm>,
) -> Result<Response, WebError> {
    let mut library = state.library.lock().await;
    let user = load_user(&library, user_id)?;
    if form.title.trim().is_empty() {
        return Err(WebError::BadRequest("Movie title must not be empty".to_string()));
    }

    let note = Some(form.note.trim().to_string()).filter(|n| !n.is_empty());
    let message = match library.add_movie(user.id, &form.title, note).await? {
        AddOutcome::Added(_) => {
            return Ok(Redirect::to(&format!("/users/{}/movies", user.id)).into_response())
        }
        AddOutcome::AlreadyInCollection(title) => format!("'{}' is already in the collection", title),
        AddOutcome::NotFound(query) => format!("No movie found for '{}'", query),
    };

    let movies = library.movies(user.id)?;
    Ok(Html(render_movies(&user, &movies, Some(&message))).into_response())
}

async fn update_movie(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(i64, i64)>,
    Form(form): Form<NoteForm>,
) -> Result<Redirect, WebError> {
    let library = state.library.lock().await;
    let note = Some(form.note.trim().to_string()).filter(|n| !n.is_empty());
    library
        .set_note(user_id, movie_id, note)?
        .ok_or_else(|| WebError::NotFound(format!("No movie with id {}", movie_id)))?;
    Ok(Redirect::to(&format!("/users/{}/movies", user_id)))
}

async fn delete_movie(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(i64, i64)>,
) -> Result<Redirect, WebError> {
    let library = state.library.lock().await;
    if !library.delete_movie(user_id, movie_id)? {
        return Err(WebError::NotFound(format!("No movie with id {}", movie_id)));
    }
    Ok(Redirect::to(&format!("/users/{}/movies", user_id)))
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>body{{font-family:sans-serif;margin:2em;}} li{{margin:.4em 0;}} form.inline{{display:inline;}}</style>\n\
         </head>\n<body>\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
        body = body
    )
}

fn render_index(users: &[UserRecord]) -> String {
    let mut body = String::from("<ul>\n");
    for user in users {
        body.push_str(&format!(
            "<li><a href=\"/users/{}/movies\">{}</a></li>\n",
            user.id,
            escape_html(&user.name)
        ));
    }
    body.push_str("</ul>\n");
    if users.is_empty() {
        body.push_str("<p>No users yet.</p>\n");
    }
    body.push_str(
        "<form method=\"post\" action=\"/users\">\n\
         <input name=\"name\" placeholder=\"New user\" required>\n\
         <button type=\"submit\">Add user</button>\n</form>",
    );
    page("Users", &body)
}

fn render_movies(user: &UserRecord, movies: &[MovieRecord], message: Option<&str>) -> String {
    let mut body = String::new();
    if let Some(message) = message {
        body.push_str(&format!("<p><strong>{}</strong></p>\n", escape_html(message)));
    }

    body.push_str("<ul>\n");
    for movie in movies {
        let base = format!("/users/{}/movies/{}", user.id, movie.id);
        body.push_str(&format!(
            "<li>{} ({}), rated {}{}\n\
             <form class=\"inline\" method=\"post\" action=\"{base}/update\">\
             <input name=\"note\" value=\"{}\" placeholder=\"Note\">\
             <button type=\"submit\">Save note</button></form>\n\
             <form class=\"inline\" method=\"post\" action=\"{base}/delete\">\
             <button type=\"submit\">Delete</button></form></li>\n",
            escape_html(&movie.title),
            movie.year,
            escape_html(&movie.rating_display()),
            movie
                .note
                .as_deref()
                .map(|n| format!(": <em>{}</em>", escape_html(n)))
                .unwrap_or_default(),
            escape_html(movie.note.as_deref().unwrap_or("")),
            base = base
        ));
    }
    body.push_str("</ul>\n");
    if movies.is_empty() {
        body.push_str("<p>No movies yet.</p>\n");
    }

    body.push_str(&format!(
        "<form method=\"post\" action=\"/users/{}/movies\">\n\
         <input name=\"title\" placeholder=\"Movie title\" required>\n\
         <input name=\"note\" placeholder=\"Note (optional)\">\n\
         <button type=\"submit\">Add movie</button>\n</form>\n\
         <p><a href=\"/\">Back to users</a></p>",
        user.id
    ));
    page(&format!("{}'s movies", user.name), &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserRecord {
        UserRecord {
            id: 3,
            name: "<alice>".to_string(),
        }
    }

    fn movie() -> MovieRecord {
        MovieRecord {
            id: 9,
            user_id: 3,
            title: "Heat".to_string(),
            year: 1995,
            rating: Some(83.0),
            note: Some("\"great\"".to_string()),
            country: "United States".to_string(),
            poster_url: None,
            imdb_id: "tt0113277".to_string(),
        }
    }

    #[test]
    fn test_render_index_escapes_names() {
        let html = render_index(&[user()]);
        assert!(html.contains("<a href=\"/users/3/movies\">&lt;alice&gt;</a>"));
        assert!(html.contains("action=\"/users\""));
    }

    #[test]
    fn test_render_movies_forms() {
        let html = render_movies(&user(), &[movie()], Some("No movie found for 'x'"));
        assert!(html.contains("action=\"/users/3/movies/9/update\""));
        assert!(html.contains("action=\"/users/3/movies/9/delete\""));
        assert!(html.contains("value=\"&quot;great&quot;\""));
        assert!(html.contains("No movie found for &#39;x&#39;"));
        assert!(html.contains("&lt;alice&gt;&#39;s movies"));
    }

    #[test]
    fn test_render_movies_empty() {
        let html = render_movies(&user(), &[], None);
        assert!(html.contains("No movies yet."));
    }

    #[test]
    fn test_web_error_status() {
        let missing: WebError = LibraryError::Store(StoreError::UserNotFound(1)).into();
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let bad = WebError::BadRequest("x".to_string());
        assert_eq!(bad.into_response().status(), StatusCode::BAD_REQUEST);

        let internal = WebError::Internal("disk full".to_string());
        assert_eq!(internal.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

//! Static website export: one card per movie injected into an HTML template.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use movie_catalog_models::MovieRecord;
use movie_catalog_sources::FlagLookup;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("template does not contain the __TEMPLATE_MOVIE_GRID__ placeholder")]
    MissingPlaceholder,
    #[error("failed to write website: {0}")]
    Io(#[from] std::io::Error),
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `<user>_website.html`, with path separators in the name replaced
pub fn website_file_name(user: &str) -> String {
    let safe: String = user
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    format!("{}_website.html", safe)
}

/// Flag image per distinct primary country. Lookup failures are logged and skipped.
pub async fn resolve_flags(movies: &[MovieRecord], lookup: &FlagLookup) -> HashMap<String, String> {
    let mut flags = HashMap::new();
    for country in movies.iter().filter_map(MovieRecord::primary_country) {
        if flags.contains_key(country) {
            continue;
        }
        match lookup.flag_url(country).await {
            Ok(Some(url)) => {
                flags.insert(country.to_string(), url);
            }
            Ok(None) => debug!(country, "No flag found"),
            Err(e) => warn!(country, error = %e, "Flag lookup failed"),
        }
    }
    flags
}

pub fn render_card(movie: &MovieRecord, flag_url: Option<&str>) -> String {
    let mut body = String::new();

    if let Some(poster) = &movie.poster_url {
        body.push_str(&format!(
            "\n        <div class=\"movie-poster\" style=\"background-image: url('{}');\"></div>",
            escape_html(poster)
        ));
    }
    body.push_str(&format!(
        "\n        <div class=\"movie-title\">{}</div>\
         \n        <div class=\"movie-year\">{}</div>\
         \n        <div class=\"movie-rating\">{}</div>",
        escape_html(&movie.title),
        movie.year,
        escape_html(&movie.rating_display())
    ));
    if let Some(note) = &movie.note {
        body.push_str(&format!("\n        <div class=\"movie-note\">{}</div>", escape_html(note)));
    }
    if let Some(flag) = flag_url {
        body.push_str(&format!(
            "\n        <img src=\"{}\" alt=\"Country Flag\" class=\"movie-flag\">",
            escape_html(flag)
        ));
    }

    match movie.imdb_url() {
        Some(link) => format!(
            "\n<li class=\"movie\">\n    <a href=\"{}\" target=\"_blank\" style=\"text-decoration: none; color: inherit;\">{}\n    </a>\n</li>",
            escape_html(&link),
            body
        ),
        None => format!("\n<li class=\"movie\">{}\n</li>", body),
    }
}

pub fn render_grid(movies: &[MovieRecord], flags: &HashMap<String, String>) -> String {
    movies
        .iter()
        .map(|movie| {
            let flag = movie
                .primary_country()
                .and_then(|country| flags.get(country))
                .map(String::as_str);
            render_card(movie, flag)
        })
        .collect()
}

pub fn inject_grid(template: &str, grid: &str) -> Result<String, SiteError> {
    if !template.contains(GRID_PLACEHOLDER) {
        return Err(SiteError::MissingPlaceholder);
    }
    Ok(template.replace(GRID_PLACEHOLDER, grid))
}

pub fn write_website(dir: &Path, user: &str, page: &str) -> Result<PathBuf, SiteError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(website_file_name(user));
    std::fs::write(&path, page)?;
    info!(path = %path.display(), "Website written");
    Ok(path)
}

use super::progress::Spinner;
use super::website;
use crate::context::{require_user, AppContext};
use crate::output::{styled_table, Output};
use crate::MovieCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::Cell;
use movie_catalog_core::query::{self, HistogramBin};
use movie_catalog_core::{
    AddOutcome, CollectionStats, CoreError, LibraryError, MovieFilter, MovieLibrary, SortOrder,
};
use movie_catalog_models::{MovieRecord, UserRecord};
use serde_json::json;

const HISTOGRAM_WIDTH: usize = 40;

pub async fn run_movies(user: &str, action: MovieCommands, ctx: &AppContext, output: &Output) -> Result<()> {
    let mut library = ctx.open_library()?;
    let user = require_user(library.store(), user)?;

    match action {
        MovieCommands::List => {
            let movies = library.movies(user.id)?;
            print_movies(&movies.iter().collect::<Vec<_>>(), output);
        }
        MovieCommands::Add { title, note } => {
            add_movie(&mut library, &user, &title, note, output).await?;
        }
        MovieCommands::Delete { title } => delete_movie(&library, &user, &title, output)?,
        MovieCommands::Note { title, note } => set_note(&library, &user, &title, &note, output)?,
        MovieCommands::Stats => print_stats(&library, &user, output)?,
        MovieCommands::Random => random_movie(&library, &user, output)?,
        MovieCommands::Search { query } => {
            let found = library.search(user.id, &query)?;
            if found.is_empty() {
                output.info(format!("Nothing matches '{}'", query));
            }
            print_movies(&found.iter().collect::<Vec<_>>(), output);
        }
        MovieCommands::SortRating => {
            let movies = library.movies(user.id)?;
            print_movies(&query::sort_by_rating(&movies), output);
        }
        MovieCommands::SortYear { descending } => {
            let order = if descending { SortOrder::Descending } else { SortOrder::Ascending };
            let movies = library.movies(user.id)?;
            print_movies(&query::sort_by_year(&movies, order), output);
        }
        MovieCommands::Filter { min_rating, min_year, max_year } => {
            let filter = MovieFilter { min_rating, min_year, max_year };
            let movies = library.movies(user.id)?;
            print_movies(&query::filter_movies(&movies, &filter), output);
        }
        MovieCommands::Histogram { bins } => print_histogram(&library, &user, bins, output)?,
        MovieCommands::Website => {
            website::generate_website(ctx, &library, &user, output).await?;
        }
    }

    library.close()?;
    Ok(())
}

pub fn print_movies(movies: &[&MovieRecord], output: &Output) {
    if movies.is_empty() {
        output.info("No movies to show.");
        output.data(&json!({ "movies": [] }));
        return;
    }

    let mut table = styled_table(vec!["Title", "Year", "Rating", "Note", "Country"]);
    for movie in movies {
        table.add_row(vec![
            Cell::new(&movie.title),
            Cell::new(movie.year),
            Cell::new(movie.rating_display()),
            Cell::new(movie.note.as_deref().unwrap_or("")),
            Cell::new(&movie.country),
        ]);
    }
    output.table(&table);
    output.info(format!("{} movie(s)", movies.len()));
    output.data(&json!({ "movies": movies }));
}

pub async fn add_movie(
    library: &mut MovieLibrary,
    user: &UserRecord,
    title: &str,
    note: Option<String>,
    output: &Output,
) -> Result<()> {
    let spinner = Spinner::start(format!("Looking up '{}'...", title.trim()), output.is_human());
    let outcome = library.add_movie(user.id, title, note).await;
    spinner.finish();

    match outcome? {
        AddOutcome::Added(movie) => {
            output.success(format!(
                "Added {} ({}) with rating {}",
                movie.title,
                movie.year,
                movie.rating_display()
            ));
            output.data(&json!({ "added": movie }));
        }
        AddOutcome::AlreadyInCollection(existing) => {
            output.warn(format!("'{}' is already in {}'s collection", existing, user.name));
            output.data(&json!({ "already_in_collection": existing }));
        }
        AddOutcome::NotFound(query) => {
            output.warn(format!("No movie found for '{}'", query));
            output.data(&json!({ "not_found": query }));
        }
    }
    Ok(())
}

pub fn delete_movie(library: &MovieLibrary, user: &UserRecord, title: &str, output: &Output) -> Result<()> {
    if library.store().delete_movie_by_title(user.id, title)? {
        output.success(format!("Deleted '{}'", title.trim()));
        output.data(&json!({ "deleted": title.trim() }));
    } else {
        output.warn(format!("'{}' is not in {}'s collection", title.trim(), user.name));
    }
    Ok(())
}

pub fn set_note(
    library: &MovieLibrary,
    user: &UserRecord,
    title: &str,
    note: &str,
    output: &Output,
) -> Result<()> {
    let movie = library
        .store()
        .find_movie(user.id, title)?
        .ok_or_else(|| eyre!("'{}' is not in {}'s collection", title.trim(), user.name))?;

    let note = Some(note.trim().to_string()).filter(|n| !n.is_empty());
    match library.set_note(user.id, movie.id, note)? {
        Some(updated) => {
            output.success(format!("Updated note on '{}'", updated.title));
            output.data(&json!({ "updated": updated }));
        }
        None => output.warn(format!("'{}' was removed before it could be updated", movie.title)),
    }
    Ok(())
}

fn report_empty(user: &UserRecord, output: &Output) {
    output.info(format!("{} has no rated movies yet.", user.name));
    output.data(&json!({ "error": "empty_collection" }));
}

pub fn print_stats(library: &MovieLibrary, user: &UserRecord, output: &Output) -> Result<()> {
    let stats = match library.statistics(user.id) {
        Ok(stats) => stats,
        Err(LibraryError::Core(CoreError::EmptyCollection)) => {
            report_empty(user, output);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut table = styled_table(vec!["Statistic", "Value"]);
    table.add_row(vec![Cell::new("Movies"), Cell::new(stats.total_movies)]);
    table.add_row(vec![Cell::new("Rated"), Cell::new(stats.rated_movies)]);
    table.add_row(vec![Cell::new("Average rating"), Cell::new(format!("{:.2}", stats.average))]);
    table.add_row(vec![Cell::new("Median rating"), Cell::new(format!("{:.2}", stats.median))]);
    table.add_row(vec![Cell::new("Best"), Cell::new(ranked(&stats.best))]);
    table.add_row(vec![Cell::new("Worst"), Cell::new(ranked(&stats.worst))]);
    output.table(&table);
    output.data::<CollectionStats>(&stats);
    Ok(())
}

fn ranked(movies: &[(String, f64)]) -> String {
    movies
        .iter()
        .map(|(title, rating)| format!("{} ({})", title, rating))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn random_movie(library: &MovieLibrary, user: &UserRecord, output: &Output) -> Result<()> {
    let movies = library.movies(user.id)?;
    match query::random_movie(&movies, &mut rand::thread_rng()) {
        Some(movie) => {
            output.info(format!(
                "Tonight: {} ({}), rated {}",
                movie.title,
                movie.year,
                movie.rating_display()
            ));
            output.data(&json!({ "movie": movie }));
        }
        None => {
            output.info(format!("{}'s collection is empty.", user.name));
            output.data(&json!({ "movie": null }));
        }
    }
    Ok(())
}

pub fn print_histogram(library: &MovieLibrary, user: &UserRecord, bins: usize, output: &Output) -> Result<()> {
    let movies = library.movies(user.id)?;
    let histogram = match query::rating_histogram(&movies, bins) {
        Ok(histogram) => histogram,
        Err(CoreError::EmptyCollection) => {
            report_empty(user, output);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    for line in histogram_lines(&histogram, HISTOGRAM_WIDTH) {
        output.info(line);
    }
    output.data(&json!({ "bins": histogram }));
    Ok(())
}

/// One text bar per bin, scaled so the fullest bin is `width` wide
fn histogram_lines(histogram: &[HistogramBin], width: usize) -> Vec<String> {
    let max_count = histogram.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    histogram
        .iter()
        .map(|bin| {
            let len = bin.count * width / max_count;
            format!(
                "{:>6.1} - {:<6.1} | {} {}",
                bin.lower,
                bin.upper,
                "█".repeat(len),
                bin.count
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_lines_scale_to_width() {
        let histogram = vec![
            HistogramBin { lower: 50.0, upper: 60.0, count: 4 },
            HistogramBin { lower: 60.0, upper: 70.0, count: 2 },
            HistogramBin { lower: 70.0, upper: 80.0, count: 0 },
        ];
        let lines = histogram_lines(&histogram, 8);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].matches('█').count(), 8);
        assert_eq!(lines[1].matches('█').count(), 4);
        assert_eq!(lines[2].matches('█').count(), 0);
        assert!(lines[0].starts_with("  50.0 - 60.0"));
        assert!(lines[0].ends_with(" 4"));
    }

    #[test]
    fn test_ranked_joins_ties() {
        let best = vec![("Heat".to_string(), 90.0), ("Ran".to_string(), 90.0)];
        assert_eq!(ranked(&best), "Heat (90)\nRan (90)");
    }
}

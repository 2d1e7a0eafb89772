use super::{movies, prompts, users, website};
use crate::context::AppContext;
use crate::output::Output;
use color_eyre::Result;
use movie_catalog_core::query;
use movie_catalog_core::{MovieFilter, MovieLibrary, SortOrder, DEFAULT_HISTOGRAM_BINS};
use movie_catalog_models::UserRecord;
use owo_colors::OwoColorize;

const USER_MENU: &[&str] = &[
    "Exit",
    "List users",
    "Select user",
    "Add user",
    "Delete user",
    "Rename user",
];

const MOVIE_MENU: &[&str] = &[
    "Back to users",
    "List movies",
    "Add movie",
    "Delete movie",
    "Update movie note",
    "Stats",
    "Random movie",
    "Search movie",
    "Movies sorted by rating",
    "Movies sorted by year",
    "Filter movies",
    "Rating histogram",
    "Generate website",
];

pub async fn run_menu(ctx: &AppContext, output: &Output) -> Result<()> {
    let mut library = ctx.open_library()?;
    println!("\n{}\n", "********** My Movies Database **********".bright_cyan().bold());

    loop {
        let choice = prompts::select("Users", USER_MENU)?;
        // Failed actions are reported and the menu keeps running
        let result = match choice {
            0 => break,
            1 => {
                users::print_users(&library.store().list_users()?, output);
                Ok(())
            }
            2 => match pick_user(&library)? {
                Some(user) => movie_menu(ctx, &mut library, &user, output).await,
                None => {
                    output.info("No users yet. Add one first.");
                    Ok(())
                }
            },
            3 => {
                let name = prompts::prompt_required("New user name", output)?;
                users::add_user(library.store(), &name, output)
            }
            4 => match pick_user(&library)? {
                Some(user) => users::delete_user(library.store(), &user.name, false, output),
                None => Ok(()),
            },
            5 => match pick_user(&library)? {
                Some(user) => {
                    let new_name = prompts::prompt_required("New name", output)?;
                    users::rename_user(library.store(), &user.name, &new_name, output)
                }
                None => Ok(()),
            },
            _ => Ok(()),
        };
        if let Err(e) = result {
            output.error(format!("{:#}", e));
        }
    }

    output.info("Bye!");
    library.close()?;
    Ok(())
}

fn pick_user(library: &MovieLibrary) -> Result<Option<UserRecord>> {
    let mut all = library.store().list_users()?;
    if all.is_empty() {
        return Ok(None);
    }
    let names: Vec<&str> = all.iter().map(|u| u.name.as_str()).collect();
    let index = prompts::select("Select a user", &names)?;
    Ok(Some(all.swap_remove(index)))
}

async fn movie_menu(
    ctx: &AppContext,
    library: &mut MovieLibrary,
    user: &UserRecord,
    output: &Output,
) -> Result<()> {
    output.info(format!("Welcome back, {}!", user.name));

    loop {
        let choice = prompts::select(&format!("{}'s movies", user.name), MOVIE_MENU)?;
        let result = match choice {
            0 => return Ok(()),
            1 => {
                let all = library.movies(user.id)?;
                movies::print_movies(&all.iter().collect::<Vec<_>>(), output);
                Ok(())
            }
            2 => {
                let title = prompts::prompt_required("Movie title", output)?;
                let note = prompts::prompt_string("Note (optional)", None)?;
                let note = Some(note).filter(|n| !n.is_empty());
                movies::add_movie(library, user, &title, note, output).await
            }
            3 => {
                let title = prompts::prompt_required("Title to delete", output)?;
                movies::delete_movie(library, user, &title, output)
            }
            4 => {
                let title = prompts::prompt_required("Title to annotate", output)?;
                let note = prompts::prompt_string("Note (blank to clear)", None)?;
                movies::set_note(library, user, &title, &note, output)
            }
            5 => movies::print_stats(library, user, output),
            6 => movies::random_movie(library, user, output),
            7 => {
                let query = prompts::prompt_required("Search for", output)?;
                let found = library.search(user.id, &query)?;
                movies::print_movies(&found.iter().collect::<Vec<_>>(), output);
                Ok(())
            }
            8 => {
                let all = library.movies(user.id)?;
                movies::print_movies(&query::sort_by_rating(&all), output);
                Ok(())
            }
            9 => {
                let newest_first = prompts::prompt_yes_no("Newest first?", Some(true))?;
                let order = if newest_first { SortOrder::Descending } else { SortOrder::Ascending };
                let all = library.movies(user.id)?;
                movies::print_movies(&query::sort_by_year(&all, order), output);
                Ok(())
            }
            10 => {
                let filter = MovieFilter {
                    min_rating: prompts::prompt_optional("Minimum rating (0-100, blank for none)", output)?,
                    min_year: prompts::prompt_optional("Start year (blank for none)", output)?,
                    max_year: prompts::prompt_optional("End year (blank for none)", output)?,
                };
                let all = library.movies(user.id)?;
                movies::print_movies(&query::filter_movies(&all, &filter), output);
                Ok(())
            }
            11 => {
                let bins = prompts::prompt_number("Number of bins", Some(DEFAULT_HISTOGRAM_BINS), output)?;
                movies::print_histogram(library, user, bins, output)
            }
            12 => website::generate_website(ctx, library, user, output).await,
            _ => Ok(()),
        };
        if let Err(e) = result {
            output.error(format!("{:#}", e));
        }
    }
}

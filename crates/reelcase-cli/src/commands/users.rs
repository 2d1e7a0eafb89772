use super::prompts;
use crate::context::{require_user, AppContext};
use crate::output::{styled_table, Output};
use crate::UserCommands;
use color_eyre::Result;
use comfy_table::Cell;
use movie_catalog_core::{CollectionStore, StoreError};
use movie_catalog_models::UserRecord;
use serde_json::json;

pub fn run_users(cmd: UserCommands, ctx: &AppContext, output: &Output) -> Result<()> {
    let store = ctx.open_store()?;
    match cmd {
        UserCommands::List => list_users(&store, output),
        UserCommands::Add { name } => add_user(&store, &name, output),
        UserCommands::Rename { name, new_name } => rename_user(&store, &name, &new_name, output),
        UserCommands::Delete { name, yes } => delete_user(&store, &name, yes, output),
    }
}

pub fn print_users(users: &[UserRecord], output: &Output) {
    if users.is_empty() {
        output.info("No users yet.");
        output.data(&json!({ "users": [] }));
        return;
    }

    let mut table = styled_table(vec!["ID", "Name"]);
    for user in users {
        table.add_row(vec![Cell::new(user.id), Cell::new(&user.name)]);
    }
    output.table(&table);
    output.data(&json!({ "users": users }));
}

fn list_users(store: &CollectionStore, output: &Output) -> Result<()> {
    print_users(&store.list_users()?, output);
    Ok(())
}

/// Creates the user, reporting a duplicate as a warning rather than an error
pub fn add_user(store: &CollectionStore, name: &str, output: &Output) -> Result<()> {
    match store.create_user(name) {
        Ok(user) => {
            output.success(format!("Created user '{}'", user.name));
            output.data(&json!({ "created": user }));
            Ok(())
        }
        Err(StoreError::DuplicateUser(name)) => {
            output.warn(format!("User '{}' already exists", name));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn rename_user(store: &CollectionStore, name: &str, new_name: &str, output: &Output) -> Result<()> {
    let user = require_user(store, name)?;
    match store.rename_user(user.id, new_name) {
        Ok(Some(renamed)) => {
            output.success(format!("Renamed '{}' to '{}'", user.name, renamed.name));
            output.data(&json!({ "renamed": renamed }));
            Ok(())
        }
        Ok(None) => {
            output.warn(format!("User '{}' no longer exists", user.name));
            Ok(())
        }
        Err(StoreError::DuplicateUser(taken)) => {
            output.warn(format!("User '{}' already exists", taken));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn delete_user(store: &CollectionStore, name: &str, assume_yes: bool, output: &Output) -> Result<()> {
    let user = require_user(store, name)?;
    let movie_count = store.list_movies(user.id)?.len();

    if !assume_yes
        && output.is_human()
        && !prompts::prompt_yes_no(
            &format!("Delete '{}' and their {} movie(s)?", user.name, movie_count),
            Some(false),
        )?
    {
        output.info("Cancelled.");
        return Ok(());
    }

    if store.delete_user(user.id)? {
        output.success(format!("Deleted user '{}' and {} movie(s)", user.name, movie_count));
        output.data(&json!({ "deleted": user, "movies_removed": movie_count }));
    }
    Ok(())
}

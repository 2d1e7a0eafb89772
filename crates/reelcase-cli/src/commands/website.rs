use super::progress::Spinner;
use crate::context::AppContext;
use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use movie_catalog_core::{site, MovieLibrary};
use movie_catalog_models::UserRecord;
use serde_json::json;
use std::collections::HashMap;

const BUILTIN_TEMPLATE: &str = include_str!("../../static/index_template.html");

fn load_template(ctx: &AppContext) -> Result<String> {
    match &ctx.config.site.template {
        Some(path) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read site template {}", path.display())),
        None => Ok(BUILTIN_TEMPLATE.to_string()),
    }
}

pub async fn generate_website(
    ctx: &AppContext,
    library: &MovieLibrary,
    user: &UserRecord,
    output: &Output,
) -> Result<()> {
    let movies = library.movies(user.id)?;
    let template = load_template(ctx)?;

    let flags = match ctx.flag_lookup()? {
        Some(lookup) if !movies.is_empty() => {
            let spinner = Spinner::start("Fetching country flags...", output.is_human());
            let flags = site::resolve_flags(&movies, &lookup).await;
            spinner.finish();
            flags
        }
        _ => HashMap::new(),
    };

    let page = site::inject_grid(&template, &site::render_grid(&movies, &flags))?;
    let path = site::write_website(&ctx.config.site_output_dir(&ctx.paths), &user.name, &page)?;

    output.success(format!("Website was generated successfully: {}", path.display()));
    output.data(&json!({ "path": path, "movies": movies.len() }));
    Ok(())
}

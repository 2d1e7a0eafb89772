use super::prompts;
use crate::context::AppContext;
use crate::output::{styled_table, Output};
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Color};
use movie_catalog_config::{Config, OMDB_API_KEY_ENV};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run_config(cmd: ConfigCommands, ctx: &AppContext, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, ctx, output),
        ConfigCommands::Omdb { api_key } => configure_omdb(api_key, ctx, output),
        ConfigCommands::Init { force } => init_config(force, ctx, output),
    }
}

fn show_config(full: bool, ctx: &AppContext, output: &Output) -> Result<()> {
    let config = &ctx.config;
    let credentials = ctx.credentials()?;
    let api_key = credentials.resolve_omdb_api_key();
    let key_source = if std::env::var(OMDB_API_KEY_ENV).is_ok_and(|k| !k.trim().is_empty()) {
        "environment"
    } else {
        "credentials file"
    };

    if !ctx.config_path.exists() {
        output.warn(format!(
            "No config file at {}; showing defaults. Run 'reelcase config init' to create one.",
            ctx.config_path.display()
        ));
    }

    let api_key_display = match &api_key {
        Some(key) if full => key.clone(),
        Some(key) => mask_string(key),
        None => "<not set>".to_string(),
    };

    let mut table = styled_table(vec!["Setting", "Value"]);
    let rows: Vec<(&str, String)> = vec![
        ("Config file", ctx.config_path.display().to_string()),
        ("Database", config.database_path(&ctx.paths).display().to_string()),
        ("Site output", config.site_output_dir(&ctx.paths).display().to_string()),
        (
            "Site template",
            config
                .site
                .template
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<built-in>".to_string()),
        ),
        ("OMDb URL", config.omdb.base_url.clone()),
        ("OMDb timeout", format!("{}s", config.omdb.timeout_secs)),
        ("OMDb plot", config.omdb.plot.clone()),
        (
            "OMDb API key",
            match api_key {
                Some(_) => format!("{} ({})", api_key_display, key_source),
                None => api_key_display.clone(),
            },
        ),
        (
            "Flags",
            if config.flags.enabled {
                format!("{} {}", "✓".green(), config.flags.base_url)
            } else {
                "✗".red().to_string()
            },
        ),
        ("Server bind", config.server.bind.clone()),
        (
            "Log file",
            config
                .logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<stderr>".to_string()),
        ),
    ];
    for (name, value) in &rows {
        table.add_row(vec![Cell::new(name).fg(Color::Cyan), Cell::new(value)]);
    }
    output.table(&table);

    let mut shown = serde_json::to_value(config)?;
    shown["omdb"]["api_key"] = json!(api_key_display);
    output.data(&shown);
    Ok(())
}

fn configure_omdb(api_key_arg: Option<String>, ctx: &AppContext, output: &Output) -> Result<()> {
    let api_key = match api_key_arg {
        Some(key) => key,
        None => {
            output.info("Get a free API key at https://www.omdbapi.com/apikey.aspx");
            prompts::prompt_password("OMDb API key")?
        }
    };
    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(eyre!("API key cannot be empty"));
    }

    let mut credentials = ctx.credentials()?;
    credentials.set_omdb_api_key(api_key);
    credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;

    output.success(format!(
        "OMDb API key saved to {}",
        ctx.paths.credentials_file().display()
    ));
    if std::env::var(OMDB_API_KEY_ENV).is_ok() {
        output.warn(format!("{} is set and takes precedence over the stored key", OMDB_API_KEY_ENV));
    }
    Ok(())
}

fn init_config(force: bool, ctx: &AppContext, output: &Output) -> Result<()> {
    if ctx.config_path.exists() && !force {
        output.warn(format!(
            "Config file already exists at {} (use --force to overwrite)",
            ctx.config_path.display()
        ));
        return Ok(());
    }

    ctx.paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;
    Config::default()
        .save_to_file(&ctx.config_path)
        .map_err(|e| eyre!("Failed to write {}: {}", ctx.config_path.display(), e))?;

    output.success(format!("Wrote default configuration to {}", ctx.config_path.display()));
    output.data(&json!({ "path": ctx.config_path }));
    Ok(())
}

fn mask_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string("abc"), "***");
        assert_eq!(mask_string("a1b2c3d4"), "a1***d4");
    }
}

use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::{Confirm, Input, Password, Select};
use std::str::FromStr;

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_builder = Input::<String>::new().with_prompt(prompt).allow_empty(true);

    if let Some(default_value) = default {
        input_builder = input_builder.default(default_value.to_string());
    }

    input_builder
        .interact_text()
        .map(|s| s.trim().to_string())
        .map_err(|e| eyre!("Failed to read input: {}", e))
}

/// Prompt until a non-blank value is entered
pub fn prompt_required(prompt: &str, output: &Output) -> Result<String> {
    loop {
        let value = prompt_string(prompt, None)?;
        if !value.is_empty() {
            return Ok(value);
        }
        output.error("A value is required.");
    }
}

/// Prompt for a secret (masked input)
pub fn prompt_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| eyre!("Failed to read password: {}", e))
}

/// Prompt for yes/no with optional default
pub fn prompt_yes_no(prompt: &str, default: Option<bool>) -> Result<bool> {
    let mut confirm_builder = Confirm::new().with_prompt(prompt);

    if let Some(default_value) = default {
        confirm_builder = confirm_builder.default(default_value);
    }

    confirm_builder
        .interact()
        .map_err(|e| eyre!("Failed to read confirmation: {}", e))
}

/// Prompt for a value that may be left blank; re-asks on unparsable input
pub fn prompt_optional<T: FromStr>(prompt: &str, output: &Output) -> Result<Option<T>> {
    loop {
        let input = prompt_string(prompt, None)?;
        if input.is_empty() {
            return Ok(None);
        }
        match input.parse::<T>() {
            Ok(value) => return Ok(Some(value)),
            Err(_) => output.error(format!("'{}' is not a valid number.", input)),
        }
    }
}

/// Prompt for a number with optional default
pub fn prompt_number<T: FromStr + ToString + Copy>(
    prompt: &str,
    default: Option<T>,
    output: &Output,
) -> Result<T> {
    loop {
        let default_str = default.map(|d| d.to_string());
        let input = prompt_string(prompt, default_str.as_deref())?;

        if input.is_empty() {
            if let Some(default_value) = default {
                return Ok(default_value);
            }
            output.error("Invalid input. Please enter a valid number.");
            continue;
        }

        match input.parse::<T>() {
            Ok(num) => return Ok(num),
            Err(_) => output.error("Invalid input. Please enter a valid number."),
        }
    }
}

/// Pick one item from a list; returns its index
pub fn select<S: ToString>(prompt: &str, items: &[S]) -> Result<usize> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .map_err(|e| eyre!("Failed to read selection: {}", e))
}

use crate::output::Output;
use color_eyre::Result;
use dialoguer::{Confirm, Input, Password};
use group_review_models::{parse_rating_input, RATING_MAX, RATING_MIN};

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_builder = Input::<String>::new().with_prompt(prompt).allow_empty(true);

    if let Some(default_value) = default.filter(|d| !d.is_empty()) {
        input_builder = input_builder.default(default_value.to_string());
    }

    input_builder
        .interact_text()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

/// Prompt for a secret (masked input)
pub fn prompt_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

/// Prompt for yes/no with a default
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read confirmation: {}", e))
}

/// Prompt for a non-negative whole number, re-asking until one is given
pub fn prompt_number(prompt: &str, output: &Output) -> Result<u64> {
    loop {
        let input = prompt_string(prompt, None)?;
        match input.trim().parse::<u64>() {
            Ok(num) => return Ok(num),
            Err(_) => output.error("Invalid input. Please enter a valid number."),
        }
    }
}

/// Prompt for a rating; any number is accepted and rounded, bounds are checked on submit
pub fn prompt_rating(current: i64, output: &Output) -> Result<i64> {
    let prompt = format!("Rating ({}-{})", RATING_MIN, RATING_MAX);
    loop {
        let input = prompt_string(&prompt, Some(&current.to_string()))?;
        match parse_rating_input(&input) {
            Some(rating) => return Ok(rating),
            None => output.error("Invalid input. Please enter a number."),
        }
    }
}

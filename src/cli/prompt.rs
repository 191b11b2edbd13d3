use crate::journal::model::InputLimits;
use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, theme::ColorfulTheme};

/// Title and content for a new dream, asking only for what was not given on the command line.
pub fn read_dream(
    title: Option<String>,
    content: Option<String>,
    limits: InputLimits,
) -> Result<(String, String)> {
    let theme = ColorfulTheme::default();

    let title = match title {
        Some(title) => title,
        None => Input::with_theme(&theme)
            .with_prompt("Title")
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                check_length(input, limits.max_title_chars)
            })
            .interact_text()
            .context("Failed to read dream title")?,
    };

    let content = match content {
        Some(content) => content,
        None => {
            println!("Describe the dream as a single paragraph.");
            Input::with_theme(&theme)
                .with_prompt("Dream")
                .validate_with(|input: &String| -> std::result::Result<(), String> {
                    check_length(input, limits.max_content_chars)
                })
                .interact_text()
                .context("Failed to read dream content")?
        }
    };

    Ok((title, content))
}

pub fn confirm_reset(total: usize) -> Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Erase all {total} dream(s) and the streak history?"))
        .default(false)
        .interact()
        .context("Failed to read reset confirmation")
}

fn check_length(input: &str, max: usize) -> std::result::Result<(), String> {
    let count = input.trim().chars().count();
    if count == 0 {
        Err("Must not be empty".to_string())
    } else if count > max {
        Err(format!("Too long: {count} characters (max {max})"))
    } else {
        Ok(())
    }
}

use dialoguer::{theme::ColorfulTheme, Input, Select};

/// Single-choice menu; `None` when the operator backs out.
pub fn select_option(prompt: &str, items: &[&str]) -> Option<usize> {
    Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()
        .ok()
        .flatten()
}

pub fn input_text(prompt: &str, initial: &str) -> Option<String> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
        .ok()
}

/// Free-text input constrained to something that parses as a number.
pub fn input_number(prompt: &str, initial: &str) -> Option<String> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .with_initial_text(initial)
        .validate_with(|raw: &String| {
            if raw.trim().parse::<f64>().is_ok() {
                Ok(())
            } else {
                Err("enter a number, e.g. 38 or 40.5")
            }
        })
        .interact_text()
        .ok()
        .map(|v| v.trim().to_string())
}

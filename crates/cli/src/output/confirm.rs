use dialoguer::{theme::ColorfulTheme, Confirm};

/// Destructive actions default to "no"; an interrupted prompt counts as a
/// refusal.
pub fn confirm_action(msg: &str) -> bool {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(msg)
        .default(false)
        .interact()
        .unwrap_or(false)
}

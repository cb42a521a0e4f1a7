use colored::Colorize;

use hivemon_common::rule::RuleStatus;

pub fn print_header(title: &str) {
    println!();
    println!("  {} {}", "●".yellow(), title.bright_yellow().bold());
    println!("  {}", "─".repeat(title.len() + 24).dimmed());
}

pub fn print_section(title: &str) {
    println!();
    println!("  {}", title.bold());
}

pub fn print_kv(label: &str, value: &str) {
    println!(
        "    {} {}",
        format!("{:<14}", label).dimmed(),
        value.bright_white()
    );
}

pub fn print_kv_status(label: &str, status: RuleStatus) {
    let styled = match status {
        RuleStatus::Triggered => status.to_string().red().bold().to_string(),
        RuleStatus::Normal => status.to_string().green().to_string(),
    };
    println!("    {} {}", format!("{:<14}", label).dimmed(), styled);
}

pub fn print_dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

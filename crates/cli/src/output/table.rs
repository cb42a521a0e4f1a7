use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};

use hivemon_common::rule::RuleStatus;

pub fn build_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    let cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Yellow).add_attribute(Attribute::Bold))
        .collect();
    table.set_header(cells);
    table
}

/// Status column cell: triggered rules should jump out of the list.
pub fn status_cell(status: RuleStatus) -> Cell {
    match status {
        RuleStatus::Triggered => Cell::new(status.to_string())
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        RuleStatus::Normal => Cell::new(status.to_string()).fg(Color::Green),
    }
}

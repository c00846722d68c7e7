use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

const ONE_DAY_MINUTES: f64 = 24.0 * 60.0;
const ONE_WEEK_MINUTES: f64 = 7.0 * ONE_DAY_MINUTES;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

/// Lead time cell: green within a day, yellow within a week, red beyond.
pub fn color_coded_lead_time_cell(minutes: f64) -> Cell {
    let text = format_minutes(minutes);
    if minutes <= ONE_DAY_MINUTES {
        Cell::new(text).fg(TableColor::Green)
    } else if minutes <= ONE_WEEK_MINUTES {
        Cell::new(text).fg(TableColor::Yellow)
    } else {
        Cell::new(text).fg(TableColor::Red)
    }
}

pub fn format_minutes(minutes: f64) -> String {
    if minutes.fract() == 0.0 {
        format!("{minutes:.0}min")
    } else {
        format!("{minutes:.1}min")
    }
}

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::model::BuildResult;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn create_cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

pub fn color_coded_result_cell(result: Option<&BuildResult>) -> Cell {
    match result {
        Some(BuildResult::Success) => Cell::new("SUCCESS").fg(TableColor::Green),
        Some(BuildResult::Unstable) => Cell::new("UNSTABLE").fg(TableColor::Yellow),
        Some(BuildResult::Failure) => Cell::new("FAILURE").fg(TableColor::Red),
        Some(other) => Cell::new(other.as_str()).fg(TableColor::DarkGrey),
        None => Cell::new("RUNNING").fg(TableColor::Blue),
    }
}

/// Colors a Jenkins ball color name the way the Jenkins UI shows it.
pub fn color_coded_job_cell(color: Option<&str>) -> Cell {
    let color = color.unwrap_or("notbuilt");
    let text = if color.ends_with("_anime") {
        format!("{} (building)", color.trim_end_matches("_anime"))
    } else {
        color.to_string()
    };

    match color.trim_end_matches("_anime") {
        "blue" => Cell::new(text).fg(TableColor::Green),
        "yellow" => Cell::new(text).fg(TableColor::Yellow),
        "red" => Cell::new(text).fg(TableColor::Red),
        _ => Cell::new(text).fg(TableColor::DarkGrey),
    }
}

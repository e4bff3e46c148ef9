//! Terminal tables for validation reports, dependency queries and layouts.

use std::collections::BTreeMap;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};
use gfred_layout::{LayoutBounds, Position};
use gfred_validate::{DependencyInfo, MissionValidationReport, Phase};

/// Overview and issue tables of a validation report.
pub fn render_report(report: &MissionValidationReport) -> String {
    let mut out = format!("Mission: {}\n", report.mission);
    out.push_str(&overview_table(report).to_string());
    out.push('\n');

    if let Some(table) = issue_table(report) {
        out.push_str("\nIssues:\n");
        out.push_str(&table.to_string());
        out.push('\n');
    }
    out
}

/// `mission: pass N: E errors, W warnings` line used by `watch`.
pub fn one_line(report: &MissionValidationReport) -> String {
    let mut line = format!(
        "{}: pass {}: {} errors, {} warnings ({} ms)",
        report.mission,
        report.pass_id,
        report.total_errors(),
        report.total_warnings(),
        report.elapsed_ms
    );
    if report.truncated() {
        line.push_str(", truncated");
    }
    line
}

fn overview_table(report: &MissionValidationReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Phase"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    for phase in Phase::all() {
        let status = if report.completed_phases.contains(phase) {
            Cell::new("done").fg(Color::Green)
        } else if report.skipped_phases.contains(phase) {
            Cell::new("skipped")
                .fg(Color::Yellow)
                .add_attribute(Attribute::Bold)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![Cell::new(phase.label()), status]);
    }
    table.add_row(vec![
        Cell::new("Errors").add_attribute(Attribute::Bold),
        count_cell(report.total_errors(), Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Warnings").add_attribute(Attribute::Bold),
        count_cell(report.total_warnings(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Elapsed").add_attribute(Attribute::Bold),
        dim_cell(format!("{} ms", report.elapsed_ms)),
    ]);
    align_column(&mut table, 1, CellAlignment::Right);
    table
}

fn issue_table(report: &MissionValidationReport) -> Option<Table> {
    let mut rows: Vec<(bool, &str, &str)> = Vec::new();
    for message in &report.mission_result.errors {
        rows.push((true, "mission", message));
    }
    for (key, result) in &report.entity_results {
        for message in &result.errors {
            rows.push((true, key, message));
        }
    }
    for message in &report.mission_result.warnings {
        rows.push((false, "mission", message));
    }
    for (key, result) in &report.entity_results {
        for message in &result.warnings {
            rows.push((false, key, message));
        }
    }
    if rows.is_empty() {
        return None;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Entity"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for (is_error, entity, message) in rows {
        table.add_row(vec![
            severity_cell(is_error),
            entity_cell(entity),
            Cell::new(message),
        ]);
    }
    Some(table)
}

/// Dependencies registered by `owner`.
pub fn render_dependencies(owner: &str, dependencies: &[&DependencyInfo]) -> String {
    if dependencies.is_empty() {
        return format!("{owner} has no recorded dependencies\n");
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Type"),
        header_cell("Path"),
        header_cell("Valid"),
        header_cell("Error"),
        header_cell("Dependents"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Right);
    for info in dependencies {
        table.add_row(vec![
            Cell::new(info.dependency_type.label()),
            Cell::new(&info.dependency_path),
            validity_cell(info.is_valid),
            info.error_message
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(info.dependent_objects.len()),
        ]);
    }
    format!("Dependencies of {owner}:\n{table}\n")
}

/// Entities depending on `path`, plus the target's own status when known.
pub fn render_dependents(path: &str, node: Option<&DependencyInfo>, dependents: &[&str]) -> String {
    let mut out = match node {
        Some(info) if info.is_valid => {
            format!("{path} ({}, valid)\n", info.dependency_type.label())
        }
        Some(info) => format!(
            "{path} ({}, invalid: {})\n",
            info.dependency_type.label(),
            info.error_message.as_deref().unwrap_or("unknown error")
        ),
        None => format!("{path} is not a dependency of this mission\n"),
    };
    if dependents.is_empty() {
        return out;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Dependent")]);
    apply_table_style(&mut table);
    for dependent in dependents {
        table.add_row(vec![entity_cell(dependent)]);
    }
    out.push_str(&table.to_string());
    out.push('\n');
    out
}

/// Node positions and the bounding box of a layout.
pub fn render_layout(positions: &BTreeMap<String, Position>, bounds: Option<LayoutBounds>) -> String {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Node"), header_cell("X"), header_cell("Y")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (node, position) in positions {
        table.add_row(vec![
            entity_cell(node),
            Cell::new(format!("{:.2}", position.x)),
            Cell::new(format!("{:.2}", position.y)),
        ]);
    }
    let mut out = format!("{table}\n");
    if let Some(bounds) = bounds {
        out.push_str(&format!(
            "Bounds: {:.2} x {:.2}, centred at {:?}\n",
            bounds.width(),
            bounds.height(),
            bounds.center()
        ));
    }
    out
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
    if table.column_count() == 3 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(10)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::LowerBoundary(Width::Fixed(20)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(is_error: bool) -> Cell {
    if is_error {
        Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("WARN").fg(Color::Yellow)
    }
}

fn validity_cell(is_valid: bool) -> Cell {
    if is_valid {
        Cell::new("✓").fg(Color::Green)
    } else {
        Cell::new("✗")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}

/// Mission-level rows and entity keys are set apart by color.
fn entity_cell(key: &str) -> Cell {
    if key == "mission" {
        Cell::new(key).fg(Color::DarkGrey)
    } else {
        Cell::new(key).fg(Color::Cyan)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfred_model::ValidationResult;

    fn report() -> MissionValidationReport {
        let mut report = MissionValidationReport {
            mission: "Training 1".to_string(),
            pass_id: 3,
            completed_phases: vec![Phase::Objects, Phase::Assets],
            skipped_phases: vec![Phase::Expressions, Phase::Performance],
            elapsed_ms: 12,
            ..Default::default()
        };
        report
            .mission_result
            .add_warning("Validation timeout: 10 ms budget spent");
        report.entity_results.insert(
            "object:alpha-3".to_string(),
            ValidationResult::valid().with_error("Ship class 'GTF Hercules' not found"),
        );
        report
    }

    #[test]
    fn test_report_lists_every_message() {
        let text = render_report(&report());
        assert!(text.starts_with("Mission: Training 1\n"));
        assert!(text.contains("skipped"));
        assert!(text.contains("object:alpha-3"));
        assert!(text.contains("Ship class 'GTF Hercules' not found"));
        assert!(text.contains("Validation timeout"));
    }

    #[test]
    fn test_clean_report_has_no_issue_table() {
        let report = MissionValidationReport {
            mission: "Clean".to_string(),
            completed_phases: Phase::all().to_vec(),
            ..Default::default()
        };
        assert!(!render_report(&report).contains("Issues:"));
    }

    #[test]
    fn test_one_line_marks_truncation() {
        assert_eq!(
            one_line(&report()),
            "Training 1: pass 3: 1 errors, 1 warnings (12 ms), truncated"
        );
    }

    #[test]
    fn test_unknown_dependent_path() {
        let text = render_dependents("GTF Nothing", None, &[]);
        assert_eq!(text, "GTF Nothing is not a dependency of this mission\n");
    }
}

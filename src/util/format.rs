//! Plain-text rendering of reports.

use crate::data::{ContainerNode, DatasetDescriptor};
use crate::explorer::StructureReport;
use unicode_width::UnicodeWidthStr;

/// Render a structure report as an indented tree.
pub fn render_tree(report: &StructureReport, file_name: Option<&str>) -> String {
    let mut text = match file_name {
        Some(name) => format!("Tree Structure: {}\n", name),
        None => "Tree Structure\n".to_string(),
    };
    text.push_str(&"=".repeat(80));
    text.push_str("\n\n");
    text.push_str(&format_tree_recursive(&report.root, "", true));
    text.push_str(&format!(
        "\n{} groups, {} datasets\n",
        format_number(report.total_groups),
        format_number(report.total_datasets)
    ));
    if let Some(ref error) = report.error {
        text.push_str(&format!("Traversal stopped early: {}\n", error));
    }
    text
}

fn format_tree_recursive(node: &ContainerNode, prefix: &str, is_last: bool) -> String {
    let mut result = String::new();

    let connector = if is_last { "└── " } else { "├── " };
    result.push_str(&format!("{}{}{}\n", prefix, connector, node.display_name()));

    let new_prefix = format!("{}{}   ", prefix, if is_last { " " } else { "│" });

    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        let is_last_child = i == children.len() - 1;
        result.push_str(&format_tree_recursive(child, &new_prefix, is_last_child));
    }

    result
}

/// Render datasets as an aligned table: path, shape, type, elements, size.
pub fn render_dataset_table(datasets: &[DatasetDescriptor]) -> String {
    let header = ["Path", "Shape", "Type", "Elements", "Size"];
    let rows: Vec<[String; 5]> = datasets
        .iter()
        .map(|d| {
            [
                d.path.clone(),
                format_shape(&d.shape),
                d.dtype.to_string(),
                format_number(d.element_count),
                format_bytes(d.byte_size),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.width());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let mut text = String::new();
    push_row(&mut text, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut text, &rule, &widths);
    for row in &rows {
        push_row(&mut text, row, &widths);
    }
    text
}

fn push_row<S: AsRef<str>>(text: &mut String, cells: &[S], widths: &[usize]) {
    let last = cells.len().saturating_sub(1);
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        let cell = cell.as_ref();
        text.push_str(cell);
        if i < last {
            text.push_str(&" ".repeat(width.saturating_sub(cell.width()) + 2));
        }
    }
    text.push('\n');
}

/// Shape as `(a x b)`, or `scalar` for rank 0.
pub fn format_shape(shape: &[usize]) -> String {
    if shape.is_empty() {
        return "scalar".to_string();
    }
    let dims: Vec<String> = shape.iter().map(|d| d.to_string()).collect();
    format!("({})", dims.join(" x "))
}

/// Format a number with thousand separators.
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a byte count with a binary unit.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

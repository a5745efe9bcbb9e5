use std::io::Write;

use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;
use crate::commands::CommandResult;
use crate::error::CliError;

pub fn render(result: &CommandResult, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    match format {
        OutputFormat::Json => {
            let document = to_document(result);
            let payload = if pretty {
                serde_json::to_string_pretty(&document)?
            } else {
                serde_json::to_string(&document)?
            };
            writeln!(stdout, "{payload}")?;
        }
        OutputFormat::Table => {
            for line in render_table(result)? {
                writeln!(stdout, "{line}")?;
            }
        }
    }

    Ok(())
}

fn to_document(result: &CommandResult) -> Value {
    json!({
        "meta": {
            "catalog": result.summary,
            "warnings": result.warnings,
        },
        "data": result.data,
    })
}

fn render_table(result: &CommandResult) -> Result<Vec<String>, CliError> {
    let mut lines = vec![
        format!("markets     : {}", result.summary.markets),
        format!("submarkets  : {}", result.summary.submarkets),
        format!("symbols     : {}", result.summary.symbols),
    ];

    if !result.warnings.is_empty() {
        lines.push(String::from("warnings:"));
        lines.extend(result.warnings.iter().map(|warning| format!("  - {warning}")));
    }

    match first_row_list(&result.data) {
        Some(rows) => lines.extend(table_lines(rows)),
        None => {
            lines.push(String::from("data:"));
            let pretty_data = serde_json::to_string_pretty(&result.data)?;
            lines.extend(pretty_data.lines().map(|line| format!("  {line}")));
        }
    }

    Ok(lines)
}

/// First non-empty array of objects found among the top-level fields.
fn first_row_list(data: &Value) -> Option<&[Value]> {
    data.as_object()?
        .values()
        .filter_map(Value::as_array)
        .find(|rows| !rows.is_empty() && rows.iter().all(Value::is_object))
        .map(Vec::as_slice)
}

fn table_lines(rows: &[Value]) -> Vec<String> {
    let Some(columns) = rows.first().and_then(Value::as_object).map(column_names) else {
        return vec![String::from("(no rows)")];
    };

    let cells = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| cell_text(row.get(column)))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let widths = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            cells
                .iter()
                .map(|row| row[index].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect::<Vec<_>>();

    let format_row = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{value:<width$}", width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_owned()
    };

    let mut lines = vec![format_row(columns.as_slice())];
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.extend(cells.iter().map(|row| format_row(row.as_slice())));
    lines
}

fn column_names(row: &Map<String, Value>) -> Vec<String> {
    row.keys().cloned().collect()
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

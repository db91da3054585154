use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde_json::{Map, Value};
use wst_ipc::{Response, ViewInfo};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Print a flat record, e.g. a command's status.
pub fn print_fields(fields: &[(&str, Value)], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let object: Map<String, Value> = fields
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect();
            println!("{}", Value::Object(object));
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["FIELD", "VALUE"]);
            for (key, value) in fields {
                table.add_row(vec![key.to_string(), cell(value)]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let line: Vec<String> = fields
                .iter()
                .map(|(key, value)| format!("{key}={}", cell(value)))
                .collect();
            println!("{}", line.join(" "));
        }
    }
}

/// Print a compositor response.
pub fn print_response(response: &Response, format: OutputFormat) {
    let value = Value::from(response.clone());
    match format {
        OutputFormat::Json => println!("{value}"),
        OutputFormat::Pretty => println!(
            "{}",
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
        ),
        OutputFormat::Table => match &value {
            Value::Object(map) => {
                let mut table = new_table(vec!["FIELD", "VALUE"]);
                for (key, value) in map {
                    table.add_row(vec![key.clone(), cell(value)]);
                }
                println!("{table}");
            }
            Value::Array(items) => {
                let mut table = new_table(vec!["#", "VALUE"]);
                for (index, item) in items.iter().enumerate() {
                    table.add_row(vec![index.to_string(), cell(item)]);
                }
                println!("{table}");
            }
            scalar => println!("{}", cell(scalar)),
        },
    }
}

pub fn print_views(views: &[ViewInfo], format: OutputFormat) {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(views).unwrap_or_else(|_| "[]".to_string())
        ),
        OutputFormat::Table => {
            let mut table = new_table(vec!["ID", "APP-ID", "TITLE", "GEOMETRY"]);
            for view in views {
                table.add_row(vec![
                    view.id.to_string(),
                    view.app_id.clone(),
                    view.title.clone(),
                    geometry(view),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for view in views {
                println!(
                    "id={} app-id={} title={:?} geometry={}",
                    view.id,
                    view.app_id,
                    view.title,
                    geometry(view)
                );
            }
        }
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Strings print bare, everything else as compact JSON.
fn cell(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn geometry(view: &ViewInfo) -> String {
    match view.geometry() {
        Some(g) => format!("{}x{}+{}+{}", g.width, g.height, g.x, g.y),
        None => "-".to_string(),
    }
}

//! Terminal rendering of response objects

use crate::types::{JsonMap, ResponseObject, SchemaData, SchemaFragment};
use colored::Colorize;
use serde_json::Value;

/// Rows shown per schema before eliding
const MAX_ROWS_SHOWN: usize = 20;

/// Render any typed object as one or more lines
pub fn render_object(obj: &ResponseObject) -> String {
    match obj {
        ResponseObject::ApiError(err) => format!(
            "{} {} ({}): {}",
            "API error".red().bold(),
            err.response_status,
            err.call_id.dimmed(),
            err.description
        ),
        ResponseObject::RetrieveResponse(resp) => {
            let mut out = format!(
                "{} {} ({})",
                "Status".bold(),
                resp.response_status,
                resp.call_id.dimmed()
            );
            for fragment in &resp.data {
                out.push('\n');
                out.push_str(&render_fragment(fragment));
            }
            out
        }
        ResponseObject::SchemaData(data) => render_fragment(&SchemaFragment::Data(data.clone())),
        ResponseObject::ErrorSchemaData(err) => {
            render_fragment(&SchemaFragment::Error(err.clone()))
        }
        ResponseObject::ResponseStart(start) => format!(
            "{} {} ({})",
            "▶".cyan(),
            start.query,
            start.call_id.dimmed()
        ),
        ResponseObject::ResponseData(data) => data
            .data
            .iter()
            .map(render_fragment)
            .collect::<Vec<_>>()
            .join("\n"),
        ResponseObject::EarlyTermination(term) => {
            let mut out = format!(
                "{} {}: {}",
                "Stopped early".yellow().bold(),
                term.response_status,
                term.reason
            );
            if !term.extra.is_empty() {
                out.push_str(&format!("\n  {}", Value::Object(term.extra.clone())));
            }
            out
        }
        ResponseObject::ResponseResult(result) => {
            let answer = llm_text(&result.llm_response)
                .unwrap_or_else(|| Value::Object(result.llm_response.clone()).to_string());
            format!("{} {}\n{}", "Answer".green().bold(), result.response_status, answer)
        }
    }
}

/// Render one schema fragment: rows for data, message for errors
pub fn render_fragment(fragment: &SchemaFragment) -> String {
    match fragment {
        SchemaFragment::Data(data) => render_rows(data),
        SchemaFragment::Error(err) => {
            let mut out = format!(
                "{} [{}] {}",
                "✗".red(),
                err.schema_id,
                err.error_message
            );
            if let Some(detail) = &err.datastore_error {
                out.push_str(&format!("\n  {}", detail.dimmed()));
            }
            out
        }
    }
}

fn render_rows(data: &SchemaData) -> String {
    let mut out = format!(
        "{} [{}] {} row(s)",
        "✓".green(),
        data.schema_id,
        data.data.len()
    );
    out.push_str(&format!("\n  {}", data.query.dimmed()));

    for row in data.data.iter().take(MAX_ROWS_SHOWN) {
        out.push_str(&format!("\n  {}", Value::Object(row.clone())));
    }
    if data.data.len() > MAX_ROWS_SHOWN {
        out.push_str(&format!("\n  ... {} more", data.data.len() - MAX_ROWS_SHOWN));
    }
    if data.is_truncated {
        out.push_str(&format!(
            "\n  {}",
            format!("(truncated at {} rows)", data.max_rows).yellow()
        ));
    }
    out
}

/// Pull a plain-text answer out of the model payload, if it has one
fn llm_text(payload: &JsonMap) -> Option<String> {
    ["text", "answer", "content", "response"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

//! Markup projection of task records.
//!
//! Pure string-in/string-out. Every untrusted value (task fields, field
//! names, ids) passes through [`escape`] exactly once on its way into
//! markup; nothing else in the crate touches HTML.

use crate::protocol::Task;
use serde_json::Value;

/// Fields rendered inside `<pre>` so whitespace in scripts and their output
/// survives.
const PRE_FIELDS: &[&str] = &["code", "stdout", "stderr"];

/// HTML-entity escape for `&`, `<` and `>`; every other character passes
/// through unchanged. One-way: escaping an already escaped string encodes
/// the entities again.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the task list: one clickable row per task, in snapshot order.
/// An empty snapshot renders an empty container.
pub fn render_list(tasks: &[Task]) -> String {
    tasks.iter().map(render_row).collect()
}

fn render_row(task: &Task) -> String {
    let id = escape(&task.id.to_string());
    let name = match task.display_name() {
        Some(name) => escape(name),
        None => "<i>no name</i>".to_string(),
    };
    let state = escape(&task.state);
    format!(
        r##"<a href="#" data-task-id="{id}" class="list-group-item list-group-item-action"><div class="d-flex w-100 justify-content-between"><h5 class="mb-1">{name}</h5><small>{state}</small></div><p class="mb-1">{id}</p></a>"##
    )
}

/// Render one task as a key/value table, enumerating every field the record
/// carries, in record order.
pub fn render_detail(task: &Task) -> String {
    let mut html = String::from(
        r#"<table class="table table-bordered table-striped table-condensed table-hover"><tbody>"#,
    );
    for (key, value) in task.fields() {
        let cell = escape(&field_text(&value));
        html.push_str(r#"<tr><th scope="row">"#);
        html.push_str(&escape(key));
        html.push_str("</th><td>");
        if PRE_FIELDS.contains(&key) {
            html.push_str("<pre>");
            html.push_str(&cell);
            html.push_str("</pre>");
        } else {
            html.push_str(&cell);
        }
        html.push_str("</td></tr>");
    }
    html.push_str("</tbody></table>");
    html
}

/// Text form of a field value: strings verbatim, everything else (numbers,
/// booleans, null, nested structures) as its JSON form. Never fatal.
fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

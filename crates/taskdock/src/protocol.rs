use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Element ids the engine addresses on the page shell.
///
/// The shell must expose elements with these ids; everything else about its
/// layout is its own business.
pub mod ids {
    pub const LOGIN_PANEL: &str = "login-form";
    pub const MAIN_PANEL: &str = "main-ui";
    pub const CREATE_FORM: &str = "taskCreateForm";
    pub const DETAIL_PANEL: &str = "taskDetails";
    pub const TASK_LIST: &str = "taskListContainer";
    pub const DETAIL_TABLE: &str = "taskDetailsTable";
    pub const ALERT: &str = "alert";
}

/// Server-assigned task identifier. Integer or string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(i64),
    Text(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Number(n) => write!(f, "{n}"),
            TaskId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        TaskId::Number(n)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::Text(s.to_string())
    }
}

/// One task record as reported by the backend.
///
/// `id`, `name` and `state` are the fields the engine itself relies on.
/// Whatever else the server sends (`lang`, `code`, `stdout`, `stderr`,
/// fields added in later server versions) is carried in `extra`, in wire
/// order, so the detail view can enumerate it without code changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub state: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Display name, or `None` when the server sent no usable name.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Every field of the record in render order: the typed fields first,
    /// then the server extras in wire order.
    pub fn fields(&self) -> Vec<(&str, Value)> {
        let mut out = Vec::with_capacity(3 + self.extra.len());
        out.push(("id", self.id_value()));
        if let Some(name) = &self.name {
            out.push(("name", Value::String(name.clone())));
        }
        out.push(("state", Value::String(self.state.clone())));
        for (key, value) in &self.extra {
            out.push((key.as_str(), value.clone()));
        }
        out
    }

    fn id_value(&self) -> Value {
        match &self.id {
            TaskId::Number(n) => Value::from(*n),
            TaskId::Text(s) => Value::from(s.clone()),
        }
    }
}

/// Reply to `POST /api/tokens`.
///
/// The backend signals authentication failure in a 200 body rather than an
/// HTTP status, so both shapes are modeled here and callers must match.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AuthReply {
    Granted { token: String },
    Denied { error: bool, cause: String },
}

/// Reply to `GET /api/tasks`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskListReply {
    pub tasks: Vec<Task>,
}

/// Body for `POST /api/tasks`: the submitted script, verbatim.
///
/// No client-side validation of `lang` or size limits; enforcement is the
/// backend's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDraft {
    pub lang: String,
    pub name: String,
    pub code: String,
}

/// One mutation the engine asks the page shell to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageOp {
    Show { id: String },
    Hide { id: String },
    SetHtml { id: String, html: String },
    ResetForm { id: String },
}

/// One user interaction forwarded from the page shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// Login form submitted.
    Login { username: String, password: String },
    /// Task creation form submitted.
    CreateTask {
        lang: String,
        name: String,
        code: String,
    },
    /// A task row was clicked.
    OpenTask { id: TaskId },
    /// Back from the detail view to the list.
    CloseTask,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_id_accepts_numbers_and_strings() {
        let n: TaskId = serde_json::from_value(json!(7)).unwrap();
        let s: TaskId = serde_json::from_value(json!("7")).unwrap();
        assert_eq!(n, TaskId::Number(7));
        assert_eq!(s, TaskId::Text("7".into()));
        assert_ne!(n, s);
        assert_eq!(n.to_string(), s.to_string());
    }

    #[test]
    fn task_keeps_unknown_fields_in_wire_order() {
        let task: Task = serde_json::from_value(json!({
            "id": 3,
            "name": "hello",
            "state": "running",
            "lang": "python",
            "code": "print(1)",
            "stdout": "1\n"
        }))
        .unwrap();

        let keys: Vec<&str> = task.fields().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["id", "name", "state", "lang", "code", "stdout"]);
    }

    #[test]
    fn task_without_name_has_no_display_name() {
        let missing: Task = serde_json::from_value(json!({"id": 1, "state": "queued"})).unwrap();
        let empty: Task =
            serde_json::from_value(json!({"id": 2, "name": "", "state": "queued"})).unwrap();
        assert_eq!(missing.display_name(), None);
        assert_eq!(empty.display_name(), None);
    }

    #[test]
    fn auth_reply_parses_both_shapes() {
        let granted: AuthReply = serde_json::from_value(json!({"token": "abc"})).unwrap();
        assert!(matches!(granted, AuthReply::Granted { token } if token == "abc"));

        let denied: AuthReply =
            serde_json::from_value(json!({"error": true, "cause": "bad password"})).unwrap();
        assert!(matches!(denied, AuthReply::Denied { cause, .. } if cause == "bad password"));
    }

    #[test]
    fn page_op_wire_format_is_tagged() {
        let op = PageOp::SetHtml {
            id: ids::TASK_LIST.to_string(),
            html: "<i>no name</i>".to_string(),
        };
        let wire = serde_json::to_value(&op).unwrap();
        assert_eq!(
            wire,
            json!({"type": "set_html", "id": "taskListContainer", "html": "<i>no name</i>"})
        );
    }

    #[test]
    fn ui_event_wire_format_is_tagged() {
        let event: UiEvent =
            serde_json::from_value(json!({"type": "open_task", "id": 5})).unwrap();
        assert!(matches!(event, UiEvent::OpenTask { id } if id == TaskId::Number(5)));
    }
}

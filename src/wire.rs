use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::ValueType;

#[derive(Debug, Serialize)]
pub struct PipelineRequest {
    pub requests: Vec<Request>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    Execute { stmt: Stmt },
    Close {},
}

#[derive(Debug, Serialize)]
pub struct Stmt {
    pub sql: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<Arg>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_args: Option<Vec<NamedArg>>,
}

/// One encoded positional argument: wire type tag plus native JSON value.
#[derive(Debug, Serialize)]
pub struct Arg {
    #[serde(rename = "type")]
    pub kind: ValueType,
    pub value: JsonValue,
}

#[derive(Debug, Serialize)]
pub struct NamedArg {
    pub name: String,
    pub value: Arg,
}

/// Parsed pipeline response body: the per-step results, positionally aligned
/// with the request steps.
#[derive(Debug, Deserialize)]
pub struct PipelineResponse {
    pub results: Vec<StepResult>,
}

impl PipelineResponse {
    /// True iff every step's discriminant is `ok`.
    pub fn success(&self) -> bool {
        self.results.iter().all(StepResult::is_ok)
    }

    /// True iff at least one step's discriminant is `error`.
    ///
    /// Not the strict complement of [`success`](Self::success): a step whose
    /// discriminant is neither `ok` nor `error` leaves both false, and the
    /// client reports that as a protocol violation.
    pub fn failure(&self) -> bool {
        self.results.iter().any(StepResult::is_error)
    }

    /// First erroring step, by position.
    pub fn first_error(&self) -> Option<&StepResult> {
        self.results.iter().find(|step| step.is_error())
    }
}

#[derive(Debug, Deserialize)]
pub struct StepResult {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub response: Option<StepResponse>,
    #[serde(default)]
    pub error: Option<StepError>,
}

impl StepResult {
    pub fn is_ok(&self) -> bool {
        self.kind == "ok"
    }

    pub fn is_error(&self) -> bool {
        self.kind == "error"
    }
}

#[derive(Debug, Deserialize)]
pub struct StepError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct StepResponse {
    #[serde(default)]
    pub result: Option<ExecuteResult>,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteResult {
    #[serde(default)]
    pub cols: Vec<Col>,
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Deserialize)]
pub struct Col {
    pub name: String,
}

/// One result cell. Servers may attach a type tag next to `value`; only the
/// value is read.
#[derive(Debug, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub value: JsonValue,
}

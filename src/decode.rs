use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::{
    wire::{self, Arg, NamedArg, PipelineRequest, Request, Stmt},
    Params, PipeDbError, Result, Row, Value,
};

/// Encodes one parameter value into its wire form. Total: the tag comes from
/// the value typer, the payload keeps the native representation.
pub(crate) fn encode_arg(value: Value) -> Arg {
    Arg {
        kind: value.wire_type(),
        value: value.to_json(),
    }
}

pub(crate) fn build_stmt(sql: &str, params: Params) -> Stmt {
    match params {
        Params::None => Stmt {
            sql: sql.to_owned(),
            args: None,
            named_args: None,
        },
        Params::Positional(values) => {
            let args: Vec<Arg> = values.into_iter().map(encode_arg).collect();
            Stmt {
                sql: sql.to_owned(),
                args: (!args.is_empty()).then_some(args),
                named_args: None,
            }
        }
        Params::Named(pairs) => {
            let named_args: Vec<NamedArg> = pairs
                .into_iter()
                .map(|(name, value)| NamedArg {
                    name,
                    value: encode_arg(value),
                })
                .collect();
            Stmt {
                sql: sql.to_owned(),
                args: None,
                named_args: (!named_args.is_empty()).then_some(named_args),
            }
        }
    }
}

/// Builds the fixed two-step pipeline body: `execute` first, `close` second.
pub(crate) fn build_pipeline_request(sql: &str, params: Params) -> PipelineRequest {
    PipelineRequest {
        requests: vec![
            Request::Execute {
                stmt: build_stmt(sql, params),
            },
            Request::Close {},
        ],
    }
}

/// Decodes the execute step's result object into rows.
///
/// The column schema is read once from `cols` and shared by every row; each
/// register must align 1:1 with the schema.
pub(crate) fn decode_rows(result: wire::ExecuteResult) -> Result<Vec<Row>> {
    let schema: Arc<[String]> = result
        .cols
        .into_iter()
        .map(|col| col.name)
        .collect::<Vec<_>>()
        .into();

    result
        .rows
        .into_iter()
        .enumerate()
        .map(|(index, register)| {
            if register.len() != schema.len() {
                return Err(PipeDbError::Protocol(format!(
                    "row {index} has {} cells, expected {} to match cols",
                    register.len(),
                    schema.len()
                )));
            }
            let values = register
                .into_iter()
                .map(|cell| decode_cell(cell.value))
                .collect::<Result<Vec<_>>>()?;
            Ok(Row::new(Arc::clone(&schema), values))
        })
        .collect()
}

fn decode_cell(value: JsonValue) -> Result<Value> {
    match value {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(value) => Ok(Value::Bool(value)),
        JsonValue::Number(number) => number
            .as_i64()
            .map(Value::Integer)
            .or_else(|| number.as_f64().map(Value::Float))
            .ok_or_else(|| PipeDbError::Protocol(format!("unrepresentable number cell {number}"))),
        JsonValue::String(value) => Ok(Value::Text(value)),
        other => Err(PipeDbError::Protocol(format!(
            "non-scalar cell value: {other}"
        ))),
    }
}

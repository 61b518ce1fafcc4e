//! Procedure-name dispatch over the lookup service.
//!
//! Callers name a procedure (`pokemon.getPokemon` and friends) and hand over
//! its JSON input; they get back a JSON envelope holding either `result` or
//! a tagged `error`. The CLI's `call` command and any other transport sit on
//! top of this.

use crate::errors::{LookupError, LookupResult};
use crate::lookup::{LookupService, Operation};
use rmcp::model::{ErrorCode, ErrorData as McpError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use tracing::error;

const ROUTER_PREFIX: &str = "pokemon.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Procedure(Operation);

impl Procedure {
    pub fn operation(&self) -> Operation {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Procedure> {
        Operation::ALL.into_iter().map(Procedure)
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ROUTER_PREFIX}{}", self.0.as_str())
    }
}

impl FromStr for Procedure {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix(ROUTER_PREFIX).unwrap_or("");
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == name)
            .map(Procedure)
            .ok_or_else(|| {
                let known: Vec<String> = Procedure::all().map(|p| p.to_string()).collect();
                LookupError::BadRequest(format!(
                    "Unknown procedure '{s}'. Available: {}",
                    known.join(", ")
                ))
            })
    }
}

/// The error half of the response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: String,
    pub message: String,
}

impl From<&LookupError> for RpcError {
    fn from(err: &LookupError) -> Self {
        RpcError {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Serializes as `{"result": ..}` or `{"error": {"code", "message"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RpcResponse {
    Result(Value),
    Error(RpcError),
}

impl RpcResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, RpcResponse::Error(_))
    }
}

/// Runs one procedure against already-parsed input.
pub async fn call(
    service: &LookupService,
    procedure: Procedure,
    input: Value,
) -> LookupResult<Value> {
    match procedure.operation() {
        Operation::GetPokemon => {
            let name: String = parse_input(procedure, input, "a Pokemon name string")?;
            to_json(procedure, &service.get_by_name(&name).await?)
        }
        Operation::GetPokemonArray => {
            let names: Vec<String> =
                parse_input(procedure, input, "an array of Pokemon name strings")?;
            to_json(procedure, &service.get_many_by_name(&names).await?)
        }
        Operation::GetPokemonByType => {
            let kind: String = parse_input(procedure, input, "a type name string")?;
            to_json(procedure, &service.get_by_kind(&kind).await?)
        }
    }
}

/// Resolves `procedure`, parses `input` as JSON and wraps the outcome in a
/// response envelope. Never fails: every error becomes an `error` envelope.
pub async fn dispatch(service: &LookupService, procedure: &str, input: &str) -> RpcResponse {
    match resolve_and_call(service, procedure, input).await {
        Ok(value) => RpcResponse::Result(value),
        Err(err) => {
            if err == LookupError::Internal {
                error!(procedure, input, "procedure failed with an internal error");
            }
            RpcResponse::Error(RpcError::from(&err))
        }
    }
}

async fn resolve_and_call(
    service: &LookupService,
    procedure: &str,
    input: &str,
) -> LookupResult<Value> {
    let resolved: Procedure = procedure.parse()?;
    let value: Value = serde_json::from_str(input)
        .map_err(|err| LookupError::BadRequest(format!("Input is not valid JSON: {err}")))?;
    call(service, resolved, value).await
}

/// Maps a lookup failure onto an MCP error, carrying the wire code in `data`.
pub fn mcp_error(err: &LookupError) -> McpError {
    let code = match err {
        LookupError::BadRequest(_) => ErrorCode::INVALID_PARAMS,
        LookupError::NotFound(_) => ErrorCode::RESOURCE_NOT_FOUND,
        LookupError::RateLimited { .. } => ErrorCode(-32000),
        LookupError::Internal => ErrorCode::INTERNAL_ERROR,
    };
    McpError {
        code,
        message: Cow::from(err.to_string()),
        data: Some(json!({ "code": err.code() })),
    }
}

/// Splits comma-separated names the way the batch lookup form submits them.
pub fn parse_name_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_input<T: for<'de> Deserialize<'de>>(
    procedure: Procedure,
    input: Value,
    expected: &str,
) -> LookupResult<T> {
    serde_json::from_value(input)
        .map_err(|_| LookupError::BadRequest(format!("{procedure} expects {expected}")))
}

fn to_json<T: Serialize>(procedure: Procedure, output: &T) -> LookupResult<Value> {
    serde_json::to_value(output).map_err(|err| {
        error!(%procedure, error = %err, "failed to serialize response");
        LookupError::Internal
    })
}

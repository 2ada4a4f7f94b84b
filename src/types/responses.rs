//! Response object model
//!
//! Every wire object carries a `__type__` discriminator drawn from a closed
//! set of tags. The structs here are the strongly-typed view of those
//! objects; the default parse path (see [`crate::types::parse`]) only checks
//! the tag and leaves field validation to [`Tagged::to_typed`].
//!
//! [`Tagged::to_typed`]: crate::types::Tagged::to_typed

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Name of the discriminator field on every wire object
pub const DISCRIMINATOR: &str = "__type__";

/// Loosely-typed JSON object
pub type JsonMap = serde_json::Map<String, Value>;

/// The closed set of discriminator tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectKind {
    /// `RetrieveResponseError`
    ApiError,
    RetrieveResponse,
    ErrorSchemaData,
    SchemaData,
    ResponseStart,
    ResponseData,
    EarlyTermination,
    /// `ResponseLlmResult`
    ResponseResult,
}

impl ObjectKind {
    /// All recognised tags, in wire-documentation order
    pub const ALL: [ObjectKind; 8] = [
        ObjectKind::ApiError,
        ObjectKind::RetrieveResponse,
        ObjectKind::ErrorSchemaData,
        ObjectKind::SchemaData,
        ObjectKind::ResponseStart,
        ObjectKind::ResponseData,
        ObjectKind::EarlyTermination,
        ObjectKind::ResponseResult,
    ];

    /// Wire tag for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::ApiError => "apiError",
            ObjectKind::RetrieveResponse => "retrieveResponse",
            ObjectKind::ErrorSchemaData => "errorSchemaData",
            ObjectKind::SchemaData => "schemaData",
            ObjectKind::ResponseStart => "responseStart",
            ObjectKind::ResponseData => "responseData",
            ObjectKind::EarlyTermination => "earlyTermination",
            ObjectKind::ResponseResult => "responseResult",
        }
    }

    /// Look up a wire tag. Matching is exact and case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    /// Kinds the streaming endpoint emits as top-level events
    pub fn is_stream_event(&self) -> bool {
        matches!(
            self,
            ObjectKind::ErrorSchemaData
                | ObjectKind::ResponseStart
                | ObjectKind::ResponseData
                | ObjectKind::EarlyTermination
                | ObjectKind::ResponseResult
        )
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall outcome reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    NotFoundInSchema,
    Unknown,
    InternalServerError,
    AuthorizationFailed,
    LlmError,
    LlmTokenLimitReached,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Success => "SUCCESS",
            ResponseStatus::NotFoundInSchema => "NOT_FOUND_IN_SCHEMA",
            ResponseStatus::Unknown => "UNKNOWN",
            ResponseStatus::InternalServerError => "INTERNAL_SERVER_ERROR",
            ResponseStatus::AuthorizationFailed => "AUTHORIZATION_FAILED",
            ResponseStatus::LlmError => "LLM_ERROR",
            ResponseStatus::LlmTokenLimitReached => "LLM_TOKEN_LIMIT_REACHED",
        }
    }

    pub fn is_success(&self) -> bool {
        *self == ResponseStatus::Success
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(ResponseStatus::Success),
            "NOT_FOUND_IN_SCHEMA" => Ok(ResponseStatus::NotFoundInSchema),
            "UNKNOWN" => Ok(ResponseStatus::Unknown),
            "INTERNAL_SERVER_ERROR" => Ok(ResponseStatus::InternalServerError),
            "AUTHORIZATION_FAILED" => Ok(ResponseStatus::AuthorizationFailed),
            "LLM_ERROR" => Ok(ResponseStatus::LlmError),
            "LLM_TOKEN_LIMIT_REACHED" => Ok(ResponseStatus::LlmTokenLimitReached),
            other => Err(format!("unknown response status: {}", other)),
        }
    }
}

/// Successful structured-query result for one schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaData {
    pub schema_id: String,
    pub schema_type: String,
    /// Query text the service ran against the datastore
    pub query: String,
    /// Result rows, in service order
    pub data: Vec<JsonMap>,
    #[serde(default)]
    pub summary: JsonMap,
    pub max_rows: i64,
    pub is_truncated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}

/// Failed structured-query result for one schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSchemaData {
    pub schema_id: String,
    pub schema_type: String,
    pub query: String,
    pub error_message: String,
    /// Datastore-specific diagnostic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datastore_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}

/// Entry of a `data` sequence: either variant, order preserved as received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__type__")]
pub enum SchemaFragment {
    #[serde(rename = "schemaData")]
    Data(SchemaData),
    #[serde(rename = "errorSchemaData")]
    Error(ErrorSchemaData),
}

impl SchemaFragment {
    pub fn schema_id(&self) -> &str {
        match self {
            SchemaFragment::Data(d) => &d.schema_id,
            SchemaFragment::Error(e) => &e.schema_id,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SchemaFragment::Error(_))
    }
}

/// Full result of a non-streaming query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveResponse {
    pub call_id: String,
    pub data: Vec<SchemaFragment>,
    pub response_status: ResponseStatus,
}

/// API-level error returned instead of a `RetrieveResponse`
///
/// `response_status` is a free-form string here, unlike every other status
/// field in the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveResponseError {
    pub call_id: String,
    pub response_status: String,
    pub description: String,
}

/// First event of a streamed interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStart {
    pub call_id: String,
    pub query: String,
}

/// Intermediate streamed batch of schema fragments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseData {
    pub call_id: String,
    pub data: Vec<SchemaFragment>,
}

/// Stream ended before a final result was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarlyTermination {
    pub call_id: String,
    pub response_status: ResponseStatus,
    pub reason: String,
    #[serde(default)]
    pub extra: JsonMap,
}

/// Terminal streamed event carrying the natural-language answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseLlmResult {
    pub call_id: String,
    pub response_status: ResponseStatus,
    /// Shape is owned by the service
    #[serde(default)]
    pub llm_response: JsonMap,
}

/// Strongly-typed view of any wire object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__type__", rename_all = "camelCase")]
pub enum ResponseObject {
    ApiError(RetrieveResponseError),
    RetrieveResponse(RetrieveResponse),
    ErrorSchemaData(ErrorSchemaData),
    SchemaData(SchemaData),
    ResponseStart(ResponseStart),
    ResponseData(ResponseData),
    EarlyTermination(EarlyTermination),
    ResponseResult(ResponseLlmResult),
}

impl ResponseObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            ResponseObject::ApiError(_) => ObjectKind::ApiError,
            ResponseObject::RetrieveResponse(_) => ObjectKind::RetrieveResponse,
            ResponseObject::ErrorSchemaData(_) => ObjectKind::ErrorSchemaData,
            ResponseObject::SchemaData(_) => ObjectKind::SchemaData,
            ResponseObject::ResponseStart(_) => ObjectKind::ResponseStart,
            ResponseObject::ResponseData(_) => ObjectKind::ResponseData,
            ResponseObject::EarlyTermination(_) => ObjectKind::EarlyTermination,
            ResponseObject::ResponseResult(_) => ObjectKind::ResponseResult,
        }
    }

    /// Call-correlation id, when the variant carries one
    pub fn call_id(&self) -> Option<&str> {
        match self {
            ResponseObject::ApiError(e) => Some(&e.call_id),
            ResponseObject::RetrieveResponse(r) => Some(&r.call_id),
            ResponseObject::ErrorSchemaData(e) => e.call_id.as_deref(),
            ResponseObject::SchemaData(d) => d.call_id.as_deref(),
            ResponseObject::ResponseStart(s) => Some(&s.call_id),
            ResponseObject::ResponseData(d) => Some(&d.call_id),
            ResponseObject::EarlyTermination(t) => Some(&t.call_id),
            ResponseObject::ResponseResult(r) => Some(&r.call_id),
        }
    }
}

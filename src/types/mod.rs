//! Type definitions module
//!
//! Wire object model and the discriminated parser that tags raw JSON.

pub mod parse;
pub mod responses;

// Re-export commonly used types
pub use parse::{parse, parse_optional, parse_str, tag_object, Parsed, Tagged};
pub use responses::{
    EarlyTermination, ErrorSchemaData, JsonMap, ObjectKind, ResponseData, ResponseLlmResult,
    ResponseObject, ResponseStart, ResponseStatus, RetrieveResponse, RetrieveResponseError,
    SchemaData, SchemaFragment, DISCRIMINATOR,
};

//! Query request body and endpoint paths

use crate::types::JsonMap;
use serde::Serialize;

/// Endpoint of the query service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Non-streaming structured query: `.../retrieve`
    Retrieve,
    /// Streaming natural-language answer: `.../response`
    Response,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Retrieve => "retrieve",
            Route::Response => "response",
        }
    }
}

/// Build `{base}/[datafiles/{id}/]{route}`
///
/// The datafile segment is left out entirely when no id is given.
pub fn endpoint_url(base_url: &str, datafile_id: Option<&str>, route: Route) -> String {
    let base = base_url.trim_end_matches('/');
    match datafile_id.filter(|id| !id.is_empty()) {
        Some(id) => format!("{}/datafiles/{}/{}", base, id, route.as_str()),
        None => format!("{}/{}", base, route.as_str()),
    }
}

/// A natural-language query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub user_query: String,

    /// Caller hints passed through verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known_data: Option<JsonMap>,

    /// Target datafile; selects the path, never sent in the body
    #[serde(skip)]
    pub datafile_id: Option<String>,
}

impl QueryRequest {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            known_data: None,
            datafile_id: None,
        }
    }

    pub fn known_data(mut self, known_data: JsonMap) -> Self {
        self.known_data = Some(known_data);
        self
    }

    pub fn datafile(mut self, datafile_id: impl Into<String>) -> Self {
        self.datafile_id = Some(datafile_id.into());
        self
    }

    pub fn datafile_id(&self) -> Option<&str> {
        self.datafile_id.as_deref()
    }
}

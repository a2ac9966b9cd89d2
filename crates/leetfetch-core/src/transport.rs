//! Blocking HTTP transport for the GraphQL endpoint and the snapshot URL.

use std::sync::OnceLock;

use regex_lite::Regex;
use serde_json::{Value, json};
use tracing::debug;
use ureq::Agent;

use crate::error::FetchError;
use crate::settings::Settings;

const USER_AGENT: &str = concat!("leetfetch/", env!("CARGO_PKG_VERSION"));
const ORIGIN: &str = "https://leetcode.com";
const REFERER: &str = "https://leetcode.com/problemset/";

/// Outbound requests, behind a trait so tests can substitute a stub for the
/// HTTP client.
pub trait Transport {
    /// POST a GraphQL query and return the envelope's `data` object.
    fn graphql(&self, query: &str, variables: Value) -> Result<Value, FetchError>;

    /// GET a JSON document.
    fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// Transport over a shared agent with a fixed global timeout and no retry.
pub struct HttpTransport {
    agent: Agent,
    graphql_url: String,
    session: Option<String>,
}

impl HttpTransport {
    pub fn new(settings: &Settings) -> Self {
        // Non-2xx responses are handled manually so their bodies can be
        // surfaced in the error.
        let config = Agent::config_builder()
            .timeout_global(Some(settings.timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.new_agent(),
            graphql_url: settings.graphql_url.clone(),
            session: settings.session.clone(),
        }
    }
}

impl Transport for HttpTransport {
    fn graphql(&self, query: &str, variables: Value) -> Result<Value, FetchError> {
        let mut payload = json!({ "query": query, "variables": variables });
        if let Some(name) = operation_name(query) {
            payload["operationName"] = json!(name);
        }
        debug!(url = %self.graphql_url, operation = operation_name(query), "posting graphql query");
        let mut request = self
            .agent
            .post(&self.graphql_url)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .header("Origin", ORIGIN)
            .header("Referer", REFERER);
        if let Some(session) = &self.session {
            request = request.header("Cookie", format!("LEETCODE_SESSION={session}"));
        }
        let mut response = request.send_json(&payload).map_err(network)?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().map_err(network)?;
        if !(200..300).contains(&status) {
            return Err(FetchError::Endpoint(format!("HTTP {status}: {body}")));
        }
        let envelope: Value = serde_json::from_str(&body)
            .map_err(|err| FetchError::Endpoint(format!("invalid JSON response: {err}")))?;
        unwrap_envelope(envelope)
    }

    fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!(url, "fetching json document");
        let mut response = self
            .agent
            .get(url)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(network)?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().map_err(network)?;
        if !(200..300).contains(&status) {
            return Err(FetchError::Endpoint(format!("HTTP {status}: {body}")));
        }
        serde_json::from_str(&body)
            .map_err(|err| FetchError::Endpoint(format!("invalid JSON response: {err}")))
    }
}

fn network(err: ureq::Error) -> FetchError {
    FetchError::Network(err.to_string())
}

/// Split a GraphQL envelope into its `data`, surfacing reported errors.
fn unwrap_envelope(mut envelope: Value) -> Result<Value, FetchError> {
    if let Some(errors) = envelope.get("errors").filter(|e| !e.is_null()) {
        return Err(FetchError::Endpoint(errors.to_string()));
    }
    match envelope.get_mut("data") {
        Some(data) if !data.is_null() => Ok(data.take()),
        _ => Err(FetchError::Endpoint("response carried no data".into())),
    }
}

/// Pull the operation name out of the query text for the request body.
fn operation_name(query: &str) -> Option<&str> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| Regex::new(r"query\s+(\w+)").expect("operation name pattern"));
    re.captures(query).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operation_name_is_extracted_from_query_text() {
        assert_eq!(
            operation_name("query problemsetQuestionList($skip: Int) { x }"),
            Some("problemsetQuestionList")
        );
        assert_eq!(operation_name("\nquery question($titleSlug: String!) { x }"), Some("question"));
        assert_eq!(operation_name("{ anonymous }"), None);
    }

    #[test]
    fn envelope_data_is_unwrapped() {
        let data = unwrap_envelope(json!({"data": {"question": {"title": "Two Sum"}}})).unwrap();
        assert_eq!(data, json!({"question": {"title": "Two Sum"}}));
    }

    #[test]
    fn envelope_errors_surface_as_endpoint_error() {
        let err = unwrap_envelope(json!({"errors": [{"message": "nope"}], "data": null}))
            .unwrap_err();
        assert!(matches!(err, FetchError::Endpoint(msg) if msg.contains("nope")));
    }

    #[test]
    fn envelope_without_data_is_an_endpoint_error() {
        assert!(unwrap_envelope(json!({})).is_err());
        assert!(unwrap_envelope(json!({"data": null})).is_err());
    }
}

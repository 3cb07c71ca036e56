//! Thin HTTP transport over [`reqwest`].
//!
//! The client core never talks to the network directly; it goes through
//! [`HttpTransport`], which issues GET/POST requests with JSON bodies against
//! a fixed base URI and hands back the status code plus raw body. The scheme
//! of the base URI (`http`/`https`) decides whether the connection is
//! secured.

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{PipeDbError, Result};

/// Reusable transport handle, built once at client construction.
///
/// Safe for sequential reuse across calls; `reqwest::Client` is internally
/// reference-counted, so clones share the same connection pool.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
    base: Url,
}

/// Raw HTTP response: status code plus unparsed body text.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    /// Parses the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|err| {
            PipeDbError::Protocol(format!(
                "response body is not valid JSON: {err}; body: {}",
                self.body
            ))
        })
    }
}

impl HttpTransport {
    pub fn new(base: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Issues a GET request against `path` on the base URI.
    pub async fn get(&self, path: &str) -> Result<HttpResponse> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(PipeDbError::Transport)?;
        Self::into_response(response).await
    }

    /// Issues a POST request with a JSON body against `path` on the base URI.
    ///
    /// `Content-Type: application/json` is set by the JSON body encoder.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<HttpResponse> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(PipeDbError::Transport)?;
        Self::into_response(response).await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base.join(path).map_err(|err| {
            PipeDbError::Config(format!("invalid endpoint path '{path}': {err}"))
        })
    }

    async fn into_response(response: reqwest::Response) -> Result<HttpResponse> {
        let status = response.status();
        let body = response.text().await.map_err(PipeDbError::Transport)?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::{StatusCode, Url};

    use super::{HttpResponse, HttpTransport};
    use crate::PipeDbError;

    #[test]
    fn endpoint_joins_path_onto_base() {
        let transport =
            HttpTransport::new(Url::parse("http://localhost:8080").expect("must parse"));
        let url = transport.endpoint("/v2/pipeline").expect("must join");
        assert_eq!(url.as_str(), "http://localhost:8080/v2/pipeline");
    }

    #[test]
    fn json_parses_body() {
        let response = HttpResponse {
            status: StatusCode::OK,
            body: r#"{"results":[]}"#.to_owned(),
        };
        let body: serde_json::Value = response.json().expect("must parse");
        assert_eq!(body, serde_json::json!({ "results": [] }));
    }

    #[test]
    fn non_json_body_is_a_protocol_error() {
        let response = HttpResponse {
            status: StatusCode::OK,
            body: "<html>oops</html>".to_owned(),
        };
        let err = response
            .json::<serde_json::Value>()
            .expect_err("must fail");
        assert!(matches!(err, PipeDbError::Protocol(_)));
    }
}

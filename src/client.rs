use std::fmt;

use crate::{
    decode,
    transport::HttpTransport,
    wire, Config, Params, PipeDbError, Result, Row,
};

/// Fixed pipeline endpoint path on the base URI.
const PIPELINE_ENDPOINT: &str = "/v2/pipeline";

/// HTTP client for the SQL pipeline endpoint.
///
/// One `execute` call is one network round trip: a two-step
/// `execute` + `close` pipeline is posted, the response fully buffered and
/// decoded. The base URI and transport handle are fixed at construction.
#[derive(Clone)]
pub struct PipeDbClient {
    transport: HttpTransport,
}

impl fmt::Debug for PipeDbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipeDbClient")
            .field("base_url", &self.transport.base_url().as_str())
            .finish()
    }
}

impl PipeDbClient {
    /// Creates a client from a connection [`Config`].
    ///
    /// Resolves the base URI immediately; invalid configuration is
    /// [`PipeDbError::Config`] and fatal to this instance.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(config.base_url()?),
        })
    }

    /// Creates a client from a full base URL.
    pub fn from_url(url: impl Into<String>) -> Result<Self> {
        Self::new(Config::new().url(url))
    }

    /// Creates a client from a host (scheme included) and port.
    pub fn from_host_port(host: impl Into<String>, port: u16) -> Result<Self> {
        Self::new(Config::new().host(host).port(port))
    }

    /// Executes one SQL statement and returns the decoded rows.
    ///
    /// `params` may be `()` (no parameters), positional values or named
    /// pairs; see [`Params`]. A server-reported step failure surfaces as
    /// [`PipeDbError::Query`] carrying the first failing step's message.
    pub async fn execute<P: Into<Params>>(&self, sql: &str, params: P) -> Result<Vec<Row>> {
        let payload = decode::build_pipeline_request(sql, params.into());

        #[cfg(feature = "tracing")]
        tracing::debug!(%sql, "sending pipeline request");

        let response = self.transport.post(PIPELINE_ENDPOINT, &payload).await?;
        if !response.status.is_success() {
            return Err(PipeDbError::Http {
                status: response.status.as_u16(),
                body: response.body,
            });
        }

        let envelope: wire::PipelineResponse = response.json()?;

        if let Some(step) = envelope.first_error() {
            let error = step.error.as_ref().ok_or_else(|| {
                PipeDbError::Protocol("error step is missing its error payload".to_owned())
            })?;
            return Err(PipeDbError::Query {
                message: error.message.clone(),
            });
        }

        // failure() already handled; any step left that is not "ok" carries a
        // discriminant outside the protocol.
        if !envelope.success() {
            let kind = envelope
                .results
                .iter()
                .find(|step| !step.is_ok())
                .map(|step| step.kind.clone())
                .unwrap_or_default();
            return Err(PipeDbError::Protocol(format!(
                "pipeline step type '{kind}' is neither ok nor error"
            )));
        }

        let mut results = envelope.results.into_iter();
        let execute = results.next().ok_or_else(|| {
            PipeDbError::Protocol("pipeline response carries no results".to_owned())
        })?;
        let result = execute
            .response
            .and_then(|response| response.result)
            .ok_or_else(|| {
                PipeDbError::Protocol("execute step is missing its result payload".to_owned())
            })?;

        let rows = decode::decode_rows(result)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(rows = rows.len(), "pipeline response decoded");

        Ok(rows)
    }
}

use reqwest::Url;

use crate::{PipeDbError, Result};

/// Client connection target.
///
/// Exactly one form must be supplied: a full base URL, or a host (with
/// scheme) plus port combined at construction time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    url: Option<String>,
    host: Option<String>,
    port: Option<u16>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a full base URL, e.g. `https://db.example.com:8080`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the host, scheme included, e.g. `http://localhost`.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Resolves the configuration into the immutable base URI.
    ///
    /// Fails fast on missing or conflicting forms, unparsable URIs and
    /// non-http(s) schemes.
    pub(crate) fn base_url(&self) -> Result<Url> {
        let raw = match (&self.url, &self.host, self.port) {
            (Some(url), None, None) => url.clone(),
            (None, Some(host), Some(port)) => format!("{host}:{port}"),
            (None, None, None) => {
                return Err(PipeDbError::Config(
                    "either url or host and port must be provided".to_owned(),
                ))
            }
            (Some(_), _, _) => {
                return Err(PipeDbError::Config(
                    "url and host/port are mutually exclusive".to_owned(),
                ))
            }
            (None, _, _) => {
                return Err(PipeDbError::Config(
                    "host and port must both be provided".to_owned(),
                ))
            }
        };

        let url = Url::parse(&raw)
            .map_err(|err| PipeDbError::Config(format!("invalid base URI '{raw}': {err}")))?;

        // Url::parse accepts "localhost:8080" by reading "localhost" as the
        // scheme; insist on http(s) so that mistake fails at construction.
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(PipeDbError::Config(format!(
                "unsupported scheme '{other}' in base URI '{raw}'"
            ))),
        }
    }
}

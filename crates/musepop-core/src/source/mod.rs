//! Outbound HTTP access to the upstream JSON APIs.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;

/// One GET request against a JSON API.
#[derive(Debug, Clone)]
pub struct JsonRequest<'a> {
    pub url: &'a str,
    pub query: Vec<(&'static str, String)>,
    pub timeout: Duration,
    pub bearer: Option<&'a str>,
}

impl<'a> JsonRequest<'a> {
    pub fn new(url: &'a str, timeout: Duration) -> Self {
        Self {
            url,
            query: Vec::new(),
            timeout,
            bearer: None,
        }
    }

    pub fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    pub fn bearer(mut self, token: Option<&'a str>) -> Self {
        self.bearer = token;
        self
    }

    /// Value of a query parameter, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Anything that can answer a JSON GET request.
///
/// Implemented by [`HttpClient`] for live access; tests substitute
/// scripted sources.
pub trait HttpSource {
    fn get_json(&self, request: &JsonRequest<'_>) -> Result<Value, FetchError>;
}

impl<T: HttpSource + ?Sized> HttpSource for Box<T> {
    fn get_json(&self, request: &JsonRequest<'_>) -> Result<Value, FetchError> {
        (**self).get_json(request)
    }
}

/// Blocking HTTP client that identifies itself with a user agent.
pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl HttpSource for HttpClient {
    fn get_json(&self, request: &JsonRequest<'_>) -> Result<Value, FetchError> {
        debug!("GET {} {:?}", request.url, request.query);

        let mut builder = self
            .client
            .get(request.url)
            .query(&request.query)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(request.timeout);
        if let Some(token) = request.bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: request.url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<Value>().map_err(|e| FetchError::Decode {
            url: request.url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// A source that fails every request, for offline runs.
pub struct OfflineSource;

impl HttpSource for OfflineSource {
    fn get_json(&self, request: &JsonRequest<'_>) -> Result<Value, FetchError> {
        Err(FetchError::Transport(format!(
            "offline mode, not requesting {}",
            request.url
        )))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::*;

    /// Answers requests from a closure and records the `action` of each call.
    pub struct ScriptedSource<F> {
        respond: F,
        pub calls: RefCell<Vec<String>>,
    }

    impl<F> ScriptedSource<F>
    where
        F: Fn(&JsonRequest<'_>) -> Result<Value, FetchError>,
    {
        pub fn new(respond: F) -> Self {
            Self {
                respond,
                calls: RefCell::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl<F> HttpSource for ScriptedSource<F>
    where
        F: Fn(&JsonRequest<'_>) -> Result<Value, FetchError>,
    {
        fn get_json(&self, request: &JsonRequest<'_>) -> Result<Value, FetchError> {
            self.calls
                .borrow_mut()
                .push(request.get("action").unwrap_or_default().to_string());
            (self.respond)(request)
        }
    }
}

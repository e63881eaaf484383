//! Ordered proxy fallback over the retrying transport.
//!
//! Each configured route gets the full retry budget before the chain
//! advances; a categorically broken proxy is ruled out early instead of
//! interleaving wasted attempts across routes.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{FetchError, ProxyFailure};
use crate::fetch::retry::RetryPolicy;
use crate::fetch::transport::Transport;

/// How a target URL is handed to one proxy endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ProxyRoute {
    /// No rewrite; hit the upstream directly.
    Direct,
    /// Encoded target appended to the prefix (corsproxy style).
    Prefix { url: String },
    /// Encoded target passed as a query parameter (allorigins style).
    Query {
        url: String,
        #[serde(default = "default_query_param")]
        param: String,
    },
}

fn default_query_param() -> String {
    "url".into()
}

impl ProxyRoute {
    /// Rewrite `target` for this route.
    #[must_use]
    pub fn rewrite(&self, target: &str) -> String {
        match self {
            Self::Direct => target.to_string(),
            Self::Prefix { url } => format!("{url}{}", urlencoding::encode(target)),
            Self::Query { url, param } => {
                let sep = if url.contains('?') { '&' } else { '?' };
                format!("{url}{sep}{param}={}", urlencoding::encode(target))
            }
        }
    }

    /// Short name for logs and failure reports.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Direct => "direct",
            Self::Prefix { url } | Self::Query { url, .. } => url,
        }
    }
}

/// Retrying transport with ordered proxy fallback.
pub struct ProxyChain<T> {
    transport: T,
    routes: Vec<ProxyRoute>,
    retry: RetryPolicy,
}

impl<T: Transport> ProxyChain<T> {
    /// `routes` must be non-empty; config validation enforces this.
    #[must_use]
    pub fn new(transport: T, routes: Vec<ProxyRoute>, retry: RetryPolicy) -> Self {
        Self {
            transport,
            routes,
            retry,
        }
    }

    /// Fetch `target` through the first route that yields a JSON body
    /// within its retry budget.
    ///
    /// Fails with [`FetchError::AllProxiesFailed`] carrying every route's
    /// terminal failure only once the whole chain is exhausted.
    pub async fn fetch(&self, target: &str) -> Result<Value, FetchError> {
        let mut failures = Vec::with_capacity(self.routes.len());

        for route in &self.routes {
            let url = route.rewrite(target);
            debug!(proxy = route.label(), url = %url, "trying route");

            match self.retry.run(|| self.transport.get(&url)).await {
                Ok(body) => return Ok(body),
                Err(err) => {
                    warn!(proxy = route.label(), error = %err, "route exhausted, advancing");
                    failures.push(ProxyFailure {
                        proxy: route.label().to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        Err(FetchError::AllProxiesFailed { failures })
    }
}

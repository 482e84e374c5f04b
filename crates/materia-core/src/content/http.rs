//! JSON content API client

use std::time::Duration;

use super::FormulaSource;
use crate::error::{MateriaError, Result};
use crate::formula::{parse_formula_pool, Formula};

/// Default timeout for content API requests
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Formula pool served by the content API
pub struct HttpSource {
    url: String,
    timeout: Duration,
    user_agent: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout_seconds: u64) -> Self {
        let user_agent = format!(
            "materia/{} ({})",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS
        );
        Self {
            url: url.into(),
            timeout: Duration::from_secs(timeout_seconds),
            user_agent,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl FormulaSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch_formulas(&self) -> Result<Vec<Formula>> {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .build()
            .into();

        tracing::debug!(url = %self.url, "fetching formula pool");

        // non-2xx statuses surface as errors here
        let mut response = agent
            .get(self.url.as_str())
            .header("Accept", "application/json")
            .header("User-Agent", self.user_agent.as_str())
            .call()
            .map_err(|e| MateriaError::content_unavailable(&self.url, e))?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| MateriaError::content_unavailable(&self.url, e))?;

        parse_formula_pool(&body, &self.url)
    }
}

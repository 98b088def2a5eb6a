//! Client for the FFSU licence register.
//!
//! The register has no API: a lookup is a form POST returning an HTML
//! results page, which [`parse_license_rows`] turns into licence rows.

use std::time::Duration;

use hyperion_core::competition::{
    ffsu_form, has_license, parse_license_rows, LicenseRow, ScrapeError, FFSU_TIMEOUT_SECS,
};

/// HTTP client for the FFSU licence register.
pub struct FfsuClient {
    client: reqwest::Client,
    url: String,
}

impl FfsuClient {
    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    /// Look up the licence holders registered under `school_ffsu_id` with
    /// the given name.
    pub async fn lookup(
        &self,
        school_ffsu_id: &str,
        name: &str,
        firstname: &str,
    ) -> Result<Vec<LicenseRow>, ScrapeError> {
        let response = self
            .client
            .post(&self.url)
            .form(&ffsu_form(school_ffsu_id, name, firstname))
            .timeout(Duration::from_secs(FFSU_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| ScrapeError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Request(format!(
                "register answered with status {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScrapeError::Request(e.to_string()))?;
        parse_license_rows(&body)
    }

    /// Whether `license` is listed for this person. Lookup failures are
    /// logged and count as not found.
    pub async fn check_license(
        &self,
        school_ffsu_id: &str,
        name: &str,
        firstname: &str,
        license: &str,
    ) -> bool {
        match self.lookup(school_ffsu_id, name, firstname).await {
            Ok(rows) => has_license(&rows, license),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    school_ffsu_id,
                    "FFSU licence lookup failed",
                );
                false
            }
        }
    }
}

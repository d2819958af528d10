//! Blocking HTTP session used to retrieve resources missing from an archive

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::core::{MhtmlError, MhtmlOptions, Result};

use super::fetch::{FetchedResource, ResourceFetcher};

/// User agent sent when none is configured
pub fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

pub struct Session {
    client: Client,
}

impl Session {
    pub fn new(options: &MhtmlOptions) -> Result<Self> {
        let user_agent = options
            .user_agent
            .clone()
            .unwrap_or_else(default_user_agent);

        let mut builder = Client::builder()
            .user_agent(user_agent)
            .danger_accept_invalid_certs(options.insecure);
        if options.timeout > 0 {
            builder = builder.timeout(Duration::from_secs(options.timeout));
        }

        let client = builder
            .build()
            .map_err(|err| MhtmlError::InvalidOption(format!("cannot build HTTP client: {}", err)))?;

        Ok(Session { client })
    }
}

impl ResourceFetcher for Session {
    fn fetch(&self, url: &str) -> Result<FetchedResource> {
        debug!(url, "fetching");

        let response = self.client.get(url).send().map_err(|err| MhtmlError::Fetch {
            url: url.to_string(),
            message: err.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MhtmlError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().map_err(|err| MhtmlError::Fetch {
            url: url.to_string(),
            message: err.to_string(),
        })?;

        Ok(FetchedResource {
            content_type,
            body: body.to_vec(),
        })
    }
}

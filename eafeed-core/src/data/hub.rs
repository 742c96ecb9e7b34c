//! Hugging Face Hub dataset source.
//!
//! Datasets on the Hub are served as parquet shards through the dataset
//! viewer's conversion API. `load_table` lists the shards of the configured
//! config/split, downloads each one and stacks them in listing order.
//!
//! Requests block the calling thread. No timeout is applied unless
//! `hub.timeout_secs` is configured.

use polars::prelude::*;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use std::io::Cursor;
use std::time::Duration;
use tracing::debug;

use super::source::{DataError, DatasetSource};
use crate::settings::{Credentials, HubSettings};

const USER_AGENT: &str = concat!("eafeed/", env!("CARGO_PKG_VERSION"));

/// Dataset source backed by the Hugging Face Hub.
pub struct HubSource {
    client: Client,
    endpoint: String,
    config: String,
    split: String,
    token: Option<SecretString>,
}

impl HubSource {
    pub fn new(settings: &HubSettings, credentials: &Credentials) -> Result<Self, DataError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout_secs.map(Duration::from_secs))
            .build()
            .map_err(|e| DataError::NetworkUnreachable(format!("failed to build HTTP client: {e}")))?;

        let token = if credentials.password.expose_secret().is_empty() {
            None
        } else {
            Some(SecretString::new(credentials.password.expose_secret().into()))
        };

        debug!(
            endpoint = %settings.endpoint,
            username = %credentials.username,
            authenticated = token.is_some(),
            "hub source ready"
        );

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            config: settings.config.clone(),
            split: settings.split.clone(),
            token,
        })
    }

    /// Shard listing URL for a dataset.
    fn parquet_index_url(&self, dataset: &str) -> String {
        format!(
            "{}/api/datasets/{dataset}/parquet/{}/{}",
            self.endpoint, self.config, self.split
        )
    }

    fn get(&self, dataset: &str, url: &str) -> Result<Response, DataError> {
        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }
        let response = request
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        check_status(dataset, response)
    }

    fn shard_urls(&self, dataset: &str) -> Result<Vec<String>, DataError> {
        self.get(dataset, &self.parquet_index_url(dataset))?
            .json()
            .map_err(|e| DataError::ResponseFormatChanged(format!("shard listing for {dataset}: {e}")))
    }

    fn download_shard(&self, dataset: &str, url: &str) -> Result<DataFrame, DataError> {
        let bytes = self
            .get(dataset, url)?
            .bytes()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        debug!(dataset, url, size = bytes.len(), "downloaded parquet shard");

        ParquetReader::new(Cursor::new(bytes.to_vec()))
            .finish()
            .map_err(|e| DataError::Parquet(format!("{url}: {e}")))
    }
}

impl DatasetSource for HubSource {
    fn name(&self) -> &str {
        "huggingface_hub"
    }

    fn load_table(&self, dataset: &str) -> Result<DataFrame, DataError> {
        let urls = self.shard_urls(dataset)?;
        debug!(dataset, shards = urls.len(), "loading dataset");

        let (first, rest) = urls.split_first().ok_or_else(|| {
            DataError::ResponseFormatChanged(format!("no parquet shards listed for {dataset}"))
        })?;

        let mut table = self.download_shard(dataset, first)?;
        for url in rest {
            let shard = self.download_shard(dataset, url)?;
            table
                .vstack_mut(&shard)
                .map_err(|e| DataError::Frame(format!("stacking shards of {dataset}: {e}")))?;
        }
        Ok(table)
    }
}

/// Map non-success statuses onto structured errors.
fn check_status(dataset: &str, response: Response) -> Result<Response, DataError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DataError::AuthenticationRequired(
            format!("{dataset} rejected the supplied credentials ({status})"),
        ),
        StatusCode::NOT_FOUND => DataError::DatasetNotFound {
            dataset: dataset.to_string(),
        },
        _ => DataError::Http {
            status: status.as_u16(),
            dataset: dataset.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(endpoint: &str) -> HubSource {
        let settings = HubSettings {
            endpoint: endpoint.into(),
            ..HubSettings::default()
        };
        HubSource::new(&settings, &Credentials::default()).unwrap()
    }

    #[test]
    fn index_url_uses_config_and_split() {
        let hub = source("https://huggingface.co/");
        assert_eq!(
            hub.parquet_index_url("edarchimbaud/timeseries-1d-stocks"),
            "https://huggingface.co/api/datasets/edarchimbaud/timeseries-1d-stocks/parquet/default/train"
        );
    }

    #[test]
    fn empty_password_means_anonymous() {
        assert!(source("https://huggingface.co").token.is_none());

        let credentials = Credentials {
            username: "someone".into(),
            password: SecretString::new("hf_token".into()),
        };
        let hub = HubSource::new(&HubSettings::default(), &credentials).unwrap();
        assert_eq!(
            hub.token.as_ref().map(|t| t.expose_secret().to_string()),
            Some("hf_token".to_string())
        );
    }

    #[test]
    fn unreachable_endpoint_is_network_error() {
        // Port 9 (discard) on localhost is refused on any normal test machine.
        let hub = source("http://127.0.0.1:9");
        assert!(matches!(
            hub.load_table("edarchimbaud/perimeter-stocks"),
            Err(DataError::NetworkUnreachable(_))
        ));
    }
}

//! Gateway configuration.

use std::time::Duration;

use figment::{
    providers::{Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{MediaError, MediaResult};

/// Maximum presigned URL TTL (7 days, S3 limit).
pub const MAX_PRESIGN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Configuration for the media storage gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaStorageConfig {
    /// Store endpoint as host:port (e.g. `localhost:9000` or
    /// `s3.us-east-1.amazonaws.com`).
    pub endpoint: String,

    /// Whether to talk to the endpoint over TLS.
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,

    #[serde(default = "default_region")]
    pub region: String,

    /// Bucket all media objects live in. Created at startup if absent.
    pub bucket: String,

    pub access_key_id: String,
    pub secret_access_key: String,

    /// Public base URL display URLs are templated from
    /// (e.g. `https://cdn.example.com/storefront-media`).
    pub public_base_url: String,

    /// TTL of the display URL returned by uploads.
    #[serde(default = "default_presign_ttl_secs")]
    pub presign_ttl_secs: u64,

    /// Content type applied to every upload. Payloads are assumed to be
    /// images; nothing is sniffed.
    #[serde(default = "default_content_type")]
    pub content_type: String,

    /// Upper bound on concurrent store calls per batch.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_use_tls() -> bool {
    true
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_presign_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_content_type() -> String {
    "image/png".to_string()
}

fn default_max_concurrency() -> usize {
    8
}

impl MediaStorageConfig {
    /// Load and validate a configuration from a YAML file.
    pub fn from_path(path: &str) -> MediaResult<Self> {
        let config_str = std::fs::read_to_string(path).map_err(|e| MediaError::InvalidConfig {
            reason: format!("cannot read config file {}: {}", path, e),
        })?;
        let config: MediaStorageConfig = Figment::new()
            .merge(Yaml::string(&config_str))
            .extract()
            .map_err(|e| MediaError::InvalidConfig {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MediaResult<()> {
        if self.bucket.is_empty() {
            return Err(invalid("bucket must not be empty"));
        }
        if self.access_key_id.is_empty() || self.secret_access_key.is_empty() {
            return Err(invalid("static credentials must not be empty"));
        }
        if Url::parse(&self.endpoint_url()).is_err() {
            return Err(invalid(&format!("invalid endpoint: {}", self.endpoint)));
        }
        if Url::parse(&self.public_base_url).is_err() {
            return Err(invalid(&format!(
                "invalid public base URL: {}",
                self.public_base_url
            )));
        }
        if self.presign_ttl_secs == 0 || self.presign_ttl_secs > MAX_PRESIGN_TTL_SECS {
            return Err(invalid(&format!(
                "presign TTL must be between 1 and {} seconds",
                MAX_PRESIGN_TTL_SECS
            )));
        }
        if self.max_concurrency == 0 {
            return Err(invalid("max_concurrency must be at least 1"));
        }
        Ok(())
    }

    /// Endpoint URL with the scheme chosen by the TLS flag.
    pub(crate) fn endpoint_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{}://{}", scheme, self.endpoint)
    }

    pub(crate) fn presign_ttl(&self) -> Duration {
        Duration::from_secs(self.presign_ttl_secs)
    }
}

fn invalid(reason: &str) -> MediaError {
    MediaError::InvalidConfig {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_yaml() -> &'static str {
        r#"
endpoint: localhost:9000
bucket: storefront-media
access_key_id: test
secret_access_key: test
public_base_url: https://cdn.example.test/storefront-media
"#
    }

    fn parse(yaml: &str) -> MediaStorageConfig {
        Figment::new()
            .merge(Yaml::string(yaml))
            .extract()
            .unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let config = parse(minimal_yaml());
        assert!(config.use_tls);
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.presign_ttl_secs, 24 * 60 * 60);
        assert_eq!(config.content_type, "image/png");
        assert_eq!(config.max_concurrency, 8);
        config.validate().unwrap();
    }

    #[test]
    fn test_endpoint_scheme_follows_tls_flag() {
        let mut config = parse(minimal_yaml());
        assert_eq!(config.endpoint_url(), "https://localhost:9000");
        config.use_tls = false;
        assert_eq!(config.endpoint_url(), "http://localhost:9000");
    }

    #[test]
    fn test_rejects_empty_bucket() {
        let mut config = parse(minimal_yaml());
        config.bucket = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_ttl() {
        let mut config = parse(minimal_yaml());
        config.presign_ttl_secs = 0;
        assert!(config.validate().is_err());
        config.presign_ttl_secs = MAX_PRESIGN_TTL_SECS + 1;
        assert!(config.validate().is_err());
        config.presign_ttl_secs = MAX_PRESIGN_TTL_SECS;
        config.validate().unwrap();
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let mut config = parse(minimal_yaml());
        config.max_concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_public_base_url() {
        let mut config = parse(minimal_yaml());
        config.public_base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }
}

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub images: ImageConfig,
    /// Maximum upload size in bytes
    pub max_upload_size: u64,
    /// Sweep blobs no photo references before serving.
    pub reconcile_on_startup: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Built frontend bundle to serve for non-API routes.
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding the redb file
    pub data_dir: PathBuf,
    /// Directory holding transcoded photo blobs
    pub uploads_dir: PathBuf,
    /// URL prefix under which blobs are served, e.g. `/uploads`
    pub public_prefix: String,
}

#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG quality, 1-100
    pub quality: u8,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3001".to_string(),
            static_dir: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            uploads_dir: PathBuf::from("./data/uploads"),
            public_prefix: "/uploads".to_string(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_width: 800,
            max_height: 600,
            quality: 80,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            images: ImageConfig::default(),
            max_upload_size: 10 * 1024 * 1024, // 10MB
            reconcile_on_startup: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or(defaults.server.bind_address);

        let static_dir = std::env::var("STATIC_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage.data_dir);

        let uploads_dir = std::env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("uploads"));

        let public_prefix = std::env::var("PUBLIC_UPLOADS_PREFIX")
            .map(|p| p.trim_end_matches('/').to_string())
            .unwrap_or(defaults.storage.public_prefix);

        let max_upload_size = env_parse("MAX_UPLOAD_SIZE").unwrap_or(defaults.max_upload_size);

        let images = ImageConfig {
            max_width: env_parse("IMAGE_MAX_WIDTH").unwrap_or(defaults.images.max_width),
            max_height: env_parse("IMAGE_MAX_HEIGHT").unwrap_or(defaults.images.max_height),
            quality: env_parse("IMAGE_QUALITY").unwrap_or(defaults.images.quality),
        };

        let reconcile_on_startup = std::env::var("RECONCILE_ON_STARTUP")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let config = Config {
            server: ServerConfig {
                bind_address,
                static_dir,
            },
            storage: StorageConfig {
                data_dir,
                uploads_dir,
                public_prefix,
            },
            images,
            max_upload_size,
            reconcile_on_startup,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_upload_size == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_UPLOAD_SIZE must be greater than 0".to_string(),
            ));
        }

        if self.images.max_width == 0 || self.images.max_height == 0 {
            return Err(ConfigError::ValidationError(
                "IMAGE_MAX_WIDTH and IMAGE_MAX_HEIGHT must be greater than 0".to_string(),
            ));
        }

        if !(1..=100).contains(&self.images.quality) {
            return Err(ConfigError::ValidationError(
                "IMAGE_QUALITY must be between 1 and 100".to_string(),
            ));
        }

        if !self.storage.public_prefix.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "PUBLIC_UPLOADS_PREFIX must start with '/'".to_string(),
            ));
        }

        Ok(())
    }

    /// Public URL for a stored blob.
    pub fn blob_url(&self, blob_name: &str) -> String {
        format!("{}/{}", self.storage.public_prefix, blob_name)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_upload_size, 10 * 1024 * 1024);
        assert_eq!(config.images.max_width, 800);
        assert_eq!(config.images.max_height, 600);
        assert_eq!(config.images.quality, 80);
    }

    #[test]
    fn test_rejects_out_of_range_quality() {
        let mut config = Config::default();
        config.images.quality = 0;
        assert!(config.validate().is_err());
        config.images.quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_relative_prefix() {
        let mut config = Config::default();
        config.storage.public_prefix = "uploads".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blob_url() {
        let config = Config::default();
        assert_eq!(config.blob_url("abc.jpg"), "/uploads/abc.jpg");
    }
}

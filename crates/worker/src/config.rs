use std::path::PathBuf;

use anyhow::Context;
use nftgen_cloud::StorageBackendType;

/// Blob store settings for the selected backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Local {
        base_path: PathBuf,
        public_url: String,
    },
    S3 {
        bucket: String,
        /// Defaults to the bucket's virtual-hosted URL.
        public_url: Option<String>,
    },
}

/// Log output format for the `fmt` layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// `LOG_FORMAT=json` selects JSON lines; anything else is plain text.
    pub fn from_env() -> Self {
        Self::from_value(std::env::var("LOG_FORMAT").ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database_url: String,
    /// Pool size (default: `20`).
    pub db_max_connections: u32,
    /// Root of per-run scratch directories (default: `./tmp/nftgen`).
    pub scratch_dir: PathBuf,
    pub storage: StorageConfig,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                          |
    /// |----------------------|----------------------------------|
    /// | `DATABASE_URL`       | required                         |
    /// | `DB_MAX_CONNECTIONS` | `20`                             |
    /// | `SCRATCH_DIR`        | `./tmp/nftgen`                   |
    /// | `STORAGE_BACKEND`    | `local`                          |
    /// | `STORAGE_BASE_PATH`  | `./storage`                      |
    /// | `STORAGE_PUBLIC_URL` | `http://localhost:3000/storage`  |
    /// | `S3_BUCKET`          | required when backend is `s3`    |
    /// | `S3_PUBLIC_URL`      | `https://<bucket>.s3.amazonaws.com` |
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = get("DATABASE_URL").context("DATABASE_URL must be set")?;

        let db_max_connections: u32 = get("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "20".into())
            .parse()
            .context("DB_MAX_CONNECTIONS must be a valid u32")?;

        let scratch_dir = PathBuf::from(get("SCRATCH_DIR").unwrap_or_else(|| "./tmp/nftgen".into()));

        let backend = get("STORAGE_BACKEND").unwrap_or_else(|| "local".into());
        let storage = match StorageBackendType::from_name(backend.trim())? {
            StorageBackendType::Local => StorageConfig::Local {
                base_path: PathBuf::from(
                    get("STORAGE_BASE_PATH").unwrap_or_else(|| "./storage".into()),
                ),
                public_url: get("STORAGE_PUBLIC_URL")
                    .unwrap_or_else(|| "http://localhost:3000/storage".into()),
            },
            StorageBackendType::S3 => StorageConfig::S3 {
                bucket: get("S3_BUCKET").context("S3_BUCKET must be set for the s3 backend")?,
                public_url: get("S3_PUBLIC_URL"),
            },
        };

        Ok(Self {
            database_url,
            db_max_connections,
            scratch_dir,
            storage,
        })
    }
}

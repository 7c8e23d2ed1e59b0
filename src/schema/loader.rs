//! Schema sources.
//!
//! A `SchemaLoader` only fetches raw bytes; parsing and meta-validation happen
//! in [`super::JsonSchema::load`].

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::config::AppConfig;
use crate::error::AppError;

fn loader_err(e: impl std::fmt::Display) -> AppError {
    AppError::Loader(e.to_string())
}

#[async_trait]
pub trait SchemaLoader: Send + Sync {
    /// Fetch the raw schema document.
    async fn load(&self) -> Result<Vec<u8>, AppError>;

    /// Human-readable origin, used in logs.
    fn source(&self) -> String;
}

// ── File ───────────────────────────────────────────────────────────

pub struct FileLoader {
    path: PathBuf,
}

impl FileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SchemaLoader for FileLoader {
    async fn load(&self) -> Result<Vec<u8>, AppError> {
        Ok(tokio::fs::read(&self.path).await?)
    }

    fn source(&self) -> String {
        self.path.display().to_string()
    }
}

// ── HTTP ───────────────────────────────────────────────────────────

pub struct HttpLoader {
    http: reqwest::Client,
    url: Url,
}

impl HttpLoader {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(loader_err)?;
        Ok(Self { http, url })
    }
}

#[async_trait]
impl SchemaLoader for HttpLoader {
    async fn load(&self) -> Result<Vec<u8>, AppError> {
        let bytes = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(loader_err)?
            .error_for_status()
            .map_err(loader_err)?
            .bytes()
            .await
            .map_err(loader_err)?;
        Ok(bytes.to_vec())
    }

    fn source(&self) -> String {
        self.url.to_string()
    }
}

// ── In-memory ──────────────────────────────────────────────────────

pub struct BytesLoader {
    bytes: Vec<u8>,
}

impl BytesLoader {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self { bytes: bytes.into() }
    }
}

#[async_trait]
impl SchemaLoader for BytesLoader {
    async fn load(&self) -> Result<Vec<u8>, AppError> {
        Ok(self.bytes.clone())
    }

    fn source(&self) -> String {
        format!("<memory: {} bytes>", self.bytes.len())
    }
}

// ── Selection ──────────────────────────────────────────────────────

/// Pick a loader for `source` by URL scheme. A bare path is read from disk;
/// `ipfs://<cid>/<path>` is fetched through the configured HTTP gateway.
pub fn loader_for(source: &str, config: &AppConfig) -> Result<Box<dyn SchemaLoader>, AppError> {
    let url = match Url::parse(source) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            return Ok(Box::new(FileLoader::new(source)));
        }
        Err(e) => return Err(AppError::Loader(format!("invalid schema URL '{source}': {e}"))),
    };

    match url.scheme() {
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| AppError::Loader(format!("invalid file URL '{source}'")))?;
            Ok(Box::new(FileLoader::new(path)))
        }
        "http" | "https" => Ok(Box::new(HttpLoader::new(url, config.schema_fetch_timeout)?)),
        "ipfs" => {
            let cid = url
                .host_str()
                .filter(|h| !h.is_empty())
                .ok_or_else(|| AppError::Loader(format!("missing CID in '{source}'")))?;
            let gateway = format!("{}/ipfs/{}{}", config.ipfs_gateway_url, cid, url.path());
            let gateway = Url::parse(&gateway).map_err(loader_err)?;
            Ok(Box::new(HttpLoader::new(gateway, config.schema_fetch_timeout)?))
        }
        other => Err(AppError::Loader(format!("unsupported schema URL scheme '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_file_loader_reads_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"type":"object"}"#).unwrap();

        let loader = FileLoader::new(file.path());
        let bytes = loader.load().await.unwrap();
        assert_eq!(bytes, br#"{"type":"object"}"#);
    }

    #[tokio::test]
    async fn test_file_loader_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FileLoader::new(dir.path().join("absent.json"));
        let err = loader.load().await.unwrap_err();
        assert_eq!(err.kind(), "io");
    }

    #[tokio::test]
    async fn test_bytes_loader() {
        let loader = BytesLoader::new("{}");
        assert_eq!(loader.load().await.unwrap(), b"{}");
        assert_eq!(loader.source(), "<memory: 2 bytes>");
    }

    #[test]
    fn test_loader_for_bare_path_and_file_url() {
        let config = AppConfig::default();
        let loader = loader_for("schemas/kyc.json", &config).unwrap();
        assert_eq!(loader.source(), "schemas/kyc.json");

        let loader = loader_for("file:///tmp/kyc.json", &config).unwrap();
        assert_eq!(loader.source(), "/tmp/kyc.json");
    }

    #[test]
    fn test_loader_for_http() {
        let config = AppConfig::default();
        let loader = loader_for("https://example.com/schemas/kyc.json", &config).unwrap();
        assert_eq!(loader.source(), "https://example.com/schemas/kyc.json");
    }

    #[test]
    fn test_loader_for_ipfs_uses_gateway() {
        let config = AppConfig {
            ipfs_gateway_url: "https://gateway.example.org".into(),
            ..AppConfig::default()
        };
        let loader = loader_for("ipfs://QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG/kyc.json", &config).unwrap();
        assert_eq!(
            loader.source(),
            "https://gateway.example.org/ipfs/QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG/kyc.json"
        );
    }

    #[test]
    fn test_loader_for_unknown_scheme() {
        let config = AppConfig::default();
        let err = loader_for("ftp://example.com/kyc.json", &config).err().unwrap();
        assert_eq!(err.kind(), "loader");
    }
}

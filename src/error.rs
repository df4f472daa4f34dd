use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("traversal error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("descriptor XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("installation root not accessible: {path}: {source}")]
    InstallRoot {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, HarvestError>;

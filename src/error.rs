// Errores del crate. Las operaciones del motor de selección no fallan: sólo
// la carga del catálogo, la configuración y los cambios de límites devuelven
// `PlannerError`.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] calamine::Error),

    #[error("unsupported catalog format: {0}")]
    UnsupportedCatalogFormat(String),

    #[error("catalog contains no courses")]
    EmptyCatalog,

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("invalid alternative groups: {0}")]
    InvalidAlternativeGroups(String),

    #[error("invalid limits: {0}")]
    InvalidLimits(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;

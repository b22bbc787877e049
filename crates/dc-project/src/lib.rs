//! dc-project: column file format, validation and compilation.

pub mod compile;
pub mod schema;
pub mod validate;

pub use compile::{compile_column, compile_equilibrium, sim_options};
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_file};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<ColumnFile> {
    let content = std::fs::read_to_string(path)?;
    let file: ColumnFile = serde_yaml::from_str(&content)?;
    validate_file(&file)?;
    Ok(file)
}

pub fn save_yaml(path: &std::path::Path, file: &ColumnFile) -> ProjectResult<()> {
    validate_file(file)?;
    let content = serde_yaml::to_string(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<ColumnFile> {
    let content = std::fs::read_to_string(path)?;
    let file: ColumnFile = serde_json::from_str(&content)?;
    validate_file(&file)?;
    Ok(file)
}

pub fn save_json(path: &std::path::Path, file: &ColumnFile) -> ProjectResult<()> {
    validate_file(file)?;
    let content = serde_json::to_string_pretty(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a YAML or JSON file, chosen by extension (`.json` is JSON, anything
/// else YAML).
pub fn load(path: &std::path::Path) -> ProjectResult<ColumnFile> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}

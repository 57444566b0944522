//! Saving exported annotations to disk.

use crate::config::ExportConfig;
use crate::draw::SurfaceError;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while exporting.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Canvas error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Invalid filename template: {0}")]
    Template(String),
}

/// Where and how exported images are written.
#[derive(Debug, Clone)]
pub struct FileSaveConfig {
    /// Directory to save images to.
    pub save_directory: PathBuf,
    /// Filename template (supports chrono format specifiers).
    pub filename_template: String,
    /// Image format extension.
    pub format: String,
}

impl Default for FileSaveConfig {
    fn default() -> Self {
        Self::from(&ExportConfig::default())
    }
}

impl From<&ExportConfig> for FileSaveConfig {
    fn from(config: &ExportConfig) -> Self {
        Self {
            save_directory: expand_tilde(&config.save_directory),
            filename_template: config.filename_template.clone(),
            format: "png".to_string(),
        }
    }
}

/// Generate a filename based on the template and current time.
///
/// Fails if the template contains an invalid chrono specifier or would
/// produce a path instead of a plain file name.
pub fn generate_filename(template: &str, format: &str) -> Result<String, ExportError> {
    use std::fmt::Write;

    let now = Local::now();
    let mut filename = String::new();
    write!(filename, "{}", now.format(template))
        .map_err(|_| ExportError::Template(template.to_string()))?;

    if filename.is_empty() || filename.contains(std::path::MAIN_SEPARATOR) {
        return Err(ExportError::Template(template.to_string()));
    }
    Ok(format!("{filename}.{format}"))
}

/// Ensure the save directory exists, creating it if necessary.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Writes PNG bytes to an exact path, readable only by the user.
pub fn write_png(path: &Path, image_data: &[u8]) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory_exists(parent)?;
    }

    fs::write(path, image_data)?;

    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, Permissions::from_mode(0o600))?;
    }

    log::debug!("Wrote {} bytes to {}", image_data.len(), path.display());
    Ok(())
}

/// Saves PNG bytes under a generated name in the configured directory.
///
/// Returns the path of the new file.
pub fn save_png(image_data: &[u8], config: &FileSaveConfig) -> Result<PathBuf, ExportError> {
    let directory = ensure_directory_exists(&config.save_directory)?;
    let filename = generate_filename(&config.filename_template, &config.format)?;
    let file_path = directory.join(&filename);

    log::info!(
        "Saving export to: {} ({} bytes)",
        file_path.display(),
        image_data.len()
    );
    write_png(&file_path, image_data)?;

    Ok(file_path)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_filename() {
        let filename = generate_filename("test_%Y%m%d", "png").unwrap();
        assert!(filename.starts_with("test_"));
        assert!(filename.ends_with(".png"));
        assert_eq!(filename.len(), "test_20261016.png".len());
    }

    #[test]
    fn test_generate_filename_rejects_bad_specifier() {
        assert!(generate_filename("shot_%Q", "png").is_err());
        assert!(generate_filename("", "png").is_err());
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/Pictures");
        assert!(!expanded.to_string_lossy().starts_with("~"));

        let no_tilde = expand_tilde("/absolute/path");
        assert_eq!(no_tilde, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_default_config() {
        let config = FileSaveConfig::default();
        assert_eq!(config.format, "png");
        assert!(
            config
                .save_directory
                .to_string_lossy()
                .contains("Overmark")
        );
    }

    #[test]
    fn test_save_png_creates_directory_and_file() {
        let temp = TempDir::new().unwrap();
        let config = FileSaveConfig {
            save_directory: temp.path().join("nested").join("exports"),
            filename_template: "export_%H%M%S".to_string(),
            format: "png".to_string(),
        };

        let path = save_png(b"\x89PNG fake", &config).unwrap();
        assert!(path.exists());
        assert_eq!(fs::read(&path).unwrap(), b"\x89PNG fake");
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}

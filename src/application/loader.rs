//! Reading response dumps (`{"n": [...]}` JSON) from disk.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::Response;

/// Locate a response file.
///
/// Paths that exist as given win; a relative path that does not exist is
/// then looked up under `responses_dir`.
#[instrument(level = "debug")]
pub fn resolve_response_path(
    file: &Path,
    responses_dir: Option<&Path>,
) -> ApplicationResult<PathBuf> {
    if file.exists() {
        return Ok(file.to_path_buf());
    }
    if file.is_relative() {
        if let Some(dir) = responses_dir {
            let candidate = dir.join(file);
            debug!("trying {}", candidate.display());
            if candidate.exists() {
                return Ok(candidate);
            }
        }
    }
    Err(ApplicationError::ResponseNotFound(file.to_path_buf()))
}

#[instrument(level = "debug")]
pub fn load_response(file: &Path, responses_dir: Option<&Path>) -> ApplicationResult<Response> {
    let path = resolve_response_path(file, responses_dir)?;
    let content = std::fs::read_to_string(&path).with_path_context("read response", &path)?;
    let response = parse_response(&content, &path)?;
    debug!(top_level = response.n.len(), "loaded {}", path.display());
    Ok(response)
}

/// Parse a response; `origin` only labels errors.
pub fn parse_response(content: &str, origin: &Path) -> ApplicationResult<Response> {
    serde_json::from_str(content).map_err(|source| ApplicationError::Parse {
        path: origin.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_minimal() {
        let response = parse_response(
            r#"{"n": [{"attribute": "_root_", "children": [{"attribute": "me"}]}]}"#,
            Path::new("inline"),
        )
        .unwrap();
        assert_eq!(response.n.len(), 1);
        assert_eq!(response.n[0].children[0].attribute, "me");
    }

    #[test]
    fn test_parse_error_names_origin() {
        let err = parse_response("{not json", Path::new("broken.json")).unwrap_err();
        assert!(matches!(err, ApplicationError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_resolve_falls_back_to_responses_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("dump-4711.json"), r#"{"n": []}"#).unwrap();

        let resolved =
            resolve_response_path(Path::new("dump-4711.json"), Some(dir.path())).unwrap();
        assert_eq!(resolved, dir.path().join("dump-4711.json"));

        let missing = resolve_response_path(Path::new("nope-4711.json"), Some(dir.path()));
        assert!(matches!(missing, Err(ApplicationError::ResponseNotFound(_))));
    }
}

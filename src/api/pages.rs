//! Index page rendering
//!
//! The index template lives on disk next to its assets and is re-read on
//! every request, so template edits show up without a restart.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, response::Html};
use minijinja::{context, Environment};
use std::sync::Arc;
use tokio::fs;

/// Title handed to the index template
const INDEX_TITLE: &str = "上传文件";

/// GET / - Render the upload index page
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    match render_index(&state).await {
        Ok(html) => Ok(Html(html)),
        Err(err) => Err(state.report(err).await),
    }
}

async fn render_index(state: &AppState) -> Result<String, AppError> {
    let path = state.template_dir.join("index.html");
    let source = fs::read_to_string(&path)
        .await
        .map_err(|e| AppError::Template(format!("{}: {}", path.display(), e)))?;
    let env = Environment::new();
    env.render_str(&source, context! { title => INDEX_TITLE })
        .map_err(|e| AppError::Template(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::LogNotifier;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn create_test_state(template_dir: PathBuf) -> Arc<AppState> {
        Arc::new(AppState::new(
            template_dir,
            PathBuf::from("./uploads"),
            Arc::new(LogNotifier),
        ))
    }

    #[tokio::test]
    async fn test_index_renders_title() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(
            temp_dir.path().join("index.html"),
            "<html><title>{{ title }}</title></html>",
        )
        .unwrap();
        let state = create_test_state(temp_dir.path().to_path_buf());

        let result = index(State(state)).await;
        let Html(body) = result.expect("index should render");
        assert!(body.contains("上传文件"));
    }

    #[tokio::test]
    async fn test_index_missing_template_errors() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let state = create_test_state(temp_dir.path().to_path_buf());

        let result = index(State(state)).await;
        match result {
            Err(AppError::Template(message)) => assert!(message.contains("index.html")),
            other => panic!("Expected Template error, got: {:?}", other.map(|_| ())),
        }
    }
}

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::task;

use crate::core::config::Config;
use crate::models::file_entry::{Breadcrumb, FileEntry};
use crate::services::fs::listing::DirectoryLister;
use crate::services::fs::size::format_size;

pub struct AppState {
    pub config: Config,
}

pub fn router(config: Config) -> Router {
    Router::new()
        .route("/api/browse", get(browse))
        .with_state(Arc::new(AppState { config }))
}

#[derive(Debug, Deserialize)]
pub struct BrowseParams {
    /// Untrusted request path, relative to the sandbox root.
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    pub path: String,
    pub parent: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub entries: Vec<EntryView>,
}

/// Engine entry plus the size rendered for display. Attached here so the
/// engine keeps exposing raw bytes.
#[derive(Debug, Serialize)]
pub struct EntryView {
    pub name: String,
    pub path: String,
    pub is_directory: bool,
    pub size: u64,
    pub size_formatted: String,
    pub modified: u64,
    pub permissions: String,
}

impl From<FileEntry> for EntryView {
    fn from(entry: FileEntry) -> Self {
        Self {
            size_formatted: format_size(entry.size),
            name: entry.name,
            path: entry.path,
            is_directory: entry.is_directory,
            size: entry.size,
            modified: entry.modified,
            permissions: entry.permissions,
        }
    }
}

/// Single inbound surface: the whole view model for one request path.
/// Always answers 200; bad input degrades to the root listing inside the
/// engine.
async fn browse(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BrowseParams>,
) -> Json<BrowseResponse> {
    let root = state.config.root.clone();
    let label = state.config.label.clone();

    // Listing walks the filesystem synchronously; keep it off the async
    // workers.
    let response = task::spawn_blocking(move || {
        let lister = DirectoryLister::new(root, params.path);
        BrowseResponse {
            path: lister.request_path().to_string(),
            parent: lister.parent_path(),
            breadcrumbs: lister.breadcrumbs(&label),
            entries: lister.entries().into_iter().map(EntryView::from).collect(),
        }
    })
    .await
    .unwrap();

    Json(response)
}

use serde::Serialize;

/// One listed member of a directory. Built fresh per listing call and
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    /// Request-relative path, `/`-separated.
    pub path: String,
    pub is_directory: bool,
    /// File length in bytes, or the recursive subtree total for directories.
    pub size: u64,
    /// Unix seconds; 0 when the timestamp is unavailable.
    pub modified: u64,
    /// Low permission bits as a 4-wide octal string, e.g. `0755`.
    pub permissions: String,
}

/// One navigable segment on the trail from the sandbox root down to the
/// current directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub name: String,
    pub path: String,
}

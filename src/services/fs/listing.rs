use std::cmp::Ordering;
use std::fs;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use tracing::debug;

use crate::models::file_entry::{Breadcrumb, FileEntry};
use crate::services::fs::resolver::PathResolver;
use crate::services::fs::size::entry_size;

/// Names never surfaced in a listing: version-control and editor metadata,
/// secrets, OS artifacts, package directories, and the legacy entry point.
/// Fixed at build time.
pub const EXCLUDED_NAMES: [&str; 13] = [
    ".git",
    ".svn",
    ".htaccess",
    ".env",
    ".DS_Store",
    "Thumbs.db",
    ".gitignore",
    ".gitkeep",
    ".vscode",
    "node_modules",
    "vendor",
    ".idea",
    "index.php",
];

/// Per-request directory listing engine.
///
/// Takes the sandbox root and the raw requested path as explicit inputs.
/// Every operation is total: adversarial input degrades to the root
/// listing, filesystem faults degrade to empty or zero values, and no
/// error value crosses the public boundary.
pub struct DirectoryLister {
    resolver: PathResolver,
    request_path: String,
}

impl DirectoryLister {
    pub fn new(root: impl Into<PathBuf>, requested_path: impl Into<String>) -> Self {
        let resolver = PathResolver::new(root);
        let requested = requested_path.into();
        // Unsafe input shows the root rather than failing the request.
        let request_path = if resolver.resolve(&requested).is_some() {
            requested
        } else {
            debug!(path = %requested, "unsafe request path, falling back to root");
            String::new()
        };
        Self {
            resolver,
            request_path,
        }
    }

    /// The effective request path after validation; empty means root.
    pub fn request_path(&self) -> &str {
        &self.request_path
    }

    /// Canonical directory the request points at. Re-checks containment
    /// and falls back to the root itself if the path no longer resolves
    /// inside it.
    pub fn current_directory(&self) -> PathBuf {
        match fs::canonicalize(self.resolver.root().join(&self.request_path)) {
            Ok(path) if self.resolver.is_within_root(&path) => path,
            _ => self.resolver.root().to_path_buf(),
        }
    }

    /// Sorted entries of the current directory. Unreadable or missing
    /// targets list as empty; excluded names and subdirectories that fail
    /// their own containment check are dropped silently.
    pub fn entries(&self) -> Vec<FileEntry> {
        let dir = self.current_directory();
        let read_dir = match fs::read_dir(&dir) {
            Ok(read_dir) => read_dir,
            Err(_) => return Vec::new(),
        };

        let mut items = Vec::new();
        for entry in read_dir.filter_map(|res| res.ok()) {
            let name = entry.file_name().to_string_lossy().into_owned();
            if EXCLUDED_NAMES.contains(&name.as_str()) {
                continue;
            }

            let full_path = entry.path();
            let relative = if self.request_path.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", self.request_path, name)
            };

            let is_directory = full_path.is_dir();
            // Containment is checked per entry, not inherited from the
            // parent: a symlinked child can point outside the sandbox.
            if is_directory && !self.relative_stays_inside(&relative) {
                debug!(path = %relative, "dropping directory entry outside sandbox");
                continue;
            }

            let (modified, permissions) = match fs::metadata(&full_path) {
                Ok(md) => (modified_secs(&md), permissions_octal(&md)),
                Err(_) => (0, "0000".to_string()),
            };

            items.push(FileEntry {
                name,
                path: relative,
                is_directory,
                size: entry_size(&full_path),
                modified,
                permissions,
            });
        }

        // Directories before files, then case-insensitive by name.
        items.sort_by(|a, b| match b.is_directory.cmp(&a.is_directory) {
            Ordering::Equal => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            kind_order => kind_order,
        });
        items
    }

    /// Trail from the root down to the current directory. Starts with a
    /// synthetic root crumb named `root_label`; accumulation stops at the
    /// first prefix that no longer resolves inside the sandbox.
    pub fn breadcrumbs(&self, root_label: &str) -> Vec<Breadcrumb> {
        let mut crumbs = vec![Breadcrumb {
            name: root_label.to_string(),
            path: String::new(),
        }];
        if self.request_path.is_empty() {
            return crumbs;
        }

        let mut accumulated = String::new();
        for part in self.request_path.split('/') {
            if !accumulated.is_empty() {
                accumulated.push('/');
            }
            accumulated.push_str(part);

            if !self.relative_stays_inside(&accumulated) {
                break;
            }
            crumbs.push(Breadcrumb {
                name: part.to_string(),
                path: accumulated.clone(),
            });
        }
        crumbs
    }

    /// Request path one level up, or empty at the root. A parent that
    /// would escape the sandbox degrades to the root as well.
    pub fn parent_path(&self) -> String {
        if self.request_path.is_empty() {
            return String::new();
        }
        let parent = match self.request_path.rsplit_once('/') {
            Some((parent, _)) => parent.to_string(),
            None => String::new(),
        };
        if !parent.is_empty() && !self.relative_stays_inside(&parent) {
            return String::new();
        }
        parent
    }

    fn relative_stays_inside(&self, relative: &str) -> bool {
        match fs::canonicalize(self.resolver.root().join(relative)) {
            Ok(path) => self.resolver.is_within_root(&path),
            Err(_) => false,
        }
    }
}

fn modified_secs(md: &fs::Metadata) -> u64 {
    md.modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(unix)]
fn permissions_octal(md: &fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    format!("{:04o}", md.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn permissions_octal(md: &fs::Metadata) -> String {
    if md.permissions().readonly() {
        "0444".to_string()
    } else {
        "0644".to_string()
    }
}

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Outcome of a subtree walk. A degraded walk reports 0 rather than a
/// partial sum.
enum SizeOutcome {
    Exact(u64),
    Degraded,
}

/// Size in bytes of one listed entry: file length for files, recursive
/// descendant total for directories, 0 for anything else.
pub fn entry_size(path: &Path) -> u64 {
    if path.is_file() {
        fs::metadata(path).map(|md| md.len()).unwrap_or(0)
    } else if path.is_dir() {
        match subtree_size(path) {
            SizeOutcome::Exact(total) => total,
            SizeOutcome::Degraded => 0,
        }
    } else {
        0
    }
}

fn subtree_size(dir: &Path) -> SizeOutcome {
    let mut total: u64 = 0;
    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => return SizeOutcome::Degraded,
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.metadata() {
            Ok(md) => total += md.len(),
            Err(_) => return SizeOutcome::Degraded,
        }
    }
    SizeOutcome::Exact(total)
}

/// Renders a byte count with binary units, two decimals at most:
/// `0 B`, `1 KB`, `1.46 MB`. Values past the TB range stay in TB.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

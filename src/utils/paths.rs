//! Path helpers.

use std::path::Path;

/// Render a path with forward slashes and no leading `./` so display output
/// is stable across platforms.
pub fn normalize_path(path: &Path) -> String {
    let mut normalized = path.to_string_lossy().replace('\\', "/");
    while let Some(stripped) = normalized.strip_prefix("./") {
        normalized = stripped.to_string();
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::normalize_path;
    use std::path::Path;

    #[test]
    fn strips_leading_dot_segments() {
        assert_eq!(normalize_path(Path::new("./src/main.py")), "src/main.py");
        assert_eq!(normalize_path(Path::new("src/main.py")), "src/main.py");
    }
}

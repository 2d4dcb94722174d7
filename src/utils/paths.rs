//! Path normalization

/// Convert backslashes to forward slashes so fragments and globs match the
/// same way on every platform.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Base name of `path` as used for the filename tag column.
pub fn base_name(path: &std::path::Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("sub\\dir\\f.csv"), "sub/dir/f.csv");
        assert_eq!(normalize_path("sub/f.csv"), "sub/f.csv");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("/data/in/Sales Q1.xlsx")), "Sales Q1.xlsx");
        assert_eq!(base_name(Path::new("f1.csv")), "f1.csv");
    }
}

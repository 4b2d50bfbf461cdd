//! Path-key canonicalization
//!
//! Every lookup between tree paths and git-stats keys goes through
//! [`normalize`]; both sides of a comparison must be normalized.

/// Separators recognized in path keys
pub const SEPARATORS: [char; 2] = ['/', '\\'];

fn is_separator(c: char) -> bool {
    SEPARATORS.contains(&c)
}

/// Canonical form of a path key: the trailing separator is removed.
///
/// Does not resolve `.` or `..`, change case, or collapse repeated interior
/// separators. A trailing run such as `"a//"` is removed whole so that the
/// function is idempotent.
pub fn normalize(path: &str) -> String {
    path.trim_end_matches(is_separator).to_string()
}

/// Parent directory key of a path: the normalized path truncated at its last
/// separator, or `""` when it has none.
pub fn parent_dir(path: &str) -> String {
    let normalized = normalize(path);
    match normalized.rfind(is_separator) {
        Some(idx) => normalize(&normalized[..idx]),
        None => String::new(),
    }
}

/// Last segment of the normalized path
pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(is_separator);
    match trimmed.rfind(is_separator) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/repo/src/"), "/repo/src");
        assert_eq!(normalize("/repo/src"), "/repo/src");
        assert_eq!(normalize("C:\\repo\\src\\"), "C:\\repo\\src");
        assert_eq!(normalize("a//b/"), "a//b");
        assert_eq!(normalize("./x/../y/"), "./x/../y");
        assert_eq!(normalize("Mixed/Case/"), "Mixed/Case");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("/repo/src/main.ts"), "/repo/src");
        assert_eq!(parent_dir("/repo/src/"), "/repo");
        assert_eq!(parent_dir("main.ts"), "");
        assert_eq!(parent_dir("/main.ts"), "");
        assert_eq!(parent_dir("a//b"), "a");
        assert_eq!(parent_dir("C:\\repo\\a.ts"), "C:\\repo");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("/repo/src/main.ts"), "main.ts");
        assert_eq!(file_name("/repo/src/"), "src");
        assert_eq!(file_name("plain"), "plain");
        assert_eq!(file_name(""), "");
    }
}

use std::path::{Path, PathBuf};

/// Normalize a path, resolving ".." and "." components
pub fn normalize_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            std::path::Component::ParentDir => {
                // Go up one level unless we're at the root
                if !result.as_os_str().is_empty() {
                    result.pop();
                }
            },
            std::path::Component::CurDir => {
                // Skip "." components
            },
            _ => {
                result.push(component);
            }
        }
    }

    result
}

/// Check if a path has a specific extension (case-insensitive)
pub fn has_extension<P: AsRef<Path>>(path: P, ext: &str) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case(ext))
}

/// Whether `path` is `base` or lies below it, after normalization
pub fn is_within<P: AsRef<Path>, B: AsRef<Path>>(path: P, base: B) -> bool {
    normalize_path(path).starts_with(normalize_path(base))
}

/// Relative path of `path` under `base`, using forward slashes for glob matching
pub fn relative_slash_path<P: AsRef<Path>, B: AsRef<Path>>(path: P, base: B) -> Option<String> {
    let relative = normalize_path(path);
    let relative = relative.strip_prefix(normalize_path(base)).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("./book/../book/ch1/./intro.html"), PathBuf::from("book/ch1/intro.html"));
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("a/b/index.HTML", "html"));
        assert!(!has_extension("a/b/style.css", "html"));
        assert!(!has_extension("a/b/README", "html"));
    }

    #[test]
    fn test_is_within() {
        assert!(is_within("./book/out/x.html", "book/out"));
        assert!(!is_within("book-enhanced/x.html", "book"));
    }

    #[test]
    fn test_relative_slash_path() {
        assert_eq!(
            relative_slash_path("./book/guide/intro.html", "book"),
            Some("guide/intro.html".to_string())
        );
        assert_eq!(relative_slash_path("other/intro.html", "book"), None);
    }
}

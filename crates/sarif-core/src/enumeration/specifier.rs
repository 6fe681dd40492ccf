//! Turns a user-supplied specifier into a root directory and filename filter.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use url::Url;

use super::file_system::FileSystem;

/// Root directory plus filename glob for one enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpecifier {
    pub directory: PathBuf,
    pub filter: String,
}

/// Expands `%NAME%` references from the process environment. Undefined
/// variables are left untouched.
pub fn expand_env_vars(text: &str) -> Cow<'_, str> {
    expand_with(text, |name| std::env::var(name).ok())
}

pub(crate) fn expand_with<F>(text: &str, lookup: F) -> Cow<'_, str>
where
    F: Fn(&str) -> Option<String>,
{
    static ENV_REFERENCE: OnceLock<Regex> = OnceLock::new();
    let pattern = ENV_REFERENCE
        .get_or_init(|| Regex::new(r"%([A-Za-z_][A-Za-z0-9_]*)%").expect("valid regex"));
    pattern.replace_all(text, |caps: &Captures| {
        lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    })
}

fn has_wildcard(name: &str) -> bool {
    name.contains('*') || name.contains('?')
}

/// Only `*` and `?` are wildcards in a specifier; brackets and braces in a
/// file name match themselves.
fn escape_glob_classes(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '[' | ']' | '{' | '}') {
            escaped.push('[');
            escaped.push(c);
            escaped.push(']');
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Resolves `specifier` against `cwd`:
///
/// * `file:` URIs are converted to paths;
/// * the last segment is the filter unless it names an existing directory
///   or a path that is not an existing file, in which case the whole path is
///   the directory and the filter is `*`;
/// * an empty directory means `cwd`.
pub fn resolve(specifier: &str, fs: &dyn FileSystem, cwd: &Path) -> ResolvedSpecifier {
    let expanded = expand_env_vars(specifier);
    let path = match Url::parse(&expanded) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .unwrap_or_else(|_| PathBuf::from(expanded.as_ref())),
        _ => PathBuf::from(expanded.as_ref()),
    };

    let trailing_separator = expanded.ends_with('/') || expanded.ends_with(std::path::MAIN_SEPARATOR);
    let file_name = if trailing_separator {
        String::new()
    } else {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    let (directory, filter) = if file_name.is_empty() {
        (path.clone(), "*".to_string())
    } else if !has_wildcard(&file_name) && !fs.file_exists(&absolute(&path, cwd)) {
        (path.clone(), "*".to_string())
    } else {
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        (parent, escape_glob_classes(&file_name))
    };

    ResolvedSpecifier {
        directory: absolute(&directory, cwd),
        filter,
    }
}

/// Joins a relative path onto `cwd` and folds `.` and `..` lexically.
fn absolute(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.as_os_str().is_empty() {
        cwd.to_path_buf()
    } else if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumeration::file_system::LocalFileSystem;

    #[test]
    fn test_expand_env_vars() {
        let lookup = |name: &str| (name == "SRC").then(|| "/work/src".to_string());
        assert_eq!(expand_with("%SRC%/*.c", lookup), "/work/src/*.c");
        assert_eq!(expand_with("%MISSING%/a", lookup), "%MISSING%/a");
        assert_eq!(expand_with("plain", lookup), "plain");
    }

    #[test]
    fn test_resolve_directory_and_glob_forms() {
        let root = tempfile::tempdir().unwrap();
        let sub = root.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("a.txt"), "a").unwrap();
        let fs = LocalFileSystem;
        let cwd = root.path();

        let dir = resolve("sub", &fs, cwd);
        assert_eq!(dir.directory, sub);
        assert_eq!(dir.filter, "*");

        let slash = resolve("sub/", &fs, cwd);
        assert_eq!(slash, dir);

        let glob = resolve("./sub/*.txt", &fs, cwd);
        assert_eq!(glob.directory, sub);
        assert_eq!(glob.filter, "*.txt");

        let file = resolve("sub/a.txt", &fs, cwd);
        assert_eq!(file.directory, sub);
        assert_eq!(file.filter, "a.txt");
    }

    #[test]
    fn test_bracket_and_brace_names_stay_literal() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("report[1].txt"), "r").unwrap();
        let fs = LocalFileSystem;

        let literal = resolve("report[1].txt", &fs, root.path());
        assert_eq!(literal.directory, root.path());
        assert_eq!(literal.filter, "report[[]1[]].txt");

        let glob = resolve("{a,b}*.txt", &fs, root.path());
        assert_eq!(glob.filter, "[{]a,b[}]*.txt");
    }

    #[test]
    fn test_resolve_file_uri() {
        let root = tempfile::tempdir().unwrap();
        let url = Url::from_directory_path(root.path()).unwrap();
        let resolved = resolve(url.as_str(), &LocalFileSystem, Path::new("/"));
        assert_eq!(resolved.directory, root.path());
        assert_eq!(resolved.filter, "*");
    }

    #[test]
    fn test_parent_components_fold() {
        assert_eq!(
            absolute(Path::new("a/../b/./c"), Path::new("/w")),
            PathBuf::from("/w/b/c")
        );
    }
}

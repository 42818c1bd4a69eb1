//! Path key resolution

use crate::error::{Error, Result};

pub const SEPARATOR: char = '/';

/// Resolve `name` against the current directory context into a store key.
///
/// Absolute names are used verbatim. Relative names are joined onto the
/// context with a single separator; an empty context leaves them relative.
pub fn resolve(cwd: &str, name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(Error::InvalidPath(name.to_string()));
    }
    if is_absolute(name) || cwd.is_empty() {
        return Ok(name.to_string());
    }

    let base = cwd.trim_end_matches(SEPARATOR);
    let mut key = String::with_capacity(base.len() + 1 + name.len());
    key.push_str(base);
    key.push(SEPARATOR);
    key.push_str(name);
    Ok(key)
}

pub fn is_absolute(name: &str) -> bool {
    name.starts_with(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_names_are_verbatim() {
        assert_eq!(resolve("dir", "/etc/passwd").unwrap(), "/etc/passwd");
        assert_eq!(resolve("", "/a//b").unwrap(), "/a//b");
    }

    #[test]
    fn relative_names_join_the_context() {
        assert_eq!(resolve("", "a.txt").unwrap(), "a.txt");
        assert_eq!(resolve("dir", "x.txt").unwrap(), "dir/x.txt");
        assert_eq!(resolve("dir/", "x.txt").unwrap(), "dir/x.txt");
        assert_eq!(resolve("/", "x.txt").unwrap(), "/x.txt");
        assert_eq!(resolve("/srv/data", "sub/y").unwrap(), "/srv/data/sub/y");
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(matches!(resolve("dir", ""), Err(Error::InvalidPath(_))));
    }
}

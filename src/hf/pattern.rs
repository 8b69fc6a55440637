//! Inclusion patterns restricting a bulk transfer to one directory.
//!
//! Pattern syntax is a small glob dialect over `/`-separated repository
//! paths:
//! - `*` matches any run of characters except `/`
//! - `?` matches one character except `/`
//! - `**` matches any run of characters, `/` included
//!
//! Everything else matches literally.

/// Build the inclusion patterns for a normalized, non-empty directory.
///
/// `<dir>/*` only reaches direct children and `<dir>/**/*` only reaches
/// nested descendants, so both are always returned together.
pub fn inclusion_patterns(directory: &str) -> [String; 2] {
    [format!("{directory}/*"), format!("{directory}/**/*")]
}

/// Whether `path` matches at least one of `patterns`.
pub fn matches_any<S: AsRef<str>>(patterns: &[S], path: &str) -> bool {
    patterns
        .iter()
        .any(|pattern| glob_match(pattern.as_ref(), path))
}

/// Match a whole repository path against a single pattern.
pub fn glob_match(pattern: &str, path: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let path: Vec<char> = path.chars().collect();
    match_from(&pattern, &path)
}

fn match_from(pattern: &[char], path: &[char]) -> bool {
    match pattern.first() {
        None => path.is_empty(),
        Some('*') if pattern.get(1) == Some(&'*') => {
            let rest = &pattern[2..];
            (0..=path.len()).any(|skip| match_from(rest, &path[skip..]))
        }
        Some('*') => {
            let rest = &pattern[1..];
            for skip in 0..=path.len() {
                if match_from(rest, &path[skip..]) {
                    return true;
                }
                if path.get(skip) == Some(&'/') {
                    break;
                }
            }
            false
        }
        Some('?') => match path.first() {
            Some(&ch) if ch != '/' => match_from(&pattern[1..], &path[1..]),
            _ => false,
        },
        Some(&literal) => {
            path.first() == Some(&literal) && match_from(&pattern[1..], &path[1..])
        }
    }
}

use crate::error::HfSubdirError;

use super::{DirectoryRef, HF_HOST};

/// Path segment that marks a branch-scoped URL (`<ns>/<repo>/tree/<branch>/...`).
const TREE_MARKER: &str = "tree";

/// Parse a Hugging Face web URL into a repository id and a directory path.
///
/// `https://huggingface.co/<ns>/<repo>/tree/<branch>/<dir...>` yields
/// `<ns>/<repo>` and `<dir...>`; the branch segment is dropped. Without the
/// `tree/<branch>` prefix, everything after the repository is the directory.
///
/// A URL with exactly `<ns>/<repo>/tree/<branch>` is *not* treated as
/// branch-scoped: it yields the directory `tree/<branch>`. Existing callers
/// rely on this, so it is kept as is.
pub fn parse_hf_url(input: &str) -> Result<DirectoryRef, HfSubdirError> {
    let url = url::Url::parse(input).map_err(|source| HfSubdirError::InvalidUrl {
        input: input.to_string(),
        message: format!("invalid URL: {source}"),
    })?;

    // Userinfo and explicit non-default ports are part of the authority and
    // make it differ from the bare host. Host case is folded by the parser.
    if url.authority() != HF_HOST {
        return Err(HfSubdirError::InvalidUrl {
            input: input.to_string(),
            message: format!("URL must be from {HF_HOST}"),
        });
    }

    // Only the outer slashes are dropped; an inner `//` stays an empty segment.
    let segments = url
        .path()
        .trim_matches('/')
        .split('/')
        .map(|segment| {
            urlencoding::decode(segment).map_err(|source| HfSubdirError::InvalidUrl {
                input: input.to_string(),
                message: format!("path segment '{segment}' is not valid UTF-8: {source}"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if segments.len() < 2 {
        return Err(HfSubdirError::InvalidUrl {
            input: input.to_string(),
            message: "expected a path like /<namespace>/<repo>/tree/<branch>/<directory>"
                .to_string(),
        });
    }

    let repo_id = format!("{}/{}", segments[0], segments[1]);

    let directory = if segments.len() > 4 && segments[2] == TREE_MARKER {
        segments[4..].join("/")
    } else if segments.len() > 2 {
        segments[2..].join("/")
    } else {
        String::new()
    };

    Ok(DirectoryRef { repo_id, directory })
}

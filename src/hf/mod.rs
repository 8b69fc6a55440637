//! Hugging Face Hub helpers.
//!
//! This module owns everything remote-specific: turning a web URL into a
//! repository and directory (`resolve`), building and matching inclusion
//! patterns (`pattern`), planning the local destination (`fetch`), and the
//! `hf-hub` backed transfer (`hub`).

pub mod fetch;
pub mod hub;
pub mod pattern;
pub mod resolve;

/// Host every accepted URL must point at.
pub const HF_HOST: &str = "huggingface.co";

/// A repository plus a directory inside it, as extracted from a URL.
///
/// `directory` may be empty when the URL names only a repository; callers
/// treat that as "no directory selected".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryRef {
    pub repo_id: String,
    pub directory: String,
}

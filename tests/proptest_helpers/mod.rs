#![allow(dead_code)]

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// A URL path segment made of unreserved characters only.
///
/// Starts with an alphanumeric so it can never be `.` or `..`, which URL
/// parsing would collapse.
pub fn arb_segment() -> BoxedStrategy<String> {
    "[A-Za-z0-9][A-Za-z0-9._-]{0,15}".boxed()
}

/// A segment that is not the branch marker.
pub fn arb_non_tree_segment() -> BoxedStrategy<String> {
    arb_segment()
        .prop_filter("must not be the tree marker", |seg| seg != "tree")
        .boxed()
}

/// One to `max_depth` directory segments.
pub fn arb_directory(max_depth: usize) -> BoxedStrategy<Vec<String>> {
    prop::collection::vec(arb_segment(), 1..=max_depth).boxed()
}

/// A lowercase host that is never the Hugging Face host.
pub fn arb_foreign_host() -> BoxedStrategy<String> {
    "[a-z]{1,12}\\.(com|org|io|dev)"
        .prop_filter("must not be huggingface.co", |host| host != "huggingface.co")
        .boxed()
}

pub fn hf_url(segments: &[String]) -> String {
    format!("https://huggingface.co/{}", segments.join("/"))
}

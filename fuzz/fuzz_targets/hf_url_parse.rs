//! Fuzz target for Hugging Face directory URL parsing.
//!
//! This fuzzer feeds arbitrary UTF-8 strings to the URL parser, checking
//! for panics, crashes, or hangs. Accepted URLs must round-trip into the
//! inclusion-pattern builder without panicking either.

#![no_main]

use hf_subdir::hf::pattern::inclusion_patterns;
use hf_subdir::hf::resolve::parse_hf_url;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }

    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(parsed) = parse_hf_url(input) {
        if !parsed.directory.is_empty() {
            let _ = inclusion_patterns(&parsed.directory);
        }
    }
});

//! Session management: submission dedup, worker dispatch and result cache

mod cache;
mod orchestrator;

use std::path::Path;

pub use cache::ResultCache;
pub use orchestrator::{Completion, Orchestrator};

/// Container extensions accepted for submission
pub const SUPPORTED_EXTENSIONS: &[&str] = &["flac", "wav", "m4a", "ape"];

/// Case-insensitive extension pre-filter applied before submission
pub fn is_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(e))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_filter() {
        assert!(is_supported_extension(Path::new("a/b/track.flac")));
        assert!(is_supported_extension(Path::new("TRACK.FLAC")));
        assert!(is_supported_extension(Path::new("x.Wav")));
        assert!(is_supported_extension(Path::new("x.m4a")));
        assert!(is_supported_extension(Path::new("x.ape")));
        assert!(!is_supported_extension(Path::new("x.mp3")));
        assert!(!is_supported_extension(Path::new("cover.jpg")));
        assert!(!is_supported_extension(Path::new("noext")));
    }
}

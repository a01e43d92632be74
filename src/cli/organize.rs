//! Copy suspected fakes into a review folder

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::detection::{AnalysisResult, Verdict};

/// Folder created under the destination for suspect files
pub const SUSPECT_DIR_NAME: &str = "_SUSPECTED_FAKE";

/// Copy every file judged `FakeOrUpscaled` into `<dest>/_SUSPECTED_FAKE/`.
///
/// Originals are left in place. Returns the paths of the copies.
pub fn organize_suspects(results: &[AnalysisResult], dest: &Path) -> Result<Vec<PathBuf>> {
    let suspects: Vec<_> = results
        .iter()
        .filter(|r| r.verdict == Verdict::FakeOrUpscaled)
        .collect();
    if suspects.is_empty() {
        return Ok(Vec::new());
    }

    let target_dir = dest.join(SUSPECT_DIR_NAME);
    std::fs::create_dir_all(&target_dir)
        .with_context(|| format!("Failed to create {}", target_dir.display()))?;

    let mut copied = Vec::with_capacity(suspects.len());
    for result in suspects {
        let source = result.audio_ref.path();
        let target = target_dir.join(result.audio_ref.file_name());
        std::fs::copy(source, &target).with_context(|| {
            format!("Failed to copy {} to {}", source.display(), target.display())
        })?;
        log::info!("Copied suspect {} to {}", source.display(), target.display());
        copied.push(target);
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{AudioRef, CutoffEstimate, EncoderHint};

    fn result_for(path: &Path, verdict: Verdict) -> AnalysisResult {
        AnalysisResult {
            audio_ref: AudioRef::new(path),
            specs: None,
            encoder: EncoderHint::Unknown,
            cutoff: CutoffEstimate::new(16_000.0),
            verdict,
            spectrogram: None,
            failure: None,
            analyzed_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_copies_only_fakes() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let fake = src.path().join("fake.flac");
        let real = src.path().join("real.flac");
        std::fs::write(&fake, b"fake").unwrap();
        std::fs::write(&real, b"real").unwrap();

        let results = vec![
            result_for(&fake, Verdict::FakeOrUpscaled),
            result_for(&real, Verdict::ProLossless),
        ];
        let copied = organize_suspects(&results, dest.path()).unwrap();

        let expected = dest.path().join(SUSPECT_DIR_NAME).join("fake.flac");
        assert_eq!(copied, vec![expected.clone()]);
        assert_eq!(std::fs::read(&expected).unwrap(), b"fake");
        assert!(!dest.path().join(SUSPECT_DIR_NAME).join("real.flac").exists());
        assert!(fake.exists());
    }

    #[test]
    fn test_no_suspects_creates_nothing() {
        let dest = tempfile::tempdir().unwrap();
        let copied = organize_suspects(&[], dest.path()).unwrap();
        assert!(copied.is_empty());
        assert!(!dest.path().join(SUSPECT_DIR_NAME).exists());
    }
}

//! Aggregate verdict counts over a batch of results

use serde::Serialize;

use super::result::{AnalysisResult, Verdict};

/// Verdict counts. Failures are tallied separately and never count toward
/// the authenticity figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerdictSummary {
    pub pro_lossless: usize,
    pub mastering_limit: usize,
    pub fake_or_upscaled: usize,
    pub failed: usize,
}

impl VerdictSummary {
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a AnalysisResult>,
    {
        let mut summary = Self::default();
        for result in results {
            summary.record(result.verdict);
        }
        summary
    }

    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::ProLossless => self.pro_lossless += 1,
            Verdict::MasteringLimit => self.mastering_limit += 1,
            Verdict::FakeOrUpscaled => self.fake_or_upscaled += 1,
            Verdict::AnalysisError => self.failed += 1,
        }
    }

    /// Files that produced a verdict
    pub fn analyzed(&self) -> usize {
        self.pro_lossless + self.mastering_limit + self.fake_or_upscaled
    }

    pub fn total(&self) -> usize {
        self.analyzed() + self.failed
    }

    /// Share of analyzed files judged fake, in percent
    pub fn fake_ratio(&self) -> f32 {
        match self.analyzed() {
            0 => 0.0,
            n => self.fake_or_upscaled as f32 * 100.0 / n as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_counted_separately() {
        let mut summary = VerdictSummary::default();
        for v in [
            Verdict::ProLossless,
            Verdict::FakeOrUpscaled,
            Verdict::AnalysisError,
            Verdict::AnalysisError,
        ] {
            summary.record(v);
        }

        assert_eq!(summary.analyzed(), 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.total(), 4);
        assert!((summary.fake_ratio() - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_ratio() {
        assert_eq!(VerdictSummary::default().fake_ratio(), 0.0);
    }
}

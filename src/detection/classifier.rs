//! Verdict classification from the estimated cutoff frequency

use super::result::Verdict;

/// Lowest cutoff (inclusive) still considered full-bandwidth lossless
pub const PRO_LOSSLESS_MIN_HZ: f32 = 19_800.0;

/// Lowest cutoff (inclusive) attributed to mastering rather than lossy encoding
pub const MASTERING_LIMIT_MIN_HZ: f32 = 17_200.0;

/// Map a cutoff frequency to its verdict tier.
///
/// Lower bounds are inclusive. A NaN cutoff falls through to the lowest tier.
/// The encoder hint plays no part.
pub fn classify(cutoff_hz: f32) -> Verdict {
    if cutoff_hz >= PRO_LOSSLESS_MIN_HZ {
        Verdict::ProLossless
    } else if cutoff_hz >= MASTERING_LIMIT_MIN_HZ {
        Verdict::MasteringLimit
    } else {
        Verdict::FakeOrUpscaled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(classify(19_800.0), Verdict::ProLossless);
        assert_eq!(classify(19_799.9), Verdict::MasteringLimit);
        assert_eq!(classify(17_200.0), Verdict::MasteringLimit);
        assert_eq!(classify(17_199.9), Verdict::FakeOrUpscaled);
    }

    #[test]
    fn test_never_yields_error_verdict() {
        let cutoffs = [
            0.0, 1.0, 11_025.0, 16_000.0, 17_199.0, 18_500.0, 19_800.5, 22_050.0, 96_000.0,
            f32::INFINITY, f32::NAN, -1.0,
        ];
        for f in cutoffs {
            let v = classify(f);
            assert!(
                matches!(v, Verdict::ProLossless | Verdict::MasteringLimit | Verdict::FakeOrUpscaled),
                "{} -> {:?}",
                f,
                v
            );
        }
    }

    #[test]
    fn test_typical_lossy_ceilings() {
        // MP3 128k lowpass ~16 kHz, 192k ~19 kHz
        assert_eq!(classify(16_000.0), Verdict::FakeOrUpscaled);
        assert_eq!(classify(19_000.0), Verdict::MasteringLimit);
        assert_eq!(classify(22_050.0), Verdict::ProLossless);
    }
}

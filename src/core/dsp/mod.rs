//! Digital Signal Processing utilities

pub mod mel;
pub mod stft;
pub mod windows;

pub use mel::MelFilterbank;
pub use stft::Stft;

/// Smallest power value treated as non-zero
pub const AMIN_POWER: f32 = 1e-10;

/// Smallest amplitude treated as non-zero
pub const AMIN_AMPLITUDE: f32 = 1e-5;

/// Convert power values to dB relative to their own maximum.
///
/// Values are floored at `-top_db`. Values at or below [`AMIN_POWER`] carry
/// no signal and map to the floor, as does a buffer whose peak is below it.
pub fn power_to_db(values: &[f32], top_db: f32) -> Vec<f32> {
    relative_db(values, 10.0, AMIN_POWER, top_db)
}

/// Convert magnitude values to dB relative to their own maximum.
///
/// Same flooring and silence rules as [`power_to_db`], with [`AMIN_AMPLITUDE`].
pub fn amplitude_to_db(values: &[f32], top_db: f32) -> Vec<f32> {
    relative_db(values, 20.0, AMIN_AMPLITUDE, top_db)
}

fn relative_db(values: &[f32], scale: f32, amin: f32, top_db: f32) -> Vec<f32> {
    let peak = peak(values);
    if peak < amin {
        return vec![-top_db; values.len()];
    }
    let ref_db = scale * peak.log10();
    values
        .iter()
        .map(|&v| {
            if v <= amin {
                // below the absolute floor: no signal, whatever the peak
                -top_db
            } else {
                (scale * v.log10() - ref_db).max(-top_db)
            }
        })
        .collect()
}

/// Largest finite value, or 0 for an empty slice
pub fn peak(values: &[f32]) -> f32 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0f32, f32::max)
}

/// Average interleaved channels down to mono
pub fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

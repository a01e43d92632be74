// src/core/metadata.rs
//
// Header-only metadata extraction: technical specs and encoder fingerprint.
// No audio packets are decoded here.

use std::path::Path;

use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::meta::MetadataRevision;

use super::decoder::probe_file;
use super::error::{StageError, StageResult};
use crate::detection::{Bitrate, EncoderHint, TechnicalSpecs};

/// Everything learned about a file without decoding it
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub specs: TechnicalSpecs,
    pub encoder: EncoderHint,
    /// Raw tag values the encoder hint was derived from
    pub tag_values: Vec<String>,
}

/// Read container headers and tags from `path`
pub fn extract_metadata(path: &Path) -> StageResult<FileMetadata> {
    let mut probed = probe_file(path).map_err(StageError::metadata)?;

    let mut tag_values = Vec::new();
    if let Some(meta) = probed.metadata.get() {
        if let Some(rev) = meta.current() {
            collect_tag_values(rev, &mut tag_values);
        }
    }
    if let Some(rev) = probed.format.metadata().current() {
        collect_tag_values(rev, &mut tag_values);
    }

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| StageError::metadata("no supported audio track found"))?;
    let params = &track.codec_params;

    let sample_rate_hz = params
        .sample_rate
        .filter(|&sr| sr > 0)
        .ok_or_else(|| StageError::metadata("stream does not specify a sample rate"))?;

    let codec_name = symphonia::default::get_codecs()
        .get_codec(params.codec)
        .map(|d| d.short_name.to_string())
        .unwrap_or_else(|| format!("{:?}", params.codec));

    let duration_secs = params
        .n_frames
        .map(|frames| frames as f64 / sample_rate_hz as f64);
    let file_bytes = std::fs::metadata(path).map(|m| m.len()).ok();

    let specs = TechnicalSpecs {
        sample_rate_hz,
        reported_bit_depth: params.bits_per_sample,
        bitrate: nominal_bitrate(file_bytes, duration_secs),
        channels: params.channels.map(|c| c.count()),
        codec_name,
    };
    let encoder = EncoderHint::from_tag_values(&tag_values);

    log::debug!(
        "{}: {} {} ({}), encoder hint {:?}",
        path.display(),
        specs.codec_name,
        specs.summary(),
        specs.bitrate,
        encoder
    );

    Ok(FileMetadata {
        specs,
        encoder,
        tag_values,
    })
}

fn collect_tag_values(rev: &MetadataRevision, out: &mut Vec<String>) {
    out.extend(rev.tags().iter().map(|tag| tag.value.to_string()));
    out.extend(rev.vendor_data().iter().filter_map(|v| {
        std::str::from_utf8(&v.data).ok().map(str::to_string)
    }));
}

/// Average bitrate over the stream, rounded to kbps.
///
/// Without a known duration there is no nominal figure and the stream is
/// reported as VBR.
fn nominal_bitrate(file_bytes: Option<u64>, duration_secs: Option<f64>) -> Bitrate {
    match (file_bytes, duration_secs) {
        (Some(bytes), Some(secs)) if secs > 0.0 => {
            Bitrate::Kbps((bytes as f64 * 8.0 / secs / 1000.0).round() as u32)
        }
        _ => Bitrate::Vbr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_bitrate() {
        // one minute of CD audio: 44100 * 2 * 2 * 60 bytes
        let bytes = 44_100u64 * 4 * 60;
        assert_eq!(nominal_bitrate(Some(bytes), Some(60.0)), Bitrate::Kbps(1411));
        assert_eq!(nominal_bitrate(Some(bytes), None), Bitrate::Vbr);
        assert_eq!(nominal_bitrate(Some(bytes), Some(0.0)), Bitrate::Vbr);
    }

    #[test]
    fn test_unreadable_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.flac");
        std::fs::write(&path, b"definitely not a flac stream").unwrap();

        let err = extract_metadata(&path).unwrap_err();
        assert!(matches!(err, StageError::UnreadableMetadata(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = extract_metadata(Path::new("/nonexistent/a.wav")).unwrap_err();
        assert!(matches!(err, StageError::UnreadableMetadata(_)));
    }
}

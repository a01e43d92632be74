// tests/cli_test.rs
//
// Runs the built binary against a generated library folder.

mod test_utils;

use std::process::Command;

use test_utils::{sine_sweep, white_noise, Fixtures, SAMPLE_RATE};

fn flacaudit() -> Command {
    Command::new(env!("CARGO_BIN_EXE_flacaudit"))
}

fn library() -> Fixtures {
    let fx = Fixtures::new();
    fx.wav(
        "real.wav",
        &white_noise(2.0, SAMPLE_RATE, 0.5, 77),
        SAMPLE_RATE,
    );
    fx.wav(
        "fake.wav",
        &sine_sweep(200.0, 15_500.0, 3.0, SAMPLE_RATE),
        SAMPLE_RATE,
    );
    fx.corrupt("broken.flac");
    std::fs::write(fx.path().join("cover.jpg"), b"not audio").unwrap();
    fx
}

#[test]
fn test_json_report() {
    let fx = library();
    let output = flacaudit()
        .arg(fx.path())
        .arg("--json")
        .output()
        .expect("Failed to run flacaudit");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = report["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);

    let verdict_of = |name: &str| {
        results
            .iter()
            .find(|r| r["audio_ref"]["id"].as_str().unwrap().ends_with(name))
            .map(|r| r["verdict"].as_str().unwrap().to_string())
            .unwrap()
    };
    assert_eq!(verdict_of("real.wav"), "ProLossless");
    assert_eq!(verdict_of("fake.wav"), "FakeOrUpscaled");
    assert_eq!(verdict_of("broken.flac"), "AnalysisError");

    assert_eq!(report["summary"]["pro_lossless"], 1);
    assert_eq!(report["summary"]["fake_or_upscaled"], 1);
    assert_eq!(report["summary"]["failed"], 1);
}

#[test]
fn test_table_output_and_organize() {
    let fx = library();
    let dest = tempfile::tempdir().unwrap();
    let output = flacaudit()
        .arg(fx.path())
        .arg("--no-progress")
        .arg("--organize")
        .arg(dest.path())
        .output()
        .expect("Failed to run flacaudit");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PRO LOSSLESS"));
    assert!(stdout.contains("FAKE / UPSCALED"));
    assert!(stdout.contains("ERROR"));

    let suspects = dest.path().join("_SUSPECTED_FAKE");
    assert!(suspects.join("fake.wav").is_file());
    assert!(!suspects.join("real.wav").exists());
}

#[test]
fn test_no_audio_files() {
    let fx = Fixtures::new();
    std::fs::write(fx.path().join("readme.txt"), b"hello").unwrap();

    let output = flacaudit().arg(fx.path()).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No audio files found"));
}

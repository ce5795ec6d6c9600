mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::COPY_READY_PROBE;

fn vidprep() -> Command {
    let mut cmd = Command::cargo_bin("vidprep").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn probe_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("probe.json");
    std::fs::write(&path, COPY_READY_PROBE).unwrap();
    path
}

#[test]
fn test_plan_prints_stream_copy() {
    let dir = tempfile::tempdir().unwrap();
    vidprep()
        .arg("plan")
        .arg("--probe-json")
        .arg(probe_file(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("stream copy"))
        .stdout(predicate::str::contains("-c:v copy -bsf:a aac_adtstoasc"));
}

#[test]
fn test_plan_scale_forces_reencode() {
    let dir = tempfile::tempdir().unwrap();
    vidprep()
        .args(["plan", "--scale-720", "--fps", "25", "--probe-json"])
        .arg(probe_file(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("re-encode: video filters required"))
        .stdout(predicate::str::contains("-codec:v h264 -bf 0 -vf fps=25"));
}

#[test]
fn test_plan_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = vidprep()
        .args(["plan", "--json", "--codec", "hevc", "--probe-json"])
        .arg(probe_file(&dir))
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["decision"]["reencode_video"], true);
    assert_eq!(value["decision"]["reason"]["kind"], "codec_mismatch");
    assert_eq!(value["args"][0], "-codec:v");
}

#[test]
fn test_plan_rejects_probe_without_video() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audio.json");
    std::fs::write(
        &path,
        r#"{"streams": [{"codec_type": "audio", "codec_name": "aac"}], "format": {}}"#,
    )
    .unwrap();
    vidprep()
        .args(["plan", "--probe-json"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("video stream"));
}

#[test]
fn test_sample_is_reproducible_with_seed() {
    let run = || {
        vidprep()
            .args(["sample", "--frames", "1000", "--amount", "30", "--seed", "42"])
            .output()
            .unwrap()
    };
    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let indices: Vec<u64> = String::from_utf8(first.stdout)
        .unwrap()
        .lines()
        .map(|l| l.parse().unwrap())
        .collect();
    assert!(indices.len() <= 30);
    assert!(indices.iter().all(|i| (100..=900).contains(i)));
}

#[test]
fn test_sample_small_window_terminates() {
    let output = vidprep()
        .args(["sample", "--frames", "5", "--amount", "100", "--seed", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().lines().count() <= 5);
}

#[test]
fn test_clips_malformed_intervals_fail() {
    let dir = tempfile::tempdir().unwrap();
    let intervals = dir.path().join("intervals.txt");
    std::fs::write(&intervals, "00:00:10;00:00:20\n").unwrap();
    vidprep()
        .args(["clips", "-v", "game.mp4", "-o"])
        .arg(dir.path())
        .arg("-i")
        .arg(&intervals)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed"));
}

#[test]
fn test_grab_rejects_quality_out_of_range() {
    vidprep()
        .args(["grab", "-v", "game.mp4", "-q", "40"])
        .assert()
        .failure();
}

#[test]
fn test_grab_rejects_num_with_fps() {
    vidprep()
        .args(["grab", "-v", "game.mp4", "-n", "10", "--fps", "5"])
        .assert()
        .failure();
}

#[test]
fn test_bad_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("vidprep.toml");
    std::fs::write(&config, "[vidprep]\nworkers = 0\n").unwrap();
    vidprep()
        .arg("--config")
        .arg(&config)
        .args(["sample", "--frames", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("workers"));
}

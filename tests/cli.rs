// Runs the compiled binary to check process-level behaviour.

mod common;

use std::process::Command;
use tempfile::tempdir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_coco-topics"))
}

#[test]
fn train_exits_nonzero_when_train_cache_missing() {
    let dir = tempdir().unwrap();
    let out = bin()
        .args(["train", "--data"])
        .arg(dir.path())
        .args(["--weights_dir"])
        .arg(dir.path().join("weights"))
        .output()
        .unwrap();

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("processed train data does not exist."), "stderr: {stderr}");
}

#[test]
fn train_exits_nonzero_when_val_cache_missing() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    common::write_coco(root);

    let status = bin().args(["parse", "--root"]).arg(root).status().unwrap();
    assert!(status.success());

    let data = root.join("processed");
    let status = bin()
        .args(["topics", "--raw"])
        .arg(root.join("coco_raw.json"))
        .arg("--data")
        .arg(&data)
        .status()
        .unwrap();
    assert!(status.success());

    // Only the train features exist
    let train_rows = common::images("train").len();
    let features = coco_topics::infra::array_store::Matrix::new(train_rows, 4, vec![0.0; train_rows * 4]).unwrap();
    coco_topics::data::cache::save_features(coco_topics::domain::split::Split::Train, &data, features).unwrap();

    let out = bin()
        .args(["train", "--data"])
        .arg(&data)
        .arg("--weights_dir")
        .arg(root.join("weights"))
        .output()
        .unwrap();

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("processed val data does not exist."), "stderr: {stderr}");
}

#[test]
fn training_flags_are_registered() {
    let out = bin().args(["train", "--help"]).output().unwrap();
    let help = String::from_utf8_lossy(&out.stdout);
    for flag in ["--batch_size", "--epochs", "--early_stop", "--lr_decay", "--min_lr", "--raw", "--data"] {
        assert!(help.contains(flag), "missing {flag} in:\n{help}");
    }
    for text in ["Seed for weight init", "Data loader worker threads", "Samples per mini-batch"] {
        assert!(help.contains(text), "missing '{text}' in:\n{help}");
    }
}

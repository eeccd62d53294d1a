//! Build checks for the wasm32 bindings
//!
//! Both tests shell out to external tools and are ignored by default.
//! Run with `cargo test -- --ignored` when wasm-pack and the
//! wasm32-unknown-unknown target are installed.

use std::process::Command;

#[test]
#[ignore]
fn test_wasm_pack_build() {
    if Command::new("wasm-pack").arg("--version").output().is_err() {
        eprintln!("Skipping WASM test: wasm-pack not found. Install with: cargo install wasm-pack");
        return;
    }

    let out_dir = tempfile::tempdir().unwrap();
    let output = Command::new("wasm-pack")
        .arg("build")
        .args(["--target", "web", "--out-dir"])
        .arg(out_dir.path())
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("failed to run wasm-pack");
    assert!(
        output.status.success(),
        "WASM build failed:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert!(out_dir.path().join("flowlayer_bg.wasm").exists());
    assert!(out_dir.path().join("flowlayer.js").exists());
}

#[test]
#[ignore]
fn test_wasm_target_check() {
    let output = Command::new("cargo")
        .args(["check", "--target", "wasm32-unknown-unknown"])
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("failed to run cargo");
    assert!(
        output.status.success(),
        "WASM target check failed:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
}

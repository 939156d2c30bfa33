//! Generate UniFFI foreign-language bindings for ProxFind
//!
//! Run: cargo run --bin generate-bindings -- [swift|kotlin|python] [out-dir]
//!
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │ Inputs:                                                                     │
//! │   target/release/libproxfind.{dylib,so}  ← Built library for bindgen        │
//! │                                                                             │
//! │ Outputs (default out-dir: bindings/<language>):                             │
//! │   proxfind.swift + proxfindFFI.h + module.modulemap   (swift)               │
//! │   uniffi/proxfind/proxfind.kt                         (kotlin)              │
//! │   proxfind.py                                         (python)              │
//! └─────────────────────────────────────────────────────────────────────────────┘

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const LANGUAGES: &[&str] = &["swift", "kotlin", "python"];

fn main() {
    let mut args = env::args().skip(1);
    let language = args.next().unwrap_or_else(|| "swift".to_string());
    if !LANGUAGES.contains(&language.as_str()) {
        panic!("Unsupported language {:?}; expected one of {:?}", language, LANGUAGES);
    }

    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = crate_dir.parent().expect("No parent directory").to_path_buf();
    let out_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| workspace_root.join("bindings").join(&language));

    println!("Building Rust library...");
    run_cmd("cargo", &["build", "--release", "-p", "proxfind"], &workspace_root);

    let library = library_path(&workspace_root);
    println!("Generating {} bindings from {}...", language, library.display());
    fs::create_dir_all(&out_dir).expect("Create output directory");
    run_cmd(
        "cargo",
        &[
            "run",
            "-p",
            "proxfind",
            "--bin",
            "uniffi-bindgen",
            "generate",
            "--library",
            &library.to_string_lossy(),
            "--language",
            &language,
            "--out-dir",
            &out_dir.to_string_lossy(),
        ],
        &workspace_root,
    );

    if language == "swift" {
        // Swift needs a modulemap so the FFI header can be imported as a module
        println!("Writing modulemap...");
        fs::write(
            out_dir.join("module.modulemap"),
            "module proxfindFFI {\n    header \"proxfindFFI.h\"\n    export *\n}\n",
        )
        .expect("Write modulemap");
    }

    println!("Done! Bindings written to {}", out_dir.display());
}

fn library_path(workspace_root: &Path) -> PathBuf {
    let release = workspace_root.join("target").join("release");
    let file = if cfg!(target_os = "macos") {
        "libproxfind.dylib"
    } else if cfg!(target_os = "windows") {
        "proxfind.dll"
    } else {
        "libproxfind.so"
    };
    release.join(file)
}

fn run_cmd(program: &str, args: &[&str], dir: &Path) {
    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap_or_else(|e| panic!("Failed to run {}: {}", program, e));

    if !status.success() {
        panic!("{} failed with status: {}", program, status);
    }
}

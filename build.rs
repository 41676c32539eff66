//! Stamps the source revision into the binary for `profile-pdf --version`.
//!
//! `PROFILE_PDF_GIT_REV` wins when set (packagers building from a tarball);
//! otherwise `git describe` is asked, and `unknown` is used if that fails.

use std::process::Command;

const REV_VAR: &str = "PROFILE_PDF_GIT_REV";

fn main() {
    println!("cargo:rerun-if-env-changed={REV_VAR}");
    for watched in [".git/HEAD", ".git/index", ".git/refs"] {
        println!("cargo:rerun-if-changed={watched}");
    }

    let rev = std::env::var(REV_VAR)
        .ok()
        .filter(|rev| !rev.trim().is_empty())
        .or_else(describe_head)
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env={REV_VAR}={}", rev.trim());
}

fn describe_head() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=12"])
        .output()
        .ok()
        .filter(|output| output.status.success())?;
    String::from_utf8(output.stdout)
        .ok()
        .map(|rev| rev.trim().to_string())
        .filter(|rev| !rev.is_empty())
}

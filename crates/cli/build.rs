use std::process::Command;

/// `git describe` output for `--version`, or "unknown" outside a checkout.
fn git_describe() -> String {
    let output = match Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=7"])
        .output()
    {
        Ok(output) if output.status.success() => output,
        _ => return "unknown".into(),
    };
    match String::from_utf8(output.stdout) {
        Ok(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => "unknown".into(),
    }
}

fn main() {
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/index");

    println!("cargo:rustc-env=CITEDATE_GIT_DESCRIBE={}", git_describe());
    for key in ["TARGET", "PROFILE"] {
        let value = std::env::var(key).unwrap_or_else(|_| "unknown".into());
        println!("cargo:rustc-env=CITEDATE_BUILD_{key}={value}");
    }
}

use std::env;
use std::path::Path;
use std::process::Command;

fn main() {
    let hash = command_output("git", &["rev-parse", "--short", "HEAD"]);
    println!("cargo:rustc-env=SHAPEBOARD_GIT_HASH={hash}");

    // Plugins are checked against the exact compiler that built the host,
    // since trait objects cross the library boundary.
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".into());
    let rustc_version = command_output(&rustc, &["--version"]);
    println!("cargo:rustc-env=SHAPEBOARD_RUSTC_VERSION={rustc_version}");

    println!("cargo:rerun-if-env-changed=RUSTC");
    if Path::new(".git/HEAD").exists() {
        println!("cargo:rerun-if-changed=.git/HEAD");
    }
}

fn command_output(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".into())
}

use std::env;
use std::process::Command;

/// Feature list and compiler flags passed to the cargo commands below.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildConfig {
    pub features: Vec<String>,
    pub rustflags: Option<String>,
}

impl BuildConfig {
    /// Join features into a single string suitable for passing to cargo.
    pub fn features_arg(&self) -> Option<String> {
        if self.features.is_empty() {
            None
        } else {
            Some(self.features.join(" "))
        }
    }
}

/// Read the configuration from `FHTGLOW_FEATURES` and `FHTGLOW_NATIVE`.
pub fn detect_config() -> BuildConfig {
    let extra = env::var("FHTGLOW_FEATURES").unwrap_or_default();
    let native = env::var("FHTGLOW_NATIVE").map_or(false, |v| v == "1" || v == "true");
    compute_config(&extra, native)
}

/// Compute a [`BuildConfig`] from supplied inputs. This is separated for testing.
pub fn compute_config(extra: &str, native: bool) -> BuildConfig {
    let mut features: Vec<String> = Vec::new();
    for feat in extra.split([' ', ',']) {
        if !feat.is_empty() && !features.iter().any(|f| f == feat) {
            features.push(feat.to_string());
        }
    }
    let rustflags = native.then(|| "-C target-cpu=native".to_string());
    BuildConfig {
        features,
        rustflags,
    }
}

fn cargo(cfg: &BuildConfig, args: &[&str]) -> Command {
    let mut cmd = Command::new("cargo");
    if let Some(rf) = &cfg.rustflags {
        cmd.env("RUSTFLAGS", rf);
    }
    cmd.args(args);
    if let Some(f) = cfg.features_arg() {
        cmd.arg("--features").arg(f);
    }
    cmd
}

pub fn build_command(cfg: &BuildConfig) -> Command {
    cargo(cfg, &["build"])
}

pub fn test_command(cfg: &BuildConfig) -> Command {
    cargo(cfg, &["test"])
}

pub fn clippy_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["clippy", "--all-targets", "--all-features"]);
    cmd
}

pub fn fmt_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["fmt", "--all"]);
    cmd
}

pub fn bench_command(cfg: &BuildConfig) -> Command {
    cargo(cfg, &["bench", "--manifest-path", "fhtglow-bench/Cargo.toml"])
}

pub fn sanity_command(input: &str, output: &str, size: Option<u32>) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "-r", "-p", "sanity-check", "--", input, output]);
    if let Some(size) = size {
        cmd.arg("--size").arg(size.to_string());
    }
    cmd
}

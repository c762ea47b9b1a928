#[cfg(not(test))]
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
#[cfg(not(test))]
use xtask::*;

#[derive(Parser)]
#[command(author, version, about = "Development tasks for fhtglow")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Build,
    Test,
    Clippy,
    Fmt,
    Analyze,
    Bench,
    Sanity {
        /// Path to input image
        input: String,
        /// Path to output PNG file
        output: String,
        /// log2 of the glow kernel side
        #[arg(long)]
        size: Option<u32>,
    },
}

#[cfg(not(test))]
fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = detect_config();

    let status = match cli.command {
        Commands::Build => build_command(&cfg).status()?,
        Commands::Test => test_command(&cfg).status()?,
        Commands::Clippy => clippy_command().status()?,
        Commands::Fmt => fmt_command().status()?,
        Commands::Analyze => {
            let fmt = fmt_command().status()?;
            if !fmt.success() {
                fmt
            } else {
                clippy_command().status()?
            }
        }
        Commands::Bench => bench_command(&cfg).status()?,
        Commands::Sanity {
            input,
            output,
            size,
        } => sanity_command(&input, &output, size).status()?,
    };

    if !status.success() {
        bail!("command failed with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sanity_command() {
        let cli = Cli::parse_from(["xtask", "sanity", "a.png", "b.png", "--size", "5"]);
        match cli.command {
            Commands::Sanity {
                input,
                output,
                size,
            } => {
                assert_eq!((input.as_str(), output.as_str(), size), ("a.png", "b.png", Some(5)));
            }
            _ => panic!("parsed wrong command"),
        }
    }

    #[test]
    fn parse_bench_command() {
        let cli = Cli::parse_from(["xtask", "bench"]);
        assert!(matches!(cli.command, Commands::Bench));
    }
}

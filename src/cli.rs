use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "license-bom",
    about = "List the licenses of a Go package and all its dependencies",
    version
)]
pub struct Cli {
    /// Packages or package patterns to inspect (e.g. `./...`)
    #[arg(required = true, value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// JSON file forcing licenses for some projects: [{"project": ..., "licenses": [{"name": ...}]}]
    #[arg(long, value_name = "FILE")]
    pub override_file: Option<PathBuf>,

    /// Config file [default: ./.license-bom/config.toml, fallback ~/.config/license-bom/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// GOPATH to use for every toolchain call
    #[arg(long, value_name = "DIR")]
    pub gopath: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "json", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Show per-file match details and debug logs
    #[arg(short, long)]
    pub verbose: bool,

    /// No progress bar, summary line only for terminal reports
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum ReportFormat {
    Json,
    Terminal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["license-bom", "./..."]).unwrap();
        assert_eq!(cli.packages, vec!["./..."]);
        assert_eq!(cli.report, ReportFormat::Json);
        assert!(cli.override_file.is_none());
    }

    #[test]
    fn test_all_options() {
        let cli = Cli::try_parse_from([
            "license-bom",
            "--override-file",
            "overrides.json",
            "--gopath",
            "/go",
            "--report",
            "terminal",
            "-v",
            "colors/red",
            "colors/blue",
        ])
        .unwrap();
        assert_eq!(cli.override_file, Some(PathBuf::from("overrides.json")));
        assert_eq!(cli.gopath, Some(PathBuf::from("/go")));
        assert_eq!(cli.report, ReportFormat::Terminal);
        assert!(cli.verbose);
        assert_eq!(cli.packages, vec!["colors/red", "colors/blue"]);
    }

    #[test]
    fn test_packages_are_required() {
        assert!(Cli::try_parse_from(["license-bom"]).is_err());
    }
}

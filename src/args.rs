use clap::{Arg, ArgAction, Command, value_parser};
use std::path::PathBuf;

/// Command-line arguments for the release packager
#[derive(Debug)]
pub struct Args {
    /// Enable verbose output
    pub verbose: bool,

    /// Package the remaining variants after one fails
    pub keep_going: bool,

    /// Working directory holding the release inputs
    pub path: Option<PathBuf>,

    /// Release configuration file
    pub manifest: Option<PathBuf>,

    /// Folder receiving the archives
    pub output: Option<PathBuf>,

    /// Timestamp for every archive entry (seconds since the Unix epoch)
    pub source_date_epoch: Option<i64>,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        Self::from_matches(command().get_matches())
    }

    fn from_matches(matches: clap::ArgMatches) -> Self {
        Self {
            verbose: matches.get_flag("verbose"),
            keep_going: matches.get_flag("keep-going"),
            path: matches.get_one::<String>("path").map(PathBuf::from),
            manifest: matches.get_one::<String>("manifest").map(PathBuf::from),
            output: matches.get_one::<String>("output").map(PathBuf::from),
            source_date_epoch: matches.get_one::<i64>("source-date-epoch").copied(),
        }
    }
}

fn command() -> Command {
    Command::new("prepare-release")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Package prebuilt addon libraries into per-variant release archives")
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .value_name("DIR")
                .help("Directory holding the static files and build directories"),
        )
        .arg(
            Arg::new("manifest")
                .short('m')
                .long("manifest")
                .value_name("FILE")
                .help("Release configuration file (defaults to release.toml when present)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Folder receiving the archives (defaults to the working directory)"),
        )
        .arg(
            Arg::new("keep-going")
                .short('k')
                .long("keep-going")
                .action(ArgAction::SetTrue)
                .help("Package the remaining variants after one fails"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        )
        .arg(
            Arg::new("source-date-epoch")
                .long("source-date-epoch")
                .value_name("SECONDS")
                .env("SOURCE_DATE_EPOCH")
                .value_parser(value_parser!(i64))
                .help("Timestamp stamped on every archive entry"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::from_matches(command().try_get_matches_from(args).unwrap())
    }

    #[test]
    fn no_arguments_use_defaults() {
        let args = parse(&["prepare-release"]);
        assert!(!args.verbose);
        assert!(!args.keep_going);
        assert_eq!(args.path, None);
        assert_eq!(args.manifest, None);
        assert_eq!(args.output, None);
    }

    #[test]
    fn parses_all_flags() {
        let args = parse(&[
            "prepare-release",
            "-p",
            "artifacts",
            "--manifest",
            "ci/release.toml",
            "-o",
            "dist",
            "-k",
            "-v",
            "--source-date-epoch",
            "1704164646",
        ]);

        assert!(args.verbose);
        assert!(args.keep_going);
        assert_eq!(args.path, Some(PathBuf::from("artifacts")));
        assert_eq!(args.manifest, Some(PathBuf::from("ci/release.toml")));
        assert_eq!(args.output, Some(PathBuf::from("dist")));
        assert_eq!(args.source_date_epoch, Some(1_704_164_646));
    }

    #[test]
    fn rejects_non_numeric_epoch() {
        assert!(
            command()
                .try_get_matches_from(["prepare-release", "--source-date-epoch", "yesterday"])
                .is_err()
        );
    }

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }
}

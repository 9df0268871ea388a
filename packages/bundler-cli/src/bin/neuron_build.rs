use std::path::PathBuf;
use std::process;

use clap::{Arg, ArgAction, Command};

use neuron_bundler::BundleError;
use neuron_bundler_cli::build::perform_build;
use neuron_bundler_cli::config::BuildConfig;
use neuron_bundler_cli::logging::{ConsoleLogger, LogLevel, Logger};

#[tokio::main]
async fn main() {
    let matches = Command::new("neuron_build")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Neuron module bundler")
        .arg(
            Arg::new("project")
                .short('p')
                .long("project")
                .value_name("PATH")
                .help("Path to the build manifest (default: neuron.json)"),
        )
        .arg(
            Arg::new("target-version")
                .long("target-version")
                .value_name("VERSION")
                .help("Override the version used in every module identifier"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .get_matches();

    let manifest = matches
        .get_one::<String>("project")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("neuron.json"));

    let level = if matches.get_flag("verbose") {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    let logger = ConsoleLogger::new(level);

    let mut config = match BuildConfig::load(&manifest) {
        Ok(config) => config,
        Err(err) => {
            logger.error(&err.to_string());
            process::exit(1);
        }
    };
    if let Some(version) = matches.get_one::<String>("target-version") {
        config.target_version = Some(version.clone());
    }

    let summary = match perform_build(&config, &logger).await {
        Ok(summary) => summary,
        Err(err) => {
            report(&logger, &err);
            process::exit(1);
        }
    };

    for target in &summary.targets {
        if let Some(err) = &target.error {
            logger.error(&format!("{}: {:#}", target.entry.display(), err));
            if let Some(bundle_err) = err.downcast_ref::<BundleError>() {
                if let Some(hint) = bundle_err.remediation() {
                    logger.warn(hint);
                }
            }
        }
    }

    if summary.failed() {
        process::exit(1);
    }
}

fn report(logger: &dyn Logger, err: &BundleError) {
    logger.error(&err.to_string());
    if let Some(hint) = err.remediation() {
        logger.warn(hint);
    }
}

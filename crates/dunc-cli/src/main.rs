use clap::Parser;
use dunc::{logger, BuildOrchestrator, GlobalOpts};
use dunc_config::BuildConfig;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dunc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Run the build and install functions of a rez package.py",
    long_about = "dunc runs inside a rez build environment. It executes the build() function \
of the package's package.py and, when installing, its install() function. Only those \
functions run; the rest of package.py is never executed.\n\n\
Installs are not locked: do not run two dunc processes against the same install root at once."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Arc::new(BuildConfig::from_env());

    if let Err(e) = logger::init_with_verbosity(
        cli.global.verbosity_level(),
        cli.global.quiet,
        config.build_path().ok(),
    ) {
        logger::warn(&format!("Failed to initialize log file: {}", e));
    }
    init_tracing();
    if let Some(log_path) = logger::get_log_path() {
        logger::debug(&format!("Writing log to {}", log_path.display()));
    }

    logger::output("");
    let mut orchestrator = BuildOrchestrator::new(config);
    match orchestrator.run() {
        Ok(()) => {
            logger::success("Build steps completed");
            ExitCode::SUCCESS
        }
        Err(e) if e.is_domain() => {
            logger::output(&format!("An error occurred: {}", e));
            ExitCode::FAILURE
        }
        Err(e) => {
            logger::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("DUNC_LOG")
                .unwrap_or_else(|_| logger::verbosity_to_filter().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();
}

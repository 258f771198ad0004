use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use riffshare_core::{
    config::Settings,
    local::LocalStore,
    logger::{init_logger, init_tracing},
};

mod handlers;

use handlers::{
    CommandHandler, Context,
    implementations::show_welcome,
    utils::{SystemOpener, WriteAdapter},
};

/// Options configurable via the CLI.
#[derive(Debug, Parser)]
#[command(name = "riffshare", version = env!("CARGO_PKG_VERSION"), about)]
struct Flags {
    /// config file path
    #[clap(long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,
    /// Root url of the songs service, overrides the config file
    #[clap(long, value_hint = clap::ValueHint::Url)]
    api_url: Option<String>,
    /// Set the log level
    #[clap(long)]
    log_level: Option<log::LevelFilter>,
    /// Print a span for every request made to the songs service
    #[clap(long)]
    trace: bool,
    /// subcommand to run
    #[clap(subcommand)]
    subcommand: Option<handlers::Command>,
}

#[test]
fn verify_cli() {
    Flags::command().debug_assert();
}

#[cfg(not(tarpaulin_include))]
fn main() -> anyhow::Result<()> {
    clap_complete::CompleteEnv::with_factory(Flags::command).complete();

    let flags = Flags::parse();

    let config_file: PathBuf = match &flags.config {
        Some(config) => config.clone(),
        None => Settings::get_config_path()?,
    };

    let settings = Settings::init(config_file, flags.api_url, flags.log_level)?;

    init_logger(settings.client.log_level);
    if flags.trace {
        tracing::subscriber::set_global_default(init_tracing())?;
    }

    let mut local = LocalStore::open(settings.local_store_path()?)?;
    let api = settings.http_client()?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let mut stdout_adapter = WriteAdapter(std::io::stdout());
        let mut stderr_adapter = WriteAdapter(std::io::stderr());

        show_welcome(&mut local, &mut stderr_adapter)?;

        let mut ctx = Context::new(api, local, &settings, SystemOpener);

        if let Some(command) = flags.subcommand {
            command
                .handle(
                    &mut ctx,
                    &mut stdout_adapter,
                    &mut stderr_adapter,
                    &std::io::stdin(),
                )
                .await?;
        } else {
            eprintln!("No subcommand provided");
        }

        Ok(())
    })
}

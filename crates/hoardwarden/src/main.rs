use crate::prelude::*;
use clap::Parser;

mod convert;
mod error;
mod prelude;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Convert a Hoarder export JSON into Linkwarden's import format"
)]
pub struct App {
    #[clap(flatten)]
    pub convert: convert::ConvertOptions,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "HOARDWARDEN_VERBOSE", default_value = "false")]
    verbose: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let app = App::parse();
    init_logger(app.global.verbose);

    convert::run(app.convert, app.global)
}

/// `RUST_LOG` wins over `--verbose`
fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

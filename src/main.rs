use clap::Parser;
use healthfinder::cli::{Cli, Commands, cmd_init};
use healthfinder::{Config, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // `init` must work before a valid config exists.
    if matches!(cli.command, Some(Commands::Init)) {
        return cmd_init();
    }

    let (config, source) = Config::load()?;
    config.validate()?;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if config.general.worker_threads > 0 {
        builder.worker_threads(config.general.worker_threads);
    }

    let runtime = builder.build()?;
    runtime.block_on(run(cli, config, source.as_deref()))
}

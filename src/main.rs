use clap::Parser;
use log::{error, info};
use overflow_audit::configuration::config::{Cli, Config};
use overflow_audit::controller::Controller;

fn main() {
    // https://docs.rs/env_logger/latest/env_logger/
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    let args = Cli::parse();

    info!("Importing configuration");
    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Unable to import configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "Configuration imported: logs in {}, accounting rows in {}, time basis {}",
        config.corpus.log_directory.display(),
        config.accounting.records_path.display(),
        config.corpus.time_basis
    );

    let controller = Controller::new(config);
    match controller.run() {
        Ok(outcome) => {
            let exit_code = controller.config().accounting.exit_code;
            print!("{}", outcome.report.render_with_heading(exit_code));
        }
        Err(e) => {
            error!("Audit run failed: {}, exiting...", e);
            std::process::exit(1);
        }
    }
}

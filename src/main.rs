use clap::Parser;

use timetable_solver::config::{self, Cli};
use timetable_solver::pipeline;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match config::resolve(&cli) {
        Ok(c) => c,
        Err(e) => {
            log::error!("configuration error: {e}");
            std::process::exit(2);
        }
    };

    match pipeline::run(&config) {
        Ok(report) => {
            log::info!(
                "wrote schedule to {} ({} entries, profile {:?}, {} attempt(s))",
                config.out_dir.display(),
                report.entries.len(),
                report.profile_used,
                report.attempts
            );
        }
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    }
}

use log::error;

use trigl::interface::cli::cli_main;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = cli_main() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

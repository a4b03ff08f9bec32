// src/main.rs

use checkdag::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("checkdag error: {err:?}");
        std::process::exit(2);
    }

    match run(args).await {
        // Exit contract: 0 iff the aggregate status is succeeded.
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(err) => {
            eprintln!("checkdag error: {err:?}");
            std::process::exit(2);
        }
    }
}

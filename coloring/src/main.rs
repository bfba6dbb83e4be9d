use std::process::exit;

use mzn_coloring::cli::parse_args;
use mzn_coloring::cli::run;

fn main() {
    let args = parse_args();

    // logs go to stderr, stdout only receives the solution
    let subscriber = tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::Uptime::from(
            std::time::Instant::now(),
        ))
        .with_writer(std::io::stderr)
        .with_max_level(args.log_level)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("unable to set up logging: {e}");
    }

    match run(&args) {
        Ok(solution) => println!("{solution}"),
        Err(e) => {
            eprintln!("Aborted: {e:#}");
            exit(1);
        }
    }
}

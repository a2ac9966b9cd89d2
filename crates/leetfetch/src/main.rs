use std::process;

use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr so the report on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    match leetfetch::run_cli(&args_refs) {
        Ok(output) => {
            print!("{}", output.report);
            process::exit(output.status);
        }
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    }
}

use clap::Parser;
use tracing::{debug, error, info};

use fable2file::aggregate::{run_combined_export, run_per_list_export};
use fable2file::api::{config_from_env, FableClient};
use fable2file::cli::Args;
use fable2file::error::AppError;
use fable2file::logging;
use fable2file::progress::Progress;

fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(args.verbose);

    debug!("Environment loaded, checking Fable credentials");

    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("\nError: {}", e.detailed_message());
        std::process::exit(e.exit_code().into());
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let config = config_from_env(args.timeout);
    let client = FableClient::new(config)?;

    std::fs::create_dir_all(&args.output).map_err(|e| {
        AppError::Other(format!(
            "Failed to create output directory {}: {}",
            args.output.display(),
            e
        ))
    })?;

    info!(
        "Exporting to {} (formats: {:?}, separate lists: {})",
        args.output.display(),
        args.format,
        args.separate_lists
    );

    let mut progress = Progress::new();
    progress.connecting();

    if args.separate_lists {
        run_per_list_export(&client, &args.output, &args.format, &mut progress)?;
    } else {
        run_combined_export(&client, &args.output, &args.format, &mut progress)?;
    }

    progress.done(&args.output);
    Ok(())
}

// Menu digitizer command line front-end

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use menuscan::{config::PipelineConfig, models::MenuResult, utils::MenuError, MenuDigitizer};

#[derive(Parser, Debug)]
#[command(name = "menuscan", about = "Digitize a photographed wine and food menu")]
struct Args {
    /// Menu photograph (PNG, JPEG, ...)
    image: PathBuf,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Recognizer language, overrides the configuration file
    #[arg(long)]
    lang: Option<String>,

    /// Directory holding the traineddata files
    #[arg(long)]
    tessdata: Option<String>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

fn print_summary(result: &MenuResult) {
    eprintln!("\nMENU SUMMARY (confidence {:.0}%)", result.confidence * 100.0);
    if let Some(wine) = &result.red_wine {
        eprintln!("  Red:   {} {} {} {}", wine.name, wine.region, wine.year, wine.price);
    }
    if let Some(wine) = &result.white_wine {
        eprintln!("  White: {} {} {} {}", wine.name, wine.region, wine.year, wine.price);
    }
    for item in &result.starters {
        eprintln!("  Starter: {}", item.name);
    }
    for item in &result.entrees {
        eprintln!("  Entree:  {}", item.name);
    }
    if let Some(cocktail) = &result.cocktail {
        eprintln!("  Cocktail: {} {}", cocktail.name, cocktail.price);
    }
    if let Some(error) = &result.error {
        eprintln!("  Error: {}", error);
    }
}

fn run(args: Args) -> Result<(), MenuError> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(lang) = args.lang {
        config.language = lang;
    }
    if args.tessdata.is_some() {
        config.tessdata = args.tessdata;
    }

    let mut digitizer = MenuDigitizer::new(&config);
    digitizer.set_progress_callback(|update| {
        log::info!("[{:>3}%] {}", update.percent, update.message);
    });

    let result = digitizer.process_file(&args.image)?;
    print_summary(&result);

    let json = if args.compact {
        serde_json::to_string(&result)
    } else {
        serde_json::to_string_pretty(&result)
    }
    .map_err(|e| MenuError::IoError(format!("Failed to serialize result: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

// Runs correction, parsing and validation over already-recognized menu text.
// Handy for tuning the parser without an OCR engine installed.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use menuscan::{
    models::Vocabulary,
    processing::{MenuParser, TextCorrector},
    utils::MenuError,
    validation::ResultValidator,
};

#[derive(Parser, Debug)]
#[command(name = "parse_text", about = "Parse plain menu text into structured JSON")]
struct Args {
    /// Text file to parse; stdin when omitted
    input: Option<PathBuf>,

    /// Confidence attributed to the text, as if reported by the recognizer
    #[arg(long, default_value_t = 0.9)]
    confidence: f64,
}

fn main() -> Result<(), MenuError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let text = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let vocabulary = Arc::new(Vocabulary::default());
    let corrected = TextCorrector::new(&vocabulary).correct(&text);
    let confidence = args.confidence.clamp(0.0, 1.0);
    let parsed = MenuParser::new(vocabulary).parse_text(&corrected, &[confidence]);
    let result = ResultValidator::validate(parsed);

    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| MenuError::IoError(format!("Failed to serialize result: {}", e)))?;
    println!("{}", json);
    Ok(())
}

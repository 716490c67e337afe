use clap::{Arg, Command};
use flashcards::{MockMode, MockTranslator, TranslateError, Translator};
use flashcards_translate::GoogleTranslateProvider;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let matches = Command::new("flashcards-translate")
        .version("0.1.0")
        .about("Look up a word through the flashcards translation gateway")
        .arg(
            Arg::new("word")
                .help("Word to translate")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .short('s')
                .help("Source language code")
                .default_value("en"),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .short('t')
                .help("Target language code")
                .default_value("ru"),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .short('u')
                .help("Batch-execute endpoint")
                .default_value(GoogleTranslateProvider::DEFAULT_URL),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use mock translator instead of the remote service")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show provider details")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let word = matches.get_one::<String>("word").map(String::as_str).unwrap_or_default();
    let source = matches.get_one::<String>("source").map(String::as_str).unwrap_or("en");
    let target = matches.get_one::<String>("target").map(String::as_str).unwrap_or("ru");
    let url = matches
        .get_one::<String>("url")
        .map(String::as_str)
        .unwrap_or(GoogleTranslateProvider::DEFAULT_URL);
    let verbose = matches.get_flag("verbose");

    let translator: Box<dyn Translator> = if matches.get_flag("mock") {
        Box::new(MockTranslator::with_langs(MockMode::Echo, source, target))
    } else {
        Box::new(GoogleTranslateProvider::new(url, source, target)?)
    };

    if verbose {
        eprintln!("📝 Word: \"{}\"", word);
        eprintln!("🌍 {} → {}", translator.source_lang(), translator.target_lang());
        eprintln!("🔌 Provider: {}", translator.provider_name());
        eprintln!();
    }

    match translator.translate(word).await {
        Ok(translation) => {
            println!("{}", serde_json::to_string_pretty(&translation)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(TranslateError::WordNotSupported) => {
            eprintln!("❌ Word \"{}\" is not supported", word);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

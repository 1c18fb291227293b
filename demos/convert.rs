use std::path::PathBuf;
use std::time::Instant;

use tts_converter::{
    language, load_config, shaper, ConversionRequestBuilder, Converter, ConverterConfig, Language,
    Voice,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::var_os("TTS_CONVERTER_CONFIG") {
        Some(path) => load_config(&PathBuf::from(path))?,
        None => ConverterConfig::default(),
    };
    let mut converter = Converter::new(config);

    let text = "Welcome to our professional text-to-speech service";
    println!("Detected language: {}", language::detect(text));

    let request = ConversionRequestBuilder::default()
        .text(text)
        .language(Language::En)
        .voice(Voice::Male)
        .speed(175u16)
        .build()?;

    let start = Instant::now();
    let packaged = match converter.convert(&request) {
        Ok(packaged) => packaged,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
    };
    println!(
        "Converted in {:.2?}: {} ({} bytes, {})",
        start.elapsed(),
        packaged.download().file_name(),
        packaged.audio().bytes().len(),
        packaged.download().mime_type()
    );

    let out = PathBuf::from(packaged.download().file_name());
    std::fs::write(&out, packaged.download().decode()?)?;
    println!("Saved to {}", out.display());

    let arabic = "مرحبا بكم في نظام تحويل النص إلى كلام";
    println!("Arabic for display: {}", shaper::shape(arabic));

    let request = ConversionRequestBuilder::default()
        .text(arabic)
        .language(language::detect_language(arabic))
        .build()?;
    match converter.convert(&request) {
        Ok(packaged) => println!(
            "Arabic audio: {} bytes as {}",
            packaged.audio().bytes().len(),
            packaged.download().file_name()
        ),
        Err(e) => eprintln!("{}", e.user_message()),
    }

    Ok(())
}

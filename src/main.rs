use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use storyboard::{
    config::supported_models,
    logger::{self, LogLevel, LoggerConfig},
    GeminiClient, GeminiConfig, PlanRequest, ReferenceImage, StoryMode, ZoomDirection,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let level = if env::var("STORYBOARD_DEBUG").is_ok() {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    logger::init_with_config(LoggerConfig::development().with_level(level))?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let mut args = env::args().skip(1);
    let Some(image_path) = args.next() else {
        eprintln!("usage: storyboard <reference-image> [narrative|angles|zoom-in|zoom-out] [category]");
        std::process::exit(2);
    };
    let (mode, zoom) = parse_mode(args.next().as_deref())?;
    let category = args.next();

    let config = GeminiConfig::from_env();
    logger::log_config_info(&config);

    log::info!("📚 Available models:");
    for model in supported_models() {
        log::info!("  {} - {} ({:?})", model.id, model.name, model.category);
    }

    let reference = load_reference(Path::new(&image_path))?;
    let client = GeminiClient::new(config)?;

    let validation = client.validate_key(None).await;
    if !validation.valid {
        log::error!("❌ API key missing or rejected; set GEMINI_API_KEY");
        std::process::exit(1);
    }
    log::info!(
        "🔑 API key valid (premium tier: {})",
        if validation.pro_available { "✅" } else { "❌" }
    );

    let category = match category {
        Some(category) => category,
        None if mode == StoryMode::Narrative => {
            let categories = client.suggest_categories(None, &reference, mode).await?;
            log::info!("💡 Suggested categories: {}", categories.join(", "));
            categories.into_iter().next().unwrap_or_default()
        }
        None => String::new(),
    };

    let mut request = PlanRequest::new(reference.clone(), mode).with_zoom(zoom);
    if !category.is_empty() {
        request = request.with_category(category);
    }

    let plan = client.generate_plan(None, &request).await?;
    log::info!("🧍 Subject: {}", plan.subject);
    log::info!("🎨 Style: {}", plan.style);
    for (index, angle) in plan.angles.iter().enumerate() {
        log::info!("  {}. {} - {}", index + 1, angle.name, angle.prompt_ko);
    }

    let output_dir = PathBuf::from(env::var("STORYBOARD_OUTPUT_DIR").unwrap_or_else(|_| ".".into()));
    fs::create_dir_all(&output_dir)?;

    let (images, failure) = client
        .render_all(None, &plan, &reference, validation.pro_available)
        .await;

    for (index, image) in images.iter().enumerate() {
        let path = output_dir.join(format!("scene_{:02}.{}", index + 1, image.file_extension()));
        fs::write(&path, image.decode()?)?;
        log::info!("💾 Scene {} saved to {} ({})", index + 1, path.display(), image.model);
    }

    if let Some(err) = failure {
        log::error!("❌ Stopped after {} scenes: [{}] {}", images.len(), err.kind().as_str(), err);
        return Err(err.into());
    }

    log::info!("🎉 Storyboard complete: {} scenes", images.len());
    Ok(())
}

fn parse_mode(arg: Option<&str>) -> Result<(StoryMode, ZoomDirection), String> {
    match arg.unwrap_or("narrative") {
        "narrative" => Ok((StoryMode::Narrative, ZoomDirection::In)),
        "angles" => Ok((StoryMode::CameraAngles, ZoomDirection::In)),
        "zoom-in" => Ok((StoryMode::ZoomSequence, ZoomDirection::In)),
        "zoom-out" => Ok((StoryMode::ZoomSequence, ZoomDirection::Out)),
        other => Err(format!("unknown mode: {}", other)),
    }
}

fn load_reference(path: &Path) -> Result<ReferenceImage, Box<dyn std::error::Error>> {
    let mime_type = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("png") => "image/png",
        _ => return Err(format!("unsupported image type: {}", path.display()).into()),
    };

    let bytes = fs::read(path)?;
    log::info!("🖼️  Loaded {} ({} bytes)", path.display(), bytes.len());
    Ok(ReferenceImage::from_bytes(mime_type, &bytes))
}

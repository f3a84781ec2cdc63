use std::io::IsTerminal;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use futures_util::future::join_all;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use oxipix::application::services::{FormatDetector, LazyLoadManager, SourceBuilder};
use oxipix::application::{ImageRequest, ResolveImageUseCase};
use oxipix::domain::entities::ElementBounds;
use oxipix::domain::ports::ProximityPlatform;
use oxipix::infrastructure::config::{
    AppConfig, CliArgs, Command, ConfigFile, DescribeArgs, OutputFormat, ScrollArgs,
};
use oxipix::infrastructure::{ImageDecodeProbe, UnsupportedPlatform, ViewportPlatform};
use oxipix::presentation::{LazyImage, render_img};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let mut config = ConfigFile::locate(args.config.as_deref())?.load()?;
    config.merge_with_args(args);
    Ok(config)
}

fn use_case(config: &AppConfig, detector: Arc<FormatDetector>) -> ResolveImageUseCase {
    ResolveImageUseCase::new(
        detector,
        SourceBuilder::new(config.sizes.clone()),
        config.images.to_image_config(),
    )
}

async fn run_probe() {
    let detector = FormatDetector::new(Arc::new(ImageDecodeProbe::new()));
    let format = detector.resolve_format().await;
    println!("{format} ({})", format.mime_type());
}

async fn run_describe(config: &AppConfig, args: DescribeArgs) -> Result<()> {
    let probe = Arc::new(ImageDecodeProbe::new());
    let detector = Arc::new(match args.format.fixed() {
        Some(format) => FormatDetector::with_format(probe, format),
        None => FormatDetector::new(probe),
    });

    let mut request = ImageRequest::new(args.src, args.alt).with_priority(args.priority);
    if !args.widths.is_empty() {
        request = request.with_widths(args.widths);
    }
    if let Some(quality) = args.quality {
        request = request.with_quality(quality);
    }
    if args.eager {
        request = request.with_lazy(false);
    }

    let resolved = use_case(config, detector).execute(&request).await;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolved)?),
        OutputFormat::Html => {
            let element = LazyImage::new(&resolved, ElementBounds::default());
            println!("{}", render_img(&element.attributes()));
        }
    }
    Ok(())
}

async fn run_scroll(config: &AppConfig, args: ScrollArgs) {
    let viewport_height = args
        .viewport_height
        .unwrap_or(config.lazy_load.viewport_height);
    let viewport = ViewportPlatform::new(viewport_height);
    let platform: &dyn ProximityPlatform = if args.no_observer {
        &UnsupportedPlatform
    } else {
        &viewport
    };

    let detector = Arc::new(FormatDetector::new(Arc::new(ImageDecodeProbe::new())));
    let resolver = use_case(config, detector);
    let mut manager = LazyLoadManager::new(platform, config.lazy_load.options());

    let requests: Vec<ImageRequest> = args
        .srcs
        .iter()
        .map(|src| ImageRequest::new(src.clone(), String::new()))
        .collect();
    let resolved_all = join_all(requests.iter().map(|request| resolver.execute(request))).await;

    let mut elements = Vec::with_capacity(resolved_all.len());
    let stride = args.image_height.saturating_add(args.gap);
    let mut top = 0u32;
    for (src, resolved) in args.srcs.iter().zip(resolved_all) {
        let element = LazyImage::new(&resolved, ElementBounds::new(top, args.image_height));
        ResolveImageUseCase::register(&resolved, element.clone(), &mut manager);
        elements.push((src.clone(), element));
        top = top.saturating_add(stride);
    }

    report_step("initial", &mut manager, &elements);
    for offset in args.offsets {
        viewport.scroll_to(offset);
        report_step(&format!("scroll {offset}"), &mut manager, &elements);
    }

    manager.disconnect();
    let pending = elements.iter().filter(|(_, e)| !e.is_revealed()).count();
    println!("disconnected, {pending} image(s) never revealed");
}

fn report_step(label: &str, manager: &mut LazyLoadManager, elements: &[(String, Arc<LazyImage>)]) {
    manager.process_pending();
    let revealed: Vec<&str> = elements
        .iter()
        .filter(|(_, element)| element.is_revealed())
        .map(|(src, _)| src.as_str())
        .collect();
    println!(
        "{label}: {} revealed [{}], {} observed",
        revealed.len(),
        revealed.join(", "),
        manager.len()
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = oxipix::VERSION, "Starting {}", oxipix::NAME);

    match args.command {
        Command::Probe => run_probe().await,
        Command::Describe(describe) => run_describe(&config, describe).await?,
        Command::Scroll(scroll) => run_scroll(&config, scroll).await,
    }

    Ok(())
}

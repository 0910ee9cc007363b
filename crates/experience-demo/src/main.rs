mod world;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use experience_engine::assets::{LoaderConfig, Manifest};
use experience_engine::core::{AppControl, Experience, ExperienceConfig};
use experience_engine::device::GpuInit;
use experience_engine::logging::{init_logging, LoggingConfig};
use experience_engine::render::{GpuBackend, HeadlessBackend};
use experience_engine::time::{ManualScheduler, MonotonicSource};
use experience_engine::viewport::StaticHost;
use experience_engine::window::{Runtime, RuntimeConfig};

/// Fox, grass and a sunny sky.
#[derive(Debug, Parser)]
#[command(name = "experience-demo", version)]
struct Cli {
    /// Build the debug panel (Tab/arrows tweak values, digits press buttons).
    #[arg(long)]
    debug: bool,

    /// Asset root holding `textures/` and `models/`.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Asset manifest. Defaults to `<assets>/sources.json`.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Run without a window, drawing into a recording backend.
    #[arg(long)]
    headless: bool,

    /// Frames to run in headless mode.
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Log filter in `env_logger` syntax. Overrides RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig { env_filter: cli.log.clone(), ..Default::default() });

    let manifest_path = cli.manifest.clone().unwrap_or_else(|| cli.assets.join("sources.json"));
    let manifest = Manifest::from_path(&manifest_path)
        .with_context(|| format!("failed to read manifest {}", manifest_path.display()))?;

    let loader = LoaderConfig {
        textures_dir: cli.assets.join("textures"),
        models_dir: cli.assets.join("models"),
    };
    let config = ExperienceConfig { debug: cli.debug, ..Default::default() };

    if cli.headless {
        run_headless(config, loader, manifest, cli.frames)
    } else {
        run_windowed(config, loader, manifest)
    }
}

fn run_windowed(config: ExperienceConfig, loader: LoaderConfig, manifest: Manifest) -> Result<()> {
    let runtime = RuntimeConfig { title: "Experience".to_string(), ..Default::default() };

    Runtime::run(runtime, GpuInit::default(), move |window, gpu| {
        let retrievers = loader.retrievers_for(&manifest);
        let experience = Experience::new(
            config,
            Box::new(window),
            Box::new(MonotonicSource::new()),
            GpuBackend::new(gpu),
            manifest,
            retrievers,
            world::factories(),
        )?;
        Ok(experience)
    })
}

fn run_headless(config: ExperienceConfig, loader: LoaderConfig, manifest: Manifest, frames: u64) -> Result<()> {
    let retrievers = loader.retrievers_for(&manifest);
    let mut experience = Experience::new(
        config,
        Box::new(StaticHost::new(1280.0, 720.0, 1.0)),
        Box::new(MonotonicSource::new()),
        HeadlessBackend::new(),
        manifest,
        retrievers,
        world::factories(),
    )?;

    let mut scheduler = ManualScheduler::new();
    experience.start(&mut scheduler);

    let mut ran = 0;
    while ran < frames && scheduler.take_pending() {
        std::thread::sleep(Duration::from_millis(16));
        if experience.frame(&mut scheduler) == AppControl::Exit {
            break;
        }
        ran += 1;
    }

    let loader = experience.loader();
    for (name, err) in loader.failures() {
        log::warn!("asset `{name}` failed: {err}");
    }
    log::info!(
        "ran {ran} frame(s), drew {}, assets {}/{}, subsystems {:?}",
        experience.render_target().backend().frames(),
        loader.loaded(),
        loader.to_load(),
        experience.composer().subsystem_names(),
    );
    Ok(())
}

//! portfolio3d - floating photo discs that link to portfolio pages
//!
//! Hover a disc to highlight it, drag to spin it, click to open its page.

mod app;
mod opener;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use portfolio3d_scene::{SceneConfig, DEFAULT_SCENE_PATH};
use tracing::info;
use winit::event_loop::{ControlFlow, EventLoop};

use app::{AppAction, PortfolioApp};
use opener::SystemOpener;

const DEFAULT_LOG_FILTER: &str =
    "portfolio3d=info,portfolio3d_scene=info,portfolio3d_render=info,warn";

#[derive(Debug, Parser)]
#[command(name = "portfolio3d", version, about)]
struct Cli {
    /// Scene config (TOML). Missing files fall back to built-in defaults.
    #[arg(long, default_value = DEFAULT_SCENE_PATH)]
    config: PathBuf,

    /// Window size, e.g. 1920x1080.
    #[arg(long, value_name = "WxH", value_parser = parse_resolution)]
    resolution: Option<(u32, u32)>,

    /// Present without waiting for vblank.
    #[arg(long)]
    no_vsync: bool,

    /// Seed for the initial plane tilt.
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the shadow pass.
    #[arg(long)]
    no_shadows: bool,

    /// Draw the floor plane.
    #[arg(long)]
    ground: bool,

    /// Print the planes and their links, then exit.
    #[arg(long)]
    dry_run: bool,

    /// Write the built-in scene config to PATH and exit.
    #[arg(long, value_name = "PATH")]
    write_default_config: Option<PathBuf>,
}

impl Cli {
    /// Layer command-line overrides on top of the loaded config.
    fn apply(&self, config: &mut SceneConfig) {
        if let Some((width, height)) = self.resolution {
            config.window.width = width;
            config.window.height = height;
        }
        if self.no_vsync {
            config.window.vsync = false;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.no_shadows {
            config.shadows.enabled = false;
        }
        if self.ground {
            config.ground.enabled = true;
        }
    }
}

fn parse_resolution(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| format!("invalid dimension {part:?} in {value:?}"))
    };
    Ok((parse(width)?, parse(height)?))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();

    if let Some(path) = &cli.write_default_config {
        SceneConfig::default().save_to_path(path)?;
        info!(path = %path.display(), "wrote default scene config");
        return Ok(());
    }

    let mut config = SceneConfig::load_from_path(&cli.config);
    cli.apply(&mut config);
    config
        .validate()
        .with_context(|| format!("invalid scene config {}", cli.config.display()))?;

    if cli.dry_run {
        print!("{}", describe_planes(&config));
        return Ok(());
    }

    info!("Starting portfolio3d v{}", env!("CARGO_PKG_VERSION"));

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = PortfolioApp::new(&event_loop, config, SystemOpener)?;

    event_loop.run(move |event, elwt| {
        if app.handle_event(&event) == AppAction::Quit {
            elwt.exit();
        }
    })?;

    info!("portfolio3d shutting down");
    Ok(())
}

/// One line per plane: index, texture, position and link.
fn describe_planes(config: &SceneConfig) -> String {
    config
        .planes
        .iter()
        .enumerate()
        .map(|(index, plane)| {
            let [x, y, z] = plane.position;
            format!(
                "{index}: {} at ({x}, {y}, {z}) -> {}\n",
                config.texture_path(plane).display(),
                plane.target_url
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_parses_both_separators() {
        assert_eq!(parse_resolution("1920x1080"), Ok((1920, 1080)));
        assert_eq!(parse_resolution("800X600"), Ok((800, 600)));
    }

    #[test]
    fn resolution_rejects_garbage() {
        assert!(parse_resolution("1920").is_err());
        assert!(parse_resolution("0x600").is_err());
        assert!(parse_resolution("wide x tall").is_err());
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "portfolio3d",
            "--resolution",
            "640x480",
            "--no-vsync",
            "--seed",
            "42",
            "--no-shadows",
            "--ground",
        ])
        .unwrap();

        let mut config = SceneConfig::default();
        cli.apply(&mut config);

        assert_eq!((config.window.width, config.window.height), (640, 480));
        assert!(!config.window.vsync);
        assert_eq!(config.seed, Some(42));
        assert!(!config.shadows.enabled);
        assert!(config.ground.enabled);
    }

    #[test]
    fn no_flags_leave_config_alone() {
        let cli = Cli::try_parse_from(["portfolio3d"]).unwrap();
        assert_eq!(cli.config, PathBuf::from(DEFAULT_SCENE_PATH));

        let mut config = SceneConfig::default();
        cli.apply(&mut config);
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn dry_run_lists_every_plane() {
        let config = SceneConfig::default();
        let listing = describe_planes(&config);
        assert_eq!(listing.lines().count(), config.planes.len());
        assert!(listing.starts_with("0: "));
        assert!(listing.contains("https://kuochunghsuan.com/Adventurer"));
    }

    #[test]
    fn written_default_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scene.toml");
        SceneConfig::default().save_to_path(&path).unwrap();
        assert_eq!(SceneConfig::load_from_path(&path), SceneConfig::default());
    }
}

//! Swirl Viewer - windowed vortex particle simulation
//!
//! Loads simulation settings from a TOML file and renders the particle
//! swirl. With `--watch`, edits to the settings file trigger a full
//! refresh of the particle pool, standing in for a live control panel.
//!
//! Usage:
//!   swirl-viewer [settings.toml] [--watch] [--fullscreen]

mod app;

use anyhow::{Context, Result};
use app::{SharedState, ViewerApp};
use clap::Parser;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::path::Path;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;
use swirl_sim::{load_settings, SimulationSettings};
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser)]
#[command(name = "swirl-viewer")]
#[command(about = "Swirl viewer - vortex particle simulation with live-editable settings")]
struct Args {
    /// Path to the settings file
    #[arg(default_value = "settings.toml")]
    settings: String,

    /// Watch the settings file and refresh the simulation on change
    #[arg(long)]
    watch: bool,

    /// Launch in fullscreen mode
    #[arg(long)]
    fullscreen: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = if Path::new(&args.settings).exists() {
        let loaded = load_settings(&args.settings).context("Failed to load settings")?;
        loaded
            .sanitized()
            .context("Failed to validate settings")?
    } else {
        println!("Warning: Settings file not found: {}", args.settings);
        SimulationSettings::default()
    };

    println!("Particles: {}", settings.num_particles);
    println!("Base color: {}", settings.base_color);
    println!();
    println!("Controls:");
    println!("  W/S      - Zoom");
    println!("  A/D      - Orbit");
    println!("  Escape   - Exit");
    println!("  F11      - Toggle fullscreen");

    let shared = Arc::new(Mutex::new(SharedState {
        needs_refresh: false,
    }));

    let _watcher = if args.watch {
        let shared_clone = Arc::clone(&shared);
        let (tx, rx) = mpsc::channel();

        let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
        debouncer
            .watcher()
            .watch(Path::new(&args.settings), RecursiveMode::NonRecursive)?;

        std::thread::spawn(move || {
            for result in rx {
                match result {
                    Ok(_events) => {
                        if let Ok(mut shared) = shared_clone.lock() {
                            shared.needs_refresh = true;
                        }
                    }
                    Err(e) => {
                        eprintln!("Watch error: {:?}", e);
                    }
                }
            }
        });

        println!("Watching {} for changes...", args.settings);
        Some(debouncer)
    } else {
        None
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(settings, args.settings, shared, args.fullscreen);
    event_loop.run_app(&mut app)?;

    Ok(())
}

use anyhow::{Result, ensure};
use clap::{Parser, Subcommand};
use orbit_render::{DebugTextRenderer, FlyCamera, Renderer};
use orbit_scene::{DemoScene, SceneSnapshot};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "orbit-cli", about = "Headless tool for the orbit demo scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and scene contents
    Info,
    /// Step the animation and print the final frame
    Simulate {
        /// Number of frames to step
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Seconds per frame
        #[arg(short, long, default_value = "0.016")]
        dt: f32,
    },
    /// Print the scene posed at a given time as JSON
    Dump {
        /// Seconds since start
        #[arg(short, long, default_value = "0")]
        time: f32,
    },
}

/// Step `frames` frames of `dt` seconds and return the final frame's text.
/// Frame `n` (from 1) is posed at `n * dt`, so the last one is at `frames * dt`.
fn simulate(frames: u32, dt: f32) -> Result<String> {
    ensure!(dt.is_finite() && dt >= 0.0, "dt must be a non-negative number");

    let mut demo = DemoScene::build()?;
    let renderer = DebugTextRenderer::new();
    let camera = FlyCamera::default();

    let mut total = 0.0;
    for frame in 1..=frames {
        total = frame as f32 * dt;
        demo.animate(total)?;
        let stale = demo
            .scene()
            .entities()
            .iter()
            .filter(|e| e.transform().is_dirty())
            .count();
        tracing::debug!(frame, total, stale, "stepped");
        if frame < frames {
            // Refresh caches the way a drawn frame would.
            renderer.render(demo.scene(), &camera);
        }
    }

    Ok(format!(
        "t={total:.3}s after {frames} frames\n{}",
        renderer.render(demo.scene(), &camera)
    ))
}

fn dump(time: f32) -> Result<String> {
    let mut demo = DemoScene::build()?;
    demo.animate(time)?;
    let snapshot = SceneSnapshot::capture(demo.scene(), time);
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("orbit-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", orbit_render::crate_info());
            let demo = DemoScene::build()?;
            let scene = demo.scene();
            println!(
                "demo: {} entities, {} meshes, {} materials, {} lights",
                scene.entity_count(),
                scene.meshes().len(),
                scene.materials().len(),
                scene.lights().len()
            );
            for mesh in scene.meshes() {
                println!(
                    "  mesh {:<12} vertices={:<5} indices={}",
                    mesh.name(),
                    mesh.vertex_count(),
                    mesh.index_count()
                );
            }
            for material in scene.materials() {
                println!(
                    "  material {:<6} textured={} program={}/{}",
                    material.name(),
                    material.texture().is_some(),
                    material.program().vertex_entry,
                    material.program().fragment_entry
                );
            }
        }
        Commands::Simulate { frames, dt } => {
            print!("{}", simulate(frames, dt)?);
        }
        Commands::Dump { time } => {
            println!("{}", dump(time)?);
        }
    }

    Ok(())
}

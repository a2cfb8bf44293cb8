use anyhow::Result;
use clap::{Parser, Subcommand};
use defocus_assets::ShaderCatalog;
use defocus_common::{BoundingSphere, Ray};
use defocus_optics::DofParams;
use defocus_render::{DebugTextRenderer, FrameState, Renderer};
use defocus_scene::InstanceField;
use glam::Vec3;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "defocus-cli", about = "CLI tool for defocus operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Run the deterministic animation check
    Simulate {
        /// Number of fixed 60 Hz ticks to advance
        #[arg(short, long, default_value = "600")]
        ticks: u64,
        /// Instance field seed
        #[arg(short, long, default_value = "12345")]
        seed: u64,
    },
    /// Cast an auto-focus ray into the field and print the hit distance
    Focus {
        /// Ray origin as x,y,z
        #[arg(long, default_value = "1,2,5")]
        eye: String,
        /// Point the ray passes through, as x,y,z
        #[arg(long, default_value = "0,0,0")]
        at: String,
        /// Simulation time in seconds
        #[arg(long, default_value = "0")]
        time: f64,
    },
    /// Load all shader assets and report per-program status
    CheckAssets {
        /// Directory containing the WGSL shader assets
        #[arg(long, default_value = "./assets/shaders")]
        assets_dir: String,
    },
}

fn parse_vec3(s: &str) -> Result<Vec3> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<_, _>>()?;
    anyhow::ensure!(parts.len() == 3, "expected x,y,z, got `{s}`");
    Ok(Vec3::new(parts[0], parts[1], parts[2]))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("defocus-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", defocus_common::crate_info());
            println!("scene: {}", defocus_scene::crate_info());
            println!("optics: {}", defocus_optics::crate_info());
            println!("assets: {}", defocus_assets::crate_info());
            println!("render: {}", defocus_render::crate_info());
        }
        Commands::Simulate { ticks, seed } => {
            println!("Deterministic animation: seed={seed}, ticks={ticks}");
            let time = ticks as f64 / 60.0;

            let field1 = InstanceField::new(seed);
            let field2 = InstanceField::new(seed);
            let hash1 = field1.state_hash(time);
            let hash2 = field2.state_hash(time);

            println!("Run 1: t={time:.2}s hash={hash1:#018x}");
            println!("Run 2: t={time:.2}s hash={hash2:#018x}");
            println!("Match: {}", if hash1 == hash2 { "OK" } else { "MISMATCH" });

            let params = DofParams::default();
            let mut renderer = DebugTextRenderer::new();
            print!(
                "{}",
                renderer.render(&FrameState {
                    field: &field1,
                    params: &params,
                    time,
                    show_bounds: false,
                })
            );
        }
        Commands::Focus { eye, at, time } => {
            let origin = parse_vec3(&eye)?;
            let through = parse_vec3(&at)?;
            let ray = Ray::new(origin, through - origin);

            let field = InstanceField::default();
            // Radius of the procedural teapot bounds; the desktop app reads
            // this from the mesh, here a unit sphere is close enough for a
            // headless query.
            let bounds = BoundingSphere::new(Vec3::ZERO, 1.0);

            match field.pick(&ray, &bounds, time) {
                Some(dist) => {
                    println!("Hit: focal distance {dist:.3}");
                }
                None => {
                    println!("No instance under the ray");
                }
            }
        }
        Commands::CheckAssets { assets_dir } => {
            let mut catalog = ShaderCatalog::new(&assets_dir);
            let mut failures = 0;
            for (kind, outcome) in catalog.load_all() {
                match outcome {
                    Ok(_) => {
                        let hash = catalog
                            .source(kind)
                            .map(|s| s.content_hash)
                            .unwrap_or_default();
                        println!("{:12} {:10} OK hash={hash:#018x}", format!("{kind:?}"), kind.file_name());
                    }
                    Err(e) => {
                        failures += 1;
                        println!("{:12} {:10} FAILED: {e}", format!("{kind:?}"), kind.file_name());
                    }
                }
            }
            anyhow::ensure!(failures == 0, "{failures} shader asset(s) failed to load");
        }
    }

    Ok(())
}

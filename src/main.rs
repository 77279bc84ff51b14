use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trellis_core::{is_set, ControlKey};
use trellis_layout::LayoutContext;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Run layout frames over a trellis snapshot file")]
struct Args {
    /// Path to the snapshot (.json) to lay out
    snapshot: String,

    /// Root width, overrides the snapshot
    #[arg(long)]
    width: Option<f32>,

    /// Root height, overrides the snapshot
    #[arg(long)]
    height: Option<f32>,

    /// Number of full updates to run
    #[arg(long, default_value = "1")]
    frames: u32,

    /// Report the deepest control under a point, given as X,Y
    #[arg(long)]
    hit: Option<String>,

    /// Check every control against its minimum and maximum after layout
    #[arg(long)]
    verify: bool,

    /// Write the arranged tree back out as a snapshot
    #[arg(long)]
    save: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging, RUST_LOG can narrow it further
    let level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    if !Path::new(&args.snapshot).exists() {
        anyhow::bail!("Snapshot file not found: {}", args.snapshot);
    }

    let hit = args.hit.as_deref().map(parse_point).transpose()?;

    info!("Loading snapshot: {}", args.snapshot);
    let mut ctx = LayoutContext::load_snapshot(&args.snapshot)
        .context("Failed to load snapshot")?
        .with_debug(args.debug);

    if args.width.is_some() || args.height.is_some() {
        let current = ctx.record(ControlKey::ROOT)?.fixed_size;
        let size = Vec2::new(args.width.unwrap_or(current.x), args.height.unwrap_or(current.y));
        ctx.set_size(ControlKey::ROOT, size)?;
    }
    let root_size = ctx.record(ControlKey::ROOT)?.fixed_size;
    if !is_set(root_size.x) || !is_set(root_size.y) {
        warn!("Root has no fixed size, it will shrink to its content");
    }

    let frames = args.frames.max(1);
    let mut total = Duration::ZERO;
    for _ in 0..frames {
        let started = Instant::now();
        ctx.update();
        total += started.elapsed();
    }
    info!("Ran {} frames, average {:?} per frame", frames, total / frames);

    let root = ctx.rect(ControlKey::ROOT)?;
    println!("Controls: {}", ctx.len());
    println!("Root: pos:({:.1},{:.1}) size:({:.1},{:.1})", root.position.x, root.position.y, root.size.x, root.size.y);

    if let Some(point) = hit {
        match ctx.hit_test(point) {
            Some(key) => {
                let rect = ctx.rect(key)?;
                println!(
                    "Hit {}: pos:({:.1},{:.1}) size:({:.1},{:.1})",
                    key, rect.position.x, rect.position.y, rect.size.x, rect.size.y
                );
            }
            None => println!("Hit: none"),
        }
    }

    if args.verify {
        ctx.verify_constraints().context("Constraint check failed")?;
        println!("Constraints: ok");
    }

    if let Some(path) = args.save {
        ctx.save_snapshot(&path)
            .with_context(|| format!("Failed to write snapshot: {}", path))?;
        info!("Snapshot written to: {}", path);
    }

    Ok(())
}

fn parse_point(text: &str) -> Result<Vec2> {
    let (x, y) = text
        .split_once(',')
        .with_context(|| format!("Expected X,Y but got: {}", text))?;
    let x = x.trim().parse::<f32>().with_context(|| format!("Invalid X coordinate: {}", x))?;
    let y = y.trim().parse::<f32>().with_context(|| format!("Invalid Y coordinate: {}", y))?;
    Ok(Vec2::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("10,20.5").unwrap(), Vec2::new(10.0, 20.5));
        assert_eq!(parse_point(" 3 , 4 ").unwrap(), Vec2::new(3.0, 4.0));
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,b").is_err());
    }
}

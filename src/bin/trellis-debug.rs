use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;

use trellis_core::{ContainerFlags, ControlKey, LayoutFlags, Spacing};
use trellis_layout::{LayoutContext, SNAPSHOT_VERSION};

#[derive(Parser)]
#[command(name = "trellis-debug")]
#[command(about = "Print an arranged trellis layout tree as text")]
struct Args {
    /// Path to the snapshot (.json) to inspect
    snapshot: String,

    /// Output format (tree, json, detailed)
    #[arg(long, default_value = "tree")]
    format: String,

    /// Save output to file instead of stdout
    #[arg(long)]
    output: Option<String>,

    /// Show control positions and sizes
    #[arg(long)]
    show_layout: bool,

    /// Show container and layout flags
    #[arg(long)]
    show_flags: bool,

    /// Print the rects stored in the snapshot instead of laying out again
    #[arg(long)]
    no_update: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if !Path::new(&args.snapshot).exists() {
        anyhow::bail!("Snapshot file not found: {}", args.snapshot);
    }

    let mut ctx = LayoutContext::load_snapshot(&args.snapshot)
        .context("Failed to load snapshot")?;
    if !args.no_update {
        ctx.update();
    }

    let output_text = match args.format.as_str() {
        "tree" => generate_tree_output(&ctx, &args),
        "json" => ctx.snapshot().to_json().context("Failed to serialize snapshot"),
        "detailed" => generate_detailed_output(&ctx, &args),
        other => anyhow::bail!("Unknown format: {}. Use 'tree', 'json', or 'detailed'", other),
    }?;

    if let Some(output_file) = args.output {
        fs::write(&output_file, output_text)
            .with_context(|| format!("Failed to write to file: {}", output_file))?;
        println!("Output written to: {}", output_file);
    } else {
        print!("{}", output_text);
    }

    Ok(())
}

fn generate_tree_output(ctx: &LayoutContext, args: &Args) -> Result<String> {
    let mut output = String::new();
    render_control_tree(&mut output, ctx, ControlKey::ROOT, "", true, true, args)?;

    let unattached: Vec<String> = (1..ctx.len())
        .map(ControlKey::new)
        .filter(|&key| ctx.parent(key).map(|parent| parent.is_invalid()).unwrap_or(false))
        .map(|key| key.to_string())
        .collect();
    if !unattached.is_empty() {
        output.push_str(&format!("Unattached: {}\n", unattached.join(" ")));
    }

    Ok(output)
}

fn render_control_tree(
    output: &mut String,
    ctx: &LayoutContext,
    key: ControlKey,
    prefix: &str,
    is_root: bool,
    is_last: bool,
    args: &Args,
) -> Result<()> {
    let record = ctx.record(key)?;

    let branch = if is_root {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };
    output.push_str(&format!("{}{}{} {:?}", prefix, branch, key, record.arrangement()));
    if record.tag.0 != 0 {
        output.push_str(&format!(" tag:{}", record.tag.0));
    }

    if args.show_layout {
        let rect = ctx.rect(key)?;
        output.push_str(&format!(
            " pos:({:.0},{:.0}) size:({:.0},{:.0})",
            rect.position.x, rect.position.y, rect.size.x, rect.size.y
        ));
    }

    if args.show_flags {
        let mut flags = Vec::new();
        if !record.container_flags.is_empty() {
            flags.push(container_flag_names(record.container_flags));
        }
        if !record.layout_flags.is_empty() {
            flags.push(layout_flag_names(record.layout_flags));
        }
        if !flags.is_empty() {
            output.push_str(&format!(" [{}]", flags.join(" ")));
        }
    }
    output.push('\n');

    let child_prefix = if is_root {
        String::new()
    } else if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    };
    let children: Vec<_> = ctx.children(key).collect();
    for (i, &child) in children.iter().enumerate() {
        render_control_tree(output, ctx, child, &child_prefix, false, i == children.len() - 1, args)?;
    }

    Ok(())
}

fn generate_detailed_output(ctx: &LayoutContext, args: &Args) -> Result<String> {
    let mut output = String::new();

    output.push_str("=== TRELLIS LAYOUT ANALYSIS ===\n\n");

    output.push_str("SNAPSHOT:\n");
    output.push_str(&format!("  Version: {}\n", SNAPSHOT_VERSION));
    output.push_str(&format!("  Controls: {}\n", ctx.len()));
    output.push_str(&format!("  Laid out: {}\n", !args.no_update));
    output.push('\n');

    output.push_str("CONTROLS:\n");
    for index in 0..ctx.len() {
        let key = ControlKey::new(index);
        let record = ctx.record(key)?;
        let rect = ctx.rect(key)?;
        output.push_str(&format!("  {} {:?} (parent {})\n", key, record.arrangement(), record.parent));
        output.push_str(&format!(
            "    rect:     pos:({:.1},{:.1}) size:({:.1},{:.1})\n",
            rect.position.x, rect.position.y, rect.size.x, rect.size.y
        ));
        output.push_str(&format!(
            "    content:  ({:.1},{:.1})\n",
            record.computed_content_size.x, record.computed_content_size.y
        ));
        output.push_str(&format!("    fixed:    {}\n", format_size(record.fixed_size.x, record.fixed_size.y)));
        output.push_str(&format!("    minimum:  {}\n", format_size(record.minimum_size.x, record.minimum_size.y)));
        output.push_str(&format!("    maximum:  {}\n", format_size(record.maximum_size.x, record.maximum_size.y)));
        output.push_str(&format!("    margins:  {}\n", format_spacing(&record.margins)));
        output.push_str(&format!("    padding:  {}\n", format_spacing(&record.padding)));
        if record.layout_flags.is_floating() {
            output.push_str(&format!(
                "    floating: ({:.1},{:.1})\n",
                record.floating_position.x, record.floating_position.y
            ));
        }
        output.push_str(&format!(
            "    flags:    container 0x{:04X} {} / layout 0x{:04X} {}\n",
            record.container_flags.bits(),
            container_flag_names(record.container_flags),
            record.layout_flags.bits(),
            layout_flag_names(record.layout_flags)
        ));
    }

    output.push_str("\nCONTROL TREE:\n");
    render_control_tree(&mut output, ctx, ControlKey::ROOT, "", true, true, args)?;

    output.push_str("\n=== END ANALYSIS ===\n");
    Ok(output)
}

fn container_flag_names(flags: ContainerFlags) -> String {
    let names: Vec<&str> = flags.iter_names().map(|(name, _)| name).collect();
    if names.is_empty() { "-".to_string() } else { names.join("|") }
}

fn layout_flag_names(flags: LayoutFlags) -> String {
    let names: Vec<&str> = flags.iter_names().map(|(name, _)| name).collect();
    if names.is_empty() { "-".to_string() } else { names.join("|") }
}

fn format_size(width: f32, height: f32) -> String {
    let axis = |value: f32| if value < 0.0 { "unset".to_string() } else { format!("{:.1}", value) };
    format!("({}, {})", axis(width), axis(height))
}

fn format_spacing(spacing: &Spacing) -> String {
    format!(
        "l:{:.1} t:{:.1} r:{:.1} b:{:.1}",
        spacing.left, spacing.top, spacing.right, spacing.bottom
    )
}

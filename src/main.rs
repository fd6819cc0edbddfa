use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::{error, warn};
use shapeboard::draw::{Color, Point, color::parse_color};
use shapeboard::storage::{StorageOptions, inspect_scene};
use shapeboard::{Canvas, Config, DrawingHistory};
use std::path::{Path, PathBuf};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("SHAPEBOARD_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "shapeboard")]
#[command(version = VERSION, about = "Extensible shape scene editor")]
struct Cli {
    /// Config file to use instead of ~/.config/shapeboard/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Shape plugin library to load (repeatable)
    #[arg(long = "plugin", global = true, value_name = "PATH", action = ArgAction::Append)]
    plugins: Vec<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the registered shape kinds
    Kinds,

    /// Summarize a scene file
    Info {
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },

    /// Validate a scene file
    Check { file: PathBuf },

    /// Draw one shape into a scene file, creating it if needed
    Add {
        file: PathBuf,

        /// Shape kind (see `shapeboard kinds`)
        #[arg(long, value_name = "KIND")]
        kind: Option<String>,

        /// Press position
        #[arg(long, value_name = "X,Y", value_parser = parse_point)]
        from: Point,

        /// Release position (or second point of a chain)
        #[arg(long, value_name = "X,Y", value_parser = parse_point)]
        to: Point,

        /// Further chain points, in order
        #[arg(
            long = "point",
            value_name = "X,Y",
            value_parser = parse_point,
            action = ArgAction::Append
        )]
        points: Vec<Point>,

        /// Outline color (name, #RRGGBB, #AARRGGBB or packed ARGB)
        #[arg(long, value_name = "COLOR", value_parser = parse_color_arg)]
        stroke: Option<Color>,

        /// Fill color; "transparent" for none
        #[arg(long, value_name = "COLOR", value_parser = parse_color_arg)]
        fill: Option<Color>,

        /// Outline width in pixels
        #[arg(long, value_name = "N")]
        thickness: Option<u32>,
    },

    /// Render a scene file to PNG
    #[cfg(feature = "cairo")]
    Render {
        file: PathBuf,

        /// Output PNG path
        #[arg(long, short = 'o', value_name = "PNG")]
        output: PathBuf,

        /// Image width in pixels (defaults to export.width)
        #[arg(long)]
        width: Option<i32>,

        /// Image height in pixels (defaults to export.height)
        #[arg(long)]
        height: Option<i32>,
    },
}

fn parse_point(raw: &str) -> Result<Point, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{raw}'"))?;
    let x = x.trim().parse().map_err(|_| format!("invalid X in '{raw}'"))?;
    let y = y.trim().parse().map_err(|_| format!("invalid Y in '{raw}'"))?;
    Ok(Point::new(x, y))
}

fn parse_color_arg(raw: &str) -> Result<Color, String> {
    parse_color(raw).ok_or_else(|| format!("unknown color '{raw}'"))
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Ok(Config::load().unwrap_or_else(|err| {
            warn!("Could not load config ({err:#}); using defaults");
            Config::default()
        })),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let mut canvas = Canvas::from_config(&config);
    for path in &cli.plugins {
        match canvas.load_plugin(path) {
            Ok(report) => {
                for rejected in &report.rejected {
                    warn!("{}", rejected);
                }
            }
            Err(err) => error!("{err}"),
        }
    }

    match cli.command {
        Command::Kinds => {
            for kind in canvas.registry().kinds() {
                println!("{kind}");
            }
        }
        Command::Info { file, json } => {
            let summary = inspect_scene(
                &file,
                canvas.registry(),
                &StorageOptions::from_config(&config.storage),
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("File:       {}", summary.path.display());
                println!("Size:       {} bytes", summary.size_bytes);
                println!("Compressed: {}", if summary.compressed { "yes" } else { "no" });
                println!("Shapes:     {}", summary.shape_count);
                for (kind, count) in &summary.kinds {
                    println!("  {kind}: {count}");
                }
                match summary.bounds {
                    Some(bounds) => println!("Bounds:     {bounds}"),
                    None => println!("Bounds:     (empty)"),
                }
            }
        }
        Command::Check { file } => {
            let mut scratch = DrawingHistory::new();
            let count = shapeboard::storage::load_scene(
                &file,
                &mut scratch,
                canvas.registry(),
                &StorageOptions::from_config(&config.storage),
            )?;
            println!("{}: OK ({} shapes)", file.display(), count);
        }
        Command::Add {
            file,
            kind,
            from,
            to,
            points,
            stroke,
            fill,
            thickness,
        } => {
            if file.exists() {
                canvas.load(&file)?;
            }
            if let Some(kind) = kind {
                canvas.set_shape_kind(&kind)?;
            }
            if let Some(color) = stroke {
                canvas.set_stroke_color(color);
            }
            if let Some(color) = fill {
                canvas.set_fill_color(color);
            }
            if let Some(thickness) = thickness {
                canvas.set_stroke_thickness(thickness);
            }

            draw_shape(&mut canvas, from, to, &points)?;
            canvas.save(&file)?;
            println!(
                "Added {} to {} ({} shapes)",
                canvas.tool().shape_kind,
                file.display(),
                canvas.history().len()
            );
        }
        #[cfg(feature = "cairo")]
        Command::Render {
            file,
            output,
            width,
            height,
        } => {
            canvas.load(&file)?;
            let options = shapeboard::draw::ExportOptions {
                width: width.unwrap_or(config.export.width).clamp(16, 16384),
                height: height.unwrap_or(config.export.height).clamp(16, 16384),
                background: config.background(),
            };
            shapeboard::draw::export_png(canvas.history(), &output, &options)?;
            println!("Rendered {} to {}", file.display(), output.display());
        }
    }

    Ok(())
}

/// Replays a pointer gesture: drag for single-shot kinds, one press per point
/// plus a double-click for incremental ones.
fn draw_shape(canvas: &mut Canvas, from: Point, to: Point, points: &[Point]) -> Result<()> {
    canvas
        .press(from)
        .with_context(|| format!("cannot draw a '{}'", canvas.tool().shape_kind))?;

    let incremental = canvas
        .in_progress()
        .is_some_and(|shape| shape.is_incremental());
    if incremental {
        canvas.press(to)?;
        for point in points {
            canvas.press(*point)?;
        }
        canvas.double_click();
    } else {
        if !points.is_empty() {
            warn!(
                "{} is not a chain kind; ignoring {} extra point(s)",
                canvas.tool().shape_kind,
                points.len()
            );
        }
        canvas.drag(to);
        canvas.release(to);
    }
    Ok(())
}

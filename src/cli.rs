// ============================================================================
// Headless mosaic: pixelate a region of an image file from the command line
// ============================================================================
//
// Usage examples:
//   mosaic-editor -i photo.png -o out.png                      (whole image)
//   mosaic-editor -i photo.png -o out.jpg --rect 40,30,120,80 -b 16
//   mosaic-editor -i face.jpg -o out.webp --polygon "10,10;90,12;60,80"
//
// The selection goes through the same drag state machine the browser uses,
// so size thresholds and the pixel-centre inclusion rule are identical.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use crate::config::EditorConfig;
use crate::constants::MIN_FREEHAND_POINTS;
use crate::coords::{ElementBounds, PointerEvent};
use crate::data::ImageLoader;
use crate::error::{EditorError, Result};
use crate::format::ExportFormat;
use crate::model::{Point, RectangleRegion};
use crate::selection::{DragOutcome, PointerButton, SelectionMode};
use crate::session::{EditSession, SessionConfig};

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// Pixelate part of an image without opening the browser editor.
#[derive(Parser, Debug)]
#[command(
    name = "mosaic-editor",
    version,
    about = "Pixelate a rectangle, polygon or the whole of an image file"
)]
pub struct CliArgs {
    /// Image to edit (PNG, JPEG, BMP, GIF, WEBP).
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Where to write the result.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Mosaic block size in pixels, clamped to the configured bounds.
    #[arg(short, long, value_name = "PIXELS")]
    pub block_size: Option<u32>,

    /// Selection mode: rectangle, freehand or full.
    /// Inferred from --rect / --polygon when omitted.
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Rectangle selection in image pixels.
    #[arg(long, value_name = "X,Y,W,H", value_parser = parse_rect, conflicts_with = "polygon")]
    pub rect: Option<RectangleRegion>,

    /// Freehand outline in image pixels (at least three vertices).
    #[arg(long, value_name = "X,Y;X,Y;...", value_parser = parse_polygon)]
    pub polygon: Option<Polygon>,

    /// JSON config file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format: png, jpeg, webp. Inferred from --output when omitted.
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// JPEG quality (1-100).
    #[arg(short, long, value_name = "1-100")]
    pub quality: Option<u8>,

    /// Debug logging and timing output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Polygon vertices given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon(pub Vec<Point>);

fn parse_coords(s: &str) -> std::result::Result<Vec<f32>, String> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|_| format!("'{}' is not a number", part.trim()))
        })
        .collect()
}

fn parse_rect(s: &str) -> std::result::Result<RectangleRegion, String> {
    match parse_coords(s)?.as_slice() {
        &[x, y, w, h] if w > 0.0 && h > 0.0 => Ok(RectangleRegion::new(x, y, w, h)),
        &[_, _, _, _] => Err("width and height must be positive".to_string()),
        _ => Err(format!("expected X,Y,W,H but got '{}'", s)),
    }
}

fn parse_polygon(s: &str) -> std::result::Result<Polygon, String> {
    let points = s
        .split(';')
        .filter(|v| !v.trim().is_empty())
        .map(|vertex| match parse_coords(vertex)?.as_slice() {
            &[x, y] => Ok(Point::new(x, y)),
            _ => Err(format!("expected X,Y but got '{}'", vertex.trim())),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if points.len() < 3 {
        return Err(format!("a polygon needs at least 3 vertices, got {}", points.len()));
    }
    Ok(Polygon(points))
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run the edit and return an OS exit code.
pub fn run(args: CliArgs) -> ExitCode {
    let config = match &args.config {
        Some(path) => match EditorConfig::load_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: could not load config '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => EditorConfig::default(),
    };

    init_logging(&args, &config);

    let start = Instant::now();
    match process(&args, &config) {
        Ok(()) => {
            if args.verbose {
                eprintln!(
                    "wrote {} in {:.1}ms",
                    args.output.display(),
                    start.elapsed().as_secs_f64() * 1000.0
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(args: &CliArgs, config: &EditorConfig) {
    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        config.log_level.to_level_filter()
    };
    // RUST_LOG still wins when set
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn process(args: &CliArgs, config: &EditorConfig) -> Result<()> {
    let raster = ImageLoader.load_file(&args.input)?;

    let mut session = EditSession::new(SessionConfig::from(config));
    session.load_image(raster);

    let mode = resolve_mode(args)?;
    let block_size = resolve_block_size(args, config);
    apply_selection(&mut session, mode, args.rect, args.polygon.as_ref())?;
    session.apply_mosaic(block_size)?;

    let format = resolve_format(args.format.as_deref(), &args.output, config)?;
    let quality = args.quality.unwrap_or(config.export.quality);
    let bytes = session.export(format, quality)?;
    std::fs::write(&args.output, bytes)?;

    log::info!(
        "Saved {} as {} ({} mode, block size {})",
        args.output.display(),
        format,
        mode,
        block_size
    );
    Ok(())
}

fn resolve_mode(args: &CliArgs) -> Result<SelectionMode> {
    let mode = match &args.mode {
        Some(name) => name.parse()?,
        None if args.rect.is_some() => SelectionMode::Rectangle,
        None if args.polygon.is_some() => SelectionMode::Freehand,
        // Nothing to drag, so the only usable mode is the whole image
        None => SelectionMode::Full,
    };
    Ok(mode)
}

fn resolve_block_size(args: &CliArgs, config: &EditorConfig) -> u32 {
    match args.block_size {
        Some(requested) => {
            let clamped = config.clamp_block_size(requested);
            if clamped != requested {
                log::warn!("Block size {} clamped to {}", requested, clamped);
            }
            clamped
        }
        None => config.block_size.default,
    }
}

fn resolve_format(format: Option<&str>, output: &Path, config: &EditorConfig) -> Result<ExportFormat> {
    if let Some(name) = format {
        return name.parse();
    }
    Ok(output
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(ExportFormat::from_file_name)
        .unwrap_or(config.export.format))
}

/// Put the session's selection into `mode` and, for drag-based modes, drag
/// out the requested shape. Image pixels map one-to-one onto the synthetic
/// element so no scaling happens.
fn apply_selection(
    session: &mut EditSession,
    mode: SelectionMode,
    rect: Option<RectangleRegion>,
    polygon: Option<&Polygon>,
) -> Result<()> {
    session.set_selection_mode(mode);

    let points = match mode {
        SelectionMode::Full => {
            if rect.is_some() || polygon.is_some() {
                log::warn!("Full mode pixelates the whole image; --rect/--polygon ignored");
            }
            return Ok(());
        }
        SelectionMode::Rectangle => {
            let rect = rect.ok_or_else(|| {
                EditorError::invalid_operation("rectangle mode needs --rect X,Y,W,H")
            })?;
            vec![
                Point::new(rect.x, rect.y),
                Point::new(rect.right(), rect.bottom()),
            ]
        }
        SelectionMode::Freehand => {
            let polygon = polygon.ok_or_else(|| {
                EditorError::invalid_operation("freehand mode needs --polygon X,Y;X,Y;...")
            })?;
            densify(&polygon.0, MIN_FREEHAND_POINTS)
        }
    };

    match drag_through(session, &points)? {
        DragOutcome::Confirmed => Ok(()),
        DragOutcome::Discarded(reason) => Err(EditorError::invalid_operation(format!(
            "selection discarded: {:?}",
            reason
        ))),
        DragOutcome::NotDragging => Err(EditorError::invalid_operation(
            "selection drag did not start",
        )),
    }
}

fn drag_through(session: &mut EditSession, points: &[Point]) -> Result<DragOutcome> {
    let (width, height) = session
        .dimensions()
        .ok_or_else(|| EditorError::invalid_operation("no image loaded"))?;
    let bounds = ElementBounds::new(0.0, 0.0, width as f32, height as f32);

    let Some((first, rest)) = points.split_first() else {
        return Ok(DragOutcome::NotDragging);
    };
    session.pointer_down(
        PointerEvent::new(first.x, first.y),
        bounds,
        PointerButton::Primary,
    );
    for p in rest {
        session.pointer_move(PointerEvent::new(p.x, p.y), bounds);
    }
    Ok(session.pointer_up())
}

/// Subdivide the closed outline through `vertices` until it has at least
/// `min_points` points. A hand-drawn outline records far more points than
/// a typed polygon has vertices.
fn densify(vertices: &[Point], min_points: usize) -> Vec<Point> {
    if vertices.len() < 2 || vertices.len() >= min_points {
        return vertices.to_vec();
    }
    let steps = min_points.div_ceil(vertices.len());
    let mut out = Vec::with_capacity(vertices.len() * steps);
    for (i, a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        for s in 0..steps {
            let t = s as f32 / steps as f32;
            out.push(Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Raster;

    fn gradient_session(width: u32, height: u32) -> EditSession {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x * 10) as u8, (y * 10) as u8, 0, 255]);
            }
        }
        let mut session = EditSession::default();
        session.load_image(Raster::new(width, height, pixels).unwrap());
        session
    }

    #[test]
    fn test_parse_rect() {
        assert_eq!(
            parse_rect("5, 5, 10,10").unwrap(),
            RectangleRegion::new(5.0, 5.0, 10.0, 10.0)
        );
        assert!(parse_rect("1,2,3").is_err());
        assert!(parse_rect("1,2,0,4").is_err());
        assert!(parse_rect("a,b,c,d").is_err());
    }

    #[test]
    fn test_parse_polygon() {
        let polygon = parse_polygon("0,0; 10,0; 10,10;").unwrap();
        assert_eq!(polygon.0.len(), 3);
        assert_eq!(polygon.0[1], Point::new(10.0, 0.0));

        assert!(parse_polygon("0,0;10,0").is_err());
        assert!(parse_polygon("0,0;10;10,10").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = CliArgs::try_parse_from([
            "mosaic-editor",
            "-i",
            "in.png",
            "-o",
            "out.jpg",
            "--rect",
            "1,2,30,40",
            "-b",
            "12",
        ])
        .unwrap();
        assert_eq!(args.rect, Some(RectangleRegion::new(1.0, 2.0, 30.0, 40.0)));
        assert_eq!(args.block_size, Some(12));
        assert!(args.polygon.is_none());

        let config = EditorConfig::default();
        assert_eq!(resolve_mode(&args).unwrap(), SelectionMode::Rectangle);
        assert_eq!(
            resolve_format(None, &args.output, &config).unwrap(),
            ExportFormat::Jpeg
        );
    }

    #[test]
    fn test_rect_and_polygon_conflict() {
        let result = CliArgs::try_parse_from([
            "mosaic-editor",
            "-i",
            "in.png",
            "-o",
            "out.png",
            "--rect",
            "0,0,10,10",
            "--polygon",
            "0,0;5,0;5,5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_block_size_clamped() {
        let args =
            CliArgs::try_parse_from(["mosaic-editor", "-i", "a.png", "-o", "b.png", "-b", "500"])
                .unwrap();
        assert_eq!(resolve_block_size(&args, &EditorConfig::default()), 50);
    }

    #[test]
    fn test_format_fallbacks() {
        let config = EditorConfig::default();
        assert_eq!(
            resolve_format(Some("webp"), Path::new("out.png"), &config).unwrap(),
            ExportFormat::WebP
        );
        assert_eq!(
            resolve_format(None, Path::new("out"), &config).unwrap(),
            ExportFormat::Png
        );
        assert!(resolve_format(Some("tiff"), Path::new("out.png"), &config).is_err());
    }

    #[test]
    fn test_densify_reaches_minimum() {
        let triangle = [
            Point::new(0.0, 0.0),
            Point::new(12.0, 0.0),
            Point::new(0.0, 12.0),
        ];
        let dense = densify(&triangle, MIN_FREEHAND_POINTS);
        assert!(dense.len() >= MIN_FREEHAND_POINTS);
        assert_eq!(dense[0], triangle[0]);
        assert!(dense.contains(&triangle[1]));
        assert!(dense.contains(&triangle[2]));
    }

    #[test]
    fn test_rectangle_selection_applies() {
        let mut session = gradient_session(20, 20);
        let rect = RectangleRegion::new(5.0, 5.0, 10.0, 10.0);
        apply_selection(&mut session, SelectionMode::Rectangle, Some(rect), None).unwrap();
        assert!(session.has_selection());

        let before = session.current_raster().unwrap().clone();
        session.apply_mosaic(5).unwrap();
        let after = session.current_raster().unwrap();
        assert_eq!(after.pixel(0, 0), before.pixel(0, 0));
        assert_ne!(after.pixel(5, 5), before.pixel(5, 5));
    }

    #[test]
    fn test_polygon_selection_confirms() {
        let mut session = gradient_session(20, 20);
        let polygon = parse_polygon("2,2;18,2;10,18").unwrap();
        apply_selection(&mut session, SelectionMode::Freehand, None, Some(&polygon)).unwrap();
        assert!(session.has_selection());
    }

    #[test]
    fn test_small_rectangle_is_rejected() {
        let mut session = gradient_session(20, 20);
        let rect = RectangleRegion::new(1.0, 1.0, 2.0, 2.0);
        let err = apply_selection(&mut session, SelectionMode::Rectangle, Some(rect), None)
            .unwrap_err();
        assert!(err.is_invalid_operation());
    }

    #[test]
    fn test_full_mode_overrides_shape() {
        let args = CliArgs::try_parse_from([
            "mosaic-editor",
            "-i",
            "in.png",
            "-o",
            "out.png",
            "-m",
            "full",
            "--rect",
            "0,0,10,10",
        ])
        .unwrap();
        assert_eq!(resolve_mode(&args).unwrap(), SelectionMode::Full);

        let mut session = gradient_session(20, 20);
        apply_selection(&mut session, SelectionMode::Full, args.rect, None).unwrap();
        assert_eq!(session.selection().mode(), SelectionMode::Full);
        assert!(session.can_apply());

        let before = session.current_raster().unwrap().clone();
        session.apply_mosaic(5).unwrap();
        // Pixels outside the rectangle are pixelated too
        assert_ne!(
            session.current_raster().unwrap().pixel(15, 15),
            before.pixel(15, 15)
        );
    }

    #[test]
    fn test_rectangle_mode_without_rect() {
        let mut session = gradient_session(20, 20);
        assert!(apply_selection(&mut session, SelectionMode::Rectangle, None, None).is_err());
        assert!(apply_selection(&mut session, SelectionMode::Full, None, None).is_ok());
        assert!(session.can_apply());
    }
}

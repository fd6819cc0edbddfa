//! Cairo-backed renderer and PNG export.

use super::color::Color;
use super::geometry::{Point, Rect};
use super::render::{Renderer, Stroke};
use crate::history::DrawingHistory;
use anyhow::{Context as _, Result, anyhow};
use log::{debug, info};
use std::fs::File;
use std::path::Path;

/// Renders shapes onto a Cairo context.
pub struct CairoRenderer<'a> {
    ctx: &'a cairo::Context,
}

impl<'a> CairoRenderer<'a> {
    pub fn new(ctx: &'a cairo::Context) -> Self {
        Self { ctx }
    }

    fn set_source(&self, color: Color) {
        let (r, g, b, a) = color.to_rgba_f64();
        self.ctx.set_source_rgba(r, g, b, a);
    }

    fn apply_stroke(&self, stroke: Stroke) {
        self.set_source(stroke.color);
        self.ctx.set_line_width(stroke.thickness as f64);
    }

    /// Fills the current path (preserving it) and then strokes it.
    fn fill_and_stroke(&self, stroke: Stroke, fill: Option<Color>) {
        if let Some(fill) = fill {
            self.set_source(fill);
            let _ = self.ctx.fill_preserve();
        }
        self.apply_stroke(stroke);
        let _ = self.ctx.stroke();
    }

    fn trace_points(&self, points: &[Point]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.move_to(first.x as f64, first.y as f64);
        for point in rest {
            self.ctx.line_to(point.x as f64, point.y as f64);
        }
    }
}

impl Renderer for CairoRenderer<'_> {
    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.apply_stroke(stroke);
        self.ctx.set_line_cap(cairo::LineCap::Round);
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        let _ = self.ctx.stroke();
    }

    fn draw_rectangle(&mut self, rect: Rect, stroke: Stroke, fill: Option<Color>) {
        self.ctx.set_line_join(cairo::LineJoin::Miter);
        self.ctx.rectangle(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
        self.fill_and_stroke(stroke, fill);
    }

    fn draw_ellipse(&mut self, bounds: Rect, stroke: Stroke, fill: Option<Color>) {
        // A zero radius would make the scaled matrix non-invertible.
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }

        let rx = bounds.width as f64 / 2.0;
        let ry = bounds.height as f64 / 2.0;

        self.ctx.save().ok();
        self.ctx.translate(bounds.x as f64 + rx, bounds.y as f64 + ry);
        self.ctx.scale(rx, ry);
        self.ctx.arc(0.0, 0.0, 1.0, 0.0, 2.0 * std::f64::consts::PI);
        self.ctx.restore().ok();

        self.fill_and_stroke(stroke, fill);
    }

    fn draw_polyline(&mut self, points: &[Point], stroke: Stroke) {
        if points.len() < 2 {
            return;
        }
        self.ctx.set_line_cap(cairo::LineCap::Round);
        self.ctx.set_line_join(cairo::LineJoin::Round);
        self.trace_points(points);
        self.apply_stroke(stroke);
        let _ = self.ctx.stroke();
    }

    fn draw_polygon(&mut self, points: &[Point], stroke: Stroke, fill: Option<Color>) {
        if points.len() < 2 {
            return;
        }
        self.ctx.set_line_join(cairo::LineJoin::Miter);
        self.trace_points(points);
        self.ctx.close_path();
        self.fill_and_stroke(stroke, fill);
    }
}

/// Raster export parameters.
#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    pub width: i32,
    pub height: i32,
    pub background: Color,
}

/// Renders the current scene into a PNG file.
///
/// The background is painted first (skipped when transparent), then every
/// shape in z-order.
pub fn export_png(history: &DrawingHistory, path: &Path, options: &ExportOptions) -> Result<()> {
    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, options.width, options.height)
        .map_err(|err| {
            anyhow!(
                "failed to create {}x{} surface: {err}",
                options.width,
                options.height
            )
        })?;

    {
        let ctx = cairo::Context::new(&surface)
            .map_err(|err| anyhow!("failed to create drawing context: {err}"))?;
        ctx.set_antialias(cairo::Antialias::Best);

        if !options.background.is_transparent() {
            let (r, g, b, a) = options.background.to_rgba_f64();
            ctx.set_source_rgba(r, g, b, a);
            let _ = ctx.paint();
        }

        let mut renderer = CairoRenderer::new(&ctx);
        history.render_all(&mut renderer);
        debug!("Rendered {} shapes", history.len());
    }

    surface.flush();
    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    surface
        .write_to_png(&mut file)
        .with_context(|| format!("failed to write PNG {}", path.display()))?;

    info!(
        "Exported {} shapes to {} ({}x{})",
        history.len(),
        path.display(),
        options.width,
        options.height
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::WHITE;
    use crate::registry::ShapeRegistry;

    #[test]
    fn export_writes_a_png_file() {
        let registry = ShapeRegistry::with_builtins();
        let mut history = DrawingHistory::new();
        history
            .load_from_text(&registry, "Rectangle|10,10,50,30|-65536|3|16777215\n")
            .unwrap();

        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("scene.png");
        export_png(
            &history,
            &path,
            &ExportOptions {
                width: 100,
                height: 80,
                background: WHITE,
            },
        )
        .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}

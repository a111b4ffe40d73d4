//! Drawing a [`Figure`] with plotters.
//!
//! The scene maps one to one onto plotters elements: meshes become filled
//! rectangles, lines become paths (split into dashes in pixel space when
//! styled), text becomes `Text` placed from axes-relative coordinates, and
//! color bars get a strip of their own at the right edge of the axes.

use std::path::Path;

use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use super::{Artist, Axes, Figure, Line2D, PlotBounds, QuadMesh, TextArtist};
use crate::config::{LegendLoc, LineStyle, Marker};
use crate::{AnimoError, AnimoResult};

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Width in pixels reserved for a color bar strip.
const COLORBAR_WIDTH: u32 = 80;
/// Number of color steps drawn in a color bar.
const COLORBAR_STEPS: usize = 64;

impl Figure {
    /// Draw the whole figure onto a plotters drawing area.
    pub fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> AnimoResult<()> {
        root.fill(&self.background().to_rgb())
            .map_err(AnimoError::render)?;

        let area = match self.title() {
            Some(title) => root
                .titled(title, ("sans-serif", 20.0))
                .map_err(AnimoError::render)?,
            None => root.clone(),
        };

        let layout = self.layout();
        let panels = area.split_evenly((layout.rows, layout.cols));
        for (axes, panel) in self.all_axes().iter().zip(panels.iter()) {
            draw_axes(axes, panel)?;
        }
        Ok(())
    }

    /// Render to a PNG (or any bitmap format the extension names).
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> AnimoResult<()> {
        let root = BitMapBackend::new(path.as_ref(), self.size()).into_drawing_area();
        self.draw(&root)?;
        root.present().map_err(AnimoError::render)?;
        Ok(())
    }

    /// Render to an SVG file.
    pub fn save_svg<P: AsRef<Path>>(&self, path: P) -> AnimoResult<()> {
        let root = SVGBackend::new(path.as_ref(), self.size()).into_drawing_area();
        self.draw(&root)?;
        root.present().map_err(AnimoError::render)?;
        Ok(())
    }

    /// Render to an in-memory SVG document.
    pub fn to_svg_string(&self) -> AnimoResult<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.size()).into_drawing_area();
            self.draw(&root)?;
            root.present().map_err(AnimoError::render)?;
        }
        Ok(svg)
    }
}

fn draw_axes<DB: DrawingBackend>(axes: &Axes, area: &DrawingArea<DB, Shift>) -> AnimoResult<()> {
    let (width, _) = area.dim_in_pixel();
    let colorbar_mesh = match axes.colorbar() {
        Some(colorbar) if width > 2 * COLORBAR_WIDTH => Some(axes.mesh(colorbar.mesh)?),
        _ => None,
    };
    let (plot_area, strip) = match colorbar_mesh {
        Some(_) => {
            let (main, strip) = area.split_horizontally((width - COLORBAR_WIDTH) as i32);
            (main, Some(strip))
        }
        None => (area.clone(), None),
    };

    let limits = axes.view_limits();
    let mut builder = ChartBuilder::on(&plot_area);
    builder.margin(10).x_label_area_size(40).y_label_area_size(50);
    if let Some(title) = &axes.title {
        builder.caption(title, ("sans-serif", 16.0));
    }
    let mut chart = builder
        .build_cartesian_2d(limits.x_min..limits.x_max, limits.y_min..limits.y_max)
        .map_err(AnimoError::render)?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh()
            .axis_desc_style(("sans-serif", f64::from(axes.label_size)));
        if let Some(label) = &axes.xlabel {
            mesh.x_desc(label.as_str());
        }
        if let Some(label) = &axes.ylabel {
            mesh.y_desc(label.as_str());
        }
        mesh.draw().map_err(AnimoError::render)?;
    }

    for id in axes.draw_order() {
        match axes.artist(id)? {
            Artist::Mesh(mesh) => draw_mesh(&mut chart, mesh)?,
            Artist::Line(line) => draw_line(&mut chart, line)?,
            Artist::Text(text) => draw_text(&mut chart, text, &limits)?,
            Artist::Colorbar(_) => {}
        }
    }

    draw_legend(&mut chart, axes)?;

    if let (Some(strip), Some(mesh)) = (strip, colorbar_mesh) {
        draw_colorbar(&strip, mesh)?;
    }
    Ok(())
}

fn draw_mesh<DB: DrawingBackend>(chart: &mut Chart<'_, DB>, mesh: &QuadMesh) -> AnimoResult<()> {
    let cells = mesh.cells().filter_map(|(p0, p1, value)| {
        mesh.colormap
            .map(mesh.norm.apply(value))
            .map(|color| Rectangle::new([p0, p1], color.to_rgb().filled()))
    });
    chart.draw_series(cells).map_err(AnimoError::render)?;
    Ok(())
}

/// On/off lengths in pixels for a dashed style, scaled by the line width.
fn dash_pattern(style: LineStyle, linewidth: u32) -> Option<Vec<f64>> {
    let base: &[f64] = match style {
        LineStyle::Solid => return None,
        LineStyle::Dashed => &[3.7, 1.6],
        LineStyle::Dotted => &[1.0, 1.65],
        LineStyle::DashDot => &[6.4, 1.6, 1.0, 1.6],
    };
    let scale = f64::from(linewidth.max(1));
    Some(base.iter().map(|len| len * scale).collect())
}

/// Split a polyline into dashes.
///
/// Lengths in `pattern` alternate on/off and are measured in pixels after
/// `to_pixel`; the returned dashes are in data coordinates.
pub fn dash_segments<F>(points: &[(f64, f64)], to_pixel: F, pattern: &[f64]) -> Vec<Vec<(f64, f64)>>
where
    F: Fn((f64, f64)) -> (i32, i32),
{
    if points.len() < 2 || pattern.is_empty() || pattern.iter().any(|len| *len <= 0.0) {
        return vec![points.to_vec()];
    }

    let mut dashes = Vec::new();
    let mut current = vec![points[0]];
    let mut k = 0;
    let mut left = pattern[0];

    for pair in points.windows(2) {
        let (p0, p1) = (pair[0], pair[1]);
        let (a, b) = (to_pixel(p0), to_pixel(p1));
        let length = f64::from(b.0 - a.0).hypot(f64::from(b.1 - a.1));
        if length == 0.0 {
            continue;
        }

        let mut pos = 0.0;
        while length - pos > left {
            pos += left;
            let t = pos / length;
            let point = (p0.0 + (p1.0 - p0.0) * t, p0.1 + (p1.1 - p0.1) * t);
            if k % 2 == 0 {
                current.push(point);
                dashes.push(std::mem::take(&mut current));
            } else {
                current = vec![point];
            }
            k = (k + 1) % pattern.len();
            left = pattern[k];
        }
        left -= length - pos;
        if k % 2 == 0 {
            current.push(p1);
        }
    }
    if k % 2 == 0 && current.len() >= 2 {
        dashes.push(current);
    }
    dashes
}

fn draw_line<DB: DrawingBackend>(chart: &mut Chart<'_, DB>, line: &Line2D) -> AnimoResult<()> {
    let points = line.points();
    let color = line.color.to_rgb();
    let stroke = color.stroke_width(line.linewidth.max(1));

    match dash_pattern(line.linestyle, line.linewidth) {
        None => {
            chart
                .draw_series(LineSeries::new(points.iter().copied(), stroke))
                .map_err(AnimoError::render)?;
        }
        Some(pattern) => {
            let dashes = dash_segments(&points, |p| chart.backend_coord(&p), &pattern);
            chart
                .draw_series(dashes.into_iter().map(|dash| PathElement::new(dash, stroke)))
                .map_err(AnimoError::render)?;
        }
    }

    let size = line.marker_size as i32;
    let fill = color.filled();
    match line.marker {
        Marker::None => {}
        Marker::Circle => {
            chart
                .draw_series(points.iter().map(|&p| Circle::new(p, size, fill)))
                .map_err(AnimoError::render)?;
        }
        Marker::Square => {
            chart
                .draw_series(points.iter().map(|&p| {
                    EmptyElement::at(p) + Rectangle::new([(-size, -size), (size, size)], fill)
                }))
                .map_err(AnimoError::render)?;
        }
        Marker::Triangle => {
            chart
                .draw_series(points.iter().map(|&p| TriangleMarker::new(p, size, fill)))
                .map_err(AnimoError::render)?;
        }
        Marker::Cross => {
            chart
                .draw_series(points.iter().map(|&p| Cross::new(p, size, stroke)))
                .map_err(AnimoError::render)?;
        }
    }
    Ok(())
}

fn draw_text<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    text: &TextArtist,
    limits: &PlotBounds,
) -> AnimoResult<()> {
    if text.text().is_empty() {
        return Ok(());
    }
    let (fx, fy) = text.position;
    let anchor = (
        limits.x_min + fx * (limits.x_max - limits.x_min),
        limits.y_min + fy * (limits.y_max - limits.y_min),
    );
    let style = ("sans-serif", f64::from(text.size))
        .into_font()
        .color(&text.color.to_rgb());
    chart
        .draw_series(std::iter::once(Text::new(
            text.text().to_string(),
            anchor,
            style,
        )))
        .map_err(AnimoError::render)?;
    Ok(())
}

const fn series_label_position(loc: LegendLoc) -> SeriesLabelPosition {
    match loc {
        LegendLoc::Best | LegendLoc::UpperRight => SeriesLabelPosition::UpperRight,
        LegendLoc::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendLoc::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendLoc::LowerRight => SeriesLabelPosition::LowerRight,
        LegendLoc::CenterLeft => SeriesLabelPosition::MiddleLeft,
        LegendLoc::CenterRight => SeriesLabelPosition::MiddleRight,
        LegendLoc::LowerCenter => SeriesLabelPosition::LowerMiddle,
        LegendLoc::UpperCenter => SeriesLabelPosition::UpperMiddle,
        LegendLoc::Center => SeriesLabelPosition::MiddleMiddle,
    }
}

fn draw_legend<'a, DB: DrawingBackend + 'a>(chart: &mut Chart<'a, DB>, axes: &Axes) -> AnimoResult<()> {
    let Some(legend) = axes.legend.as_ref().filter(|legend| legend.show) else {
        return Ok(());
    };

    let mut entries = Vec::new();
    for id in axes.draw_order() {
        if let Artist::Line(line) = axes.artist(id)?
            && let Some(label) = &line.label
        {
            entries.push((label.clone(), line.color.to_rgb().stroke_width(line.linewidth.max(1))));
        }
    }
    if entries.is_empty() && legend.title.is_none() {
        return Ok(());
    }

    if let Some(title) = &legend.title {
        chart
            .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())
            .map_err(AnimoError::render)?
            .label(title.as_str())
            .legend(|(x, y)| EmptyElement::at((x, y)));
    }
    for (label, stroke) in entries {
        chart
            .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())
            .map_err(AnimoError::render)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], stroke));
    }

    chart
        .configure_series_labels()
        .position(series_label_position(legend.loc))
        .label_font(("sans-serif", 13.0))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(AnimoError::render)?;
    Ok(())
}

fn format_tick(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-2..1e4).contains(&magnitude) {
        format!("{value:.1e}")
    } else {
        format!("{value:.2}")
    }
}

fn draw_colorbar<DB: DrawingBackend>(
    strip: &DrawingArea<DB, Shift>,
    mesh: &QuadMesh,
) -> AnimoResult<()> {
    let norm = mesh.norm;
    let mut chart = ChartBuilder::on(strip)
        .margin_top(10)
        .margin_bottom(50)
        .margin_right(15)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..1f64, 0f64..1f64)
        .map_err(AnimoError::render)?;

    let formatter = |t: &f64| format_tick(norm.inverse(*t));
    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(5)
        .y_label_formatter(&formatter)
        .draw()
        .map_err(AnimoError::render)?;

    let steps = COLORBAR_STEPS as f64;
    chart
        .draw_series((0..COLORBAR_STEPS).filter_map(|i| {
            let (t0, t1) = (i as f64 / steps, (i + 1) as f64 / steps);
            mesh.colormap
                .map((t0 + t1) / 2.0)
                .map(|color| Rectangle::new([(0.0, t0), (1.0, t1)], color.to_rgb().filled()))
        }))
        .map_err(AnimoError::render)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, Colormap};
    use crate::config::{FigureConfig, LineConfig};
    use crate::normalization::Normalization;
    use ndarray::{Array1, Array2};

    fn line_figure(style: LineStyle, marker: Marker) -> Figure {
        let mut figure = Figure::new(&FigureConfig::default().with_figsize(320, 240));
        let x = Array1::linspace(0.0, 10.0, 40);
        let y = x.mapv(f64::sin);
        let config = LineConfig::default()
            .with_linestyle(style)
            .with_marker(marker)
            .with_label("wave")
            .with_legend(LegendLoc::UpperLeft, Some("signals"));
        let line = Line2D::new(x.view(), y.view(), &config, Color::cycle(0)).unwrap();
        let axes = figure.axes_mut(0).unwrap();
        axes.legend = Some(config.legend.clone());
        axes.add_line(line);
        figure
    }

    fn mesh_figure() -> Figure {
        let mut figure = Figure::new(&FigureConfig::for_images().with_title("heat"));
        let xgrid = Array2::from_shape_fn((4, 5), |(_, j)| j as f64);
        let ygrid = Array2::from_shape_fn((4, 5), |(i, _)| i as f64);
        let values = Array2::from_shape_fn((3, 4), |(i, j)| (i * 4 + j) as f64);
        let mesh = QuadMesh::new(
            xgrid,
            ygrid,
            values,
            Colormap::default(),
            Normalization::Linear { vmin: 0.0, vmax: 11.0 },
            0,
        )
        .unwrap();
        let axes = figure.axes_mut(0).unwrap();
        axes.xlabel = Some("column".to_string());
        let mesh = axes.add_mesh(mesh);
        axes.add_text(TextArtist::new("t = 7", (0.05, 0.92), 14, Color::BLACK));
        axes.add_colorbar(mesh).unwrap();
        figure
    }

    fn count(svg: &str, tag: &str) -> usize {
        svg.matches(tag).count()
    }

    #[test]
    fn test_svg_holds_line_and_legend() {
        let svg = line_figure(LineStyle::Solid, Marker::None)
            .to_svg_string()
            .unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("signals"));
        assert!(svg.contains("wave"));
    }

    #[test]
    fn test_dashed_line_is_split_into_paths() {
        let solid = line_figure(LineStyle::Solid, Marker::None)
            .to_svg_string()
            .unwrap();
        let dashed = line_figure(LineStyle::Dashed, Marker::None)
            .to_svg_string()
            .unwrap();
        assert!(count(&dashed, "<polyline") > count(&solid, "<polyline") + 5);
    }

    #[test]
    fn test_every_marker_is_drawn() {
        let plain = line_figure(LineStyle::Solid, Marker::None)
            .to_svg_string()
            .unwrap();
        let svg = |marker| {
            line_figure(LineStyle::Solid, marker)
                .to_svg_string()
                .unwrap()
        };
        assert!(count(&svg(Marker::Circle), "<circle") >= 40);
        assert!(count(&svg(Marker::Square), "<rect") >= count(&plain, "<rect") + 40);
        assert!(count(&svg(Marker::Triangle), "<polygon") >= 40);
        assert!(count(&svg(Marker::Cross), "<line") >= count(&plain, "<line") + 40);
    }

    #[test]
    fn test_mesh_text_and_colorbar_render() {
        let figure = mesh_figure();
        let svg = figure.to_svg_string().unwrap();
        // 12 cells plus the color bar steps, on top of the background.
        assert!(count(&svg, "<rect") >= 12 + COLORBAR_STEPS);
        assert!(svg.contains("t = 7"));
        assert!(svg.contains("column"));
        assert!(svg.contains("heat"));

        let dir = std::env::temp_dir().join("animo_render_test");
        std::fs::create_dir_all(&dir).unwrap();
        let png = dir.join("mesh.png");
        figure.save_png(&png).unwrap();
        assert!(std::fs::metadata(&png).unwrap().len() > 0);
        let svg_path = dir.join("mesh.svg");
        figure.save_svg(&svg_path).unwrap();
        assert!(std::fs::read_to_string(&svg_path).unwrap().contains("t = 7"));
    }

    fn unit_pixels(p: (f64, f64)) -> (i32, i32) {
        (p.0 as i32, p.1 as i32)
    }

    #[test]
    fn test_dash_segments_straight_line() {
        let dashes = dash_segments(&[(0.0, 0.0), (10.0, 0.0)], unit_pixels, &[3.0, 2.0]);
        assert_eq!(
            dashes,
            vec![vec![(0.0, 0.0), (3.0, 0.0)], vec![(5.0, 0.0), (8.0, 0.0)]]
        );
    }

    #[test]
    fn test_dash_carries_across_vertices() {
        let dashes = dash_segments(
            &[(0.0, 0.0), (2.0, 0.0), (2.0, 4.0)],
            unit_pixels,
            &[3.0, 1.0],
        );
        // The first dash bends around the corner at (2, 0).
        assert_eq!(dashes[0], vec![(0.0, 0.0), (2.0, 0.0), (2.0, 1.0)]);
        assert_eq!(dashes[1], vec![(2.0, 2.0), (2.0, 4.0)]);
    }

    #[test]
    fn test_dash_segments_degenerate_pattern() {
        let points = [(0.0, 0.0), (1.0, 1.0)];
        assert_eq!(dash_segments(&points, unit_pixels, &[]), vec![points.to_vec()]);
        assert_eq!(
            dash_segments(&points, unit_pixels, &[2.0, 0.0]),
            vec![points.to_vec()]
        );
    }

    #[test]
    fn test_dash_pattern_scales_with_width() {
        assert_eq!(dash_pattern(LineStyle::Solid, 3), None);
        assert_eq!(dash_pattern(LineStyle::Dotted, 2), Some(vec![2.0, 3.3]));
        assert_eq!(dash_pattern(LineStyle::Dashed, 0), Some(vec![3.7, 1.6]));
    }

    #[test]
    fn test_tick_format() {
        assert_eq!(format_tick(0.5), "0.50");
        assert_eq!(format_tick(0.0), "0.00");
        assert_eq!(format_tick(12345.0), "1.2e4");
    }

    #[test]
    fn test_legend_positions() {
        assert!(matches!(
            series_label_position(LegendLoc::Best),
            SeriesLabelPosition::UpperRight
        ));
        assert!(matches!(
            series_label_position(LegendLoc::LowerCenter),
            SeriesLabelPosition::LowerMiddle
        ));
    }
}

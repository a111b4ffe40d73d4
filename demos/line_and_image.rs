use animo::{
    Animate, CompositeAnimator, DisplayMode, FigureConfig, FixedAxis, FrameText, HtmlOptions,
    ImageConfig, ImageFormat, ImageSeries, ImageStack, LegendLoc, LineAnimator, LineConfig,
    LineSeries, LineStyle, LoopMode, MultiLineAnimator, NormSpec, Playback, Styles,
};
use ndarray::{Array1, Array2, Array3};
use std::f64::consts::PI;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out = Path::new("animo_demo");
    std::fs::create_dir_all(out)?;

    // A travelling sine wave, x held at frame 0
    let x = Array1::linspace(0.0, 2.0 * PI, 120);
    let y = Array2::from_shape_fn((40, 120), |(i, j)| (x[j] - 0.15 * i as f64).sin());
    let line = LineConfig::default()
        .with_label("sin")
        .with_legend(LegendLoc::UpperRight, Some("wave"));
    let mut wave = LineAnimator::with_config(
        x.clone(),
        y.clone(),
        FixedAxis::X,
        line,
        FigureConfig::default().with_title("travelling wave"),
    )?;
    if let Playback::Raw(animation) = wave.play(DisplayMode::Raw)? {
        animation.save_gif(out.join("wave.gif"))?;
        println!("wave.gif: {} frames", animation.frame_count());
    }

    // Three phase-shifted waves on one axes
    let ys: Vec<Array2<f64>> = (0..3)
        .map(|k| y.mapv(|v| v * (1.0 - 0.25 * k as f64)))
        .collect();
    let styles = Styles::PerItem(vec![
        LineConfig::default(),
        LineConfig::default().with_linestyle(LineStyle::Dashed),
        LineConfig::default().with_linestyle(LineStyle::Dotted),
    ]);
    let mut waves = MultiLineAnimator::new(
        vec![x.clone(); 3],
        ys,
        FixedAxis::X,
        styles,
        FigureConfig::default(),
    )?;
    let player = waves
        .play(DisplayMode::Html(HtmlOptions {
            loop_mode: LoopMode::Reflect,
            autoplay: true,
        }))?
        .into_html();
    if let Some(player) = player {
        player.save(out.join("waves.html"))?;
        println!("waves.html: {} frames", player.frame_count());
    }

    // A diffusing Gaussian blob with a per-frame annotation
    let nframes = 24;
    let blob = Array3::from_shape_fn((nframes, 40, 50), |(k, i, j)| {
        let width = 4.0 + k as f64;
        let (di, dj) = (i as f64 - 20.0, j as f64 - 25.0);
        (-(di * di + dj * dj) / (2.0 * width * width)).exp() - 0.3
    });
    let labels = (0..nframes).map(|k| format!("t = {k}")).collect();
    let image = ImageConfig::default()
        .with_norm(NormSpec::midpoint(0.0, -0.3, 0.7))
        .with_labels("column", "row")
        .with_text(FrameText::PerFrame(labels))
        .with_colorbar(true);
    let image = ImageSeries::new(ImageStack::new(blob, 0)?, image)?;

    let track = Array2::from_shape_fn((nframes, 50), |(k, j)| {
        20.0 + 8.0 * ((j as f64) / 8.0 + k as f64 / 4.0).sin()
    });
    let line = LineSeries::new(
        Array1::range(0.0, 50.0, 1.0),
        track,
        FixedAxis::X,
        None,
        LineConfig::default().with_color("k".parse()?),
    )?;

    let mut composite =
        CompositeAnimator::new(image, line, FigureConfig::for_images().with_nframes(nframes))?;
    composite.view_frame(0, &out.join("composite_preview.png"))?;
    if let Some(animation) = composite.play(DisplayMode::Raw)?.into_animation() {
        let paths = animation.save_frames(out.join("composite"), ImageFormat::Png)?;
        println!("composite: {} png frames", paths.len());
    }

    Ok(())
}

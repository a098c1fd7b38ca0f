//! Subplot Grid Example
//!
//! A titled 2x2 grid mixing scatter, line, continuous and categorical histogram
//! charts, each laid out in its own 800x600 space and scaled into one canvas.
//!
//! Run with: `RUST_LOG=trueno_chart=debug cargo run --example subplot_grid`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trueno_chart::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trueno_chart=debug".into()),
        )
        .init();

    println!("Subplot Grid Example");
    println!("====================\n");

    let mut grid = SubplotGrid::new(2, 2, 1600, 1300, 0.04)?;
    grid.set_title("Training run overview");

    let scatter = grid.chart_mut(0, 0, ChartKind::Scatter)?;
    scatter.set_title("Embeddings");
    let points: Vec<Point> = (0..150)
        .map(|i| {
            let t = f64::from(i) * 0.1;
            Point::new(t.cos() * t, t.sin() * t)
        })
        .collect();
    scatter.add_series(Series::new("epoch 10", points, PlotStyle::from_name("tab:purple")))?;

    let line = grid.chart_mut(0, 1, ChartKind::Line)?;
    line.set_title("Loss");
    line.set_x_label("step");
    let train: Vec<Point> = (0..50)
        .map(|i| Point::new(f64::from(i), 2.0 / (1.0 + f64::from(i) * 0.2)))
        .collect();
    let valid: Vec<Point> = train.iter().map(|p| Point::new(p.x, p.y * 1.15 + 0.05)).collect();
    line.add_series(Series::new("train", train, PlotStyle::from_name("tab:blue")))?;
    line.add_series(Series::new(
        "validation",
        valid,
        PlotStyle::from_name("tab:orange").with_dash(LineDash::Dashed),
    ))?;
    line.add_horizontal_line(0.25)?;

    let hist = grid.chart_mut(1, 0, ChartKind::Histogram)?;
    hist.set_title("Gradient norms");
    let norms: Vec<f64> = (0..500)
        .map(|i| {
            let x = f64::from(i) / 500.0;
            (x * std::f64::consts::TAU).sin() * 0.5 + 1.0 + f64::from(i % 11) * 0.03
        })
        .collect();
    hist.add_histogram_values("norms", &norms)?;
    hist.add_vertical_line(1.0)?;

    let bars = grid.chart_mut(1, 1, ChartKind::Histogram)?;
    bars.set_title("Predicted classes");
    let palette = Palette::default();
    let styles: Vec<PlotStyle> = (0..4).map(|i| palette.auto_style(i)).collect();
    bars.add_categories(&[120, 75, 0, 33], &["cat", "dog", "bird", "fish"], &styles)?;
    bars.add_horizontal_line(100.0)?;

    let layout = grid.layout(&ApproxTextMetrics);
    println!("  Uniform scale: {:.3}", layout.scale);
    for cell in &layout.cells {
        println!(
            "  cell ({}, {}): offset ({:.1}, {:.1}) size {:.1}x{:.1}",
            cell.row, cell.col, cell.rect.x, cell.rect.y, cell.rect.width, cell.rect.height
        );
    }

    grid.try_save("subplot_grid.svg")?;
    if grid.save("subplot_grid.png") {
        println!("\nWrote subplot_grid.svg and subplot_grid.png");
    }
    Ok(())
}

//! Cluster Scatter Example
//!
//! Three synthetic clusters plus scattered outliers, a threshold line and a
//! custom-named cluster series, written as both SVG and PNG.
//!
//! Run with: `RUST_LOG=trueno_chart=debug cargo run --example cluster_scatter`

use std::collections::BTreeMap;

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

    println!("Cluster Scatter Example");
    println!("=======================\n");

    let (points, labels) = generate_clusters();
    println!("  Generated {} labeled points", points.len());

    let mut chart = Chart::scatter();
    chart.set_title("DBSCAN clusters");
    chart.set_x_label("feature 1");
    chart.set_y_label("feature 2");
    chart.add_cluster_points(&points, &labels)?;

    // A second pass with custom names for the same labels.
    let named = ClusterSeries::new("refined", &points[..30], &labels[..30])?
        .with_names(BTreeMap::from([(0, "core".to_string()), (1, "halo".to_string())]))
        .with_size(3.0);
    chart.add_clusters(named)?;

    chart.add_reference_line(ReferenceLine::horizontal(5.0).with_label("threshold"))?;

    println!("\nLegend rows:");
    for entry in chart.legend_entries() {
        println!("  {:<12} {:?}", entry.name, entry.symbol);
    }

    let bounds = chart.bounds().ok_or(Error::EmptyData)?;
    println!(
        "\nBounds: x [{:.2}, {:.2}], y [{:.2}, {:.2}]",
        bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y
    );
    println!("X ticks: {:?}", chart.x_ticks());

    chart.try_save("cluster_scatter.svg")?;
    chart.try_save("cluster_scatter.png")?;
    println!("\nWrote cluster_scatter.svg and cluster_scatter.png");
    Ok(())
}

/// Deterministic clusters around three centers plus a ring of outliers.
fn generate_clusters() -> (Vec<Point>, Vec<i32>) {
    let centers = [(2.0, 3.0), (7.0, 8.0), (8.0, 2.0)];
    let mut points = Vec::new();
    let mut labels = Vec::new();

    for (label, &(cx, cy)) in (0_i32..).zip(centers.iter()) {
        for i in 0..40 {
            let angle = f64::from(i) * 0.61;
            let radius = 0.3 + f64::from(i % 7) * 0.12;
            points.push(Point::new(cx + radius * angle.cos(), cy + radius * angle.sin()));
            labels.push(label);
        }
    }
    for i in 0..12 {
        let angle = f64::from(i) * std::f64::consts::TAU / 12.0;
        points.push(Point::new(5.0 + 5.5 * angle.cos(), 5.0 + 5.5 * angle.sin()));
        labels.push(-1);
    }
    (points, labels)
}

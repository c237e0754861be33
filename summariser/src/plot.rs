use std::path::Path;

use anyhow::Context;
use plotters::prelude::*;
use polars::prelude::*;

const PLOT_SIZE: (u32, u32) = (1000, 600);

/// Render the 50th/95th percentile response time series against timestamp as a PNG.
///
/// The caller has already checked that the history frame has rows.
pub(crate) fn render_percentile_plot(history: &DataFrame, path: &Path) -> anyhow::Result<()> {
    let points = percentile_points(history)?;
    if points.is_empty() {
        anyhow::bail!("History artifact has no usable percentile rows");
    }

    let (x_min, x_max) = padded_bounds(points.iter().map(|point| point.0));
    let y_max = points
        .iter()
        .map(|point| point.1.max(point.2))
        .fold(0.0f64, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Response Time Percentiles Over Time", ("sans-serif", 30))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc("Response Time (ms)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            points.iter().map(|point| (point.0, point.1)),
            &BLUE,
        ))?
        .label("50th Percentile")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .draw_series(LineSeries::new(
            points.iter().map(|point| (point.0, point.2)),
            &RED,
        ))?
        .label("95th Percentile")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()
        .with_context(|| format!("Failed to write plot to {}", path.display()))?;

    Ok(())
}

/// Extract `(timestamp, 50%, 95%)` rows, dropping rows where any of the three is null.
fn percentile_points(history: &DataFrame) -> anyhow::Result<Vec<(f64, f64, f64)>> {
    let timestamps = numeric_column(history, "Timestamp")?;
    let p50 = numeric_column(history, "50%")?;
    let p95 = numeric_column(history, "95%")?;

    Ok(timestamps
        .into_iter()
        .zip(p50)
        .zip(p95)
        .filter_map(|((timestamp, p50), p95)| Some((timestamp?, p50?, p95?)))
        .collect())
}

fn numeric_column(frame: &DataFrame, name: &str) -> anyhow::Result<Vec<Option<f64>>> {
    let series = frame
        .column(name)
        .with_context(|| format!("History artifact is missing the `{name}` column"))?
        .as_materialized_series()
        .cast(&DataType::Float64)
        .with_context(|| format!("History artifact column `{name}` is not numeric"))?;

    Ok(series.f64()?.into_iter().collect())
}

fn padded_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
    for value in values {
        min = min.min(value);
        max = max.max(value);
    }

    // A single sample would otherwise produce a degenerate axis.
    if (max - min).abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_with_nulls_are_dropped() {
        let history = df!(
            "Timestamp" => [Some(1i64), Some(2), Some(3)],
            "50%" => [Some(10.0f64), None, Some(12.0)],
            "95%" => [Some(40.0f64), Some(41.0), Some(44.0)],
        )
        .unwrap();

        let points = percentile_points(&history).unwrap();

        assert_eq!(points, vec![(1.0, 10.0, 40.0), (3.0, 12.0, 44.0)]);
    }

    #[test]
    fn missing_percentile_column_is_an_error() {
        let history = df!("Timestamp" => [1i64, 2]).unwrap();

        let err = percentile_points(&history).unwrap_err();

        assert!(err.to_string().contains("50%"));
    }

    #[test]
    fn single_sample_bounds_are_padded() {
        assert_eq!(padded_bounds([5.0].into_iter()), (4.0, 6.0));
        assert_eq!(padded_bounds([1.0, 3.0].into_iter()), (1.0, 3.0));
    }
}

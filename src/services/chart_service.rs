use tracing::debug;

use crate::models::analytics::{FeedbackSummary, BUCKET_LABELS};
use crate::models::chart::{
    AxisSpec, BarChartSpec, ChartSpec, LineChartSpec, RadarChartSpec, Series,
};
use crate::models::feedback::Dimension;

pub const COMPARATIVE_MOUNT: &str = "comparativeChart";
pub const WEEKLY_TREND_MOUNT: &str = "weeklyTrendChart";

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

// Illustrative series only; not derived from stored feedback.
const WEEKLY_TREND: [(Dimension, [f64; 7]); 5] = [
    (Dimension::Overall, [4.2, 4.4, 4.1, 4.5, 4.3, 4.6, 4.2]),
    (Dimension::Quality, [4.3, 4.5, 4.2, 4.6, 4.4, 4.7, 4.3]),
    (Dimension::Hygiene, [4.6, 4.7, 4.5, 4.8, 4.6, 4.9, 4.5]),
    (Dimension::Quantity, [4.5, 4.6, 4.4, 4.7, 4.5, 4.8, 4.4]),
    (Dimension::Temperature, [4.0, 4.2, 3.9, 4.3, 4.1, 4.4, 4.0]),
];

/// Somewhere charts can be drawn, addressed by mount id.
pub trait ChartSurface {
    fn has_mount(&self, mount_id: &str) -> bool;

    fn draw(&mut self, chart: ChartSpec);
}

pub fn dimension_mount(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Overall => "overallChart",
        Dimension::Quality => "qualityChart",
        Dimension::Hygiene => "hygieneChart",
        Dimension::Quantity => "quantityChart",
        Dimension::Temperature => "temperatureChart",
    }
}

pub fn dimension_chart(summary: &FeedbackSummary, dimension: Dimension) -> ChartSpec {
    let counts = summary.histogram(dimension).counts();
    ChartSpec::Bar(BarChartSpec {
        mount_id: dimension_mount(dimension).to_string(),
        title: format!("{} Rating", dimension.label()),
        labels: BUCKET_LABELS.iter().map(|label| label.to_string()).collect(),
        dataset: Series {
            label: "Number of Responses".to_string(),
            data: counts.iter().map(|count| f64::from(*count)).collect(),
        },
        y_axis: AxisSpec {
            begin_at_zero: true,
            min: None,
            max: None,
            step_size: 1.0,
        },
    })
}

pub fn comparative_chart(summary: &FeedbackSummary) -> ChartSpec {
    ChartSpec::Radar(RadarChartSpec {
        mount_id: COMPARATIVE_MOUNT.to_string(),
        labels: dimension_labels(),
        dataset: Series {
            label: "Average Scores".to_string(),
            data: summary.averages().to_vec(),
        },
        radial_axis: AxisSpec {
            begin_at_zero: true,
            min: Some(0.0),
            max: Some(5.0),
            step_size: 1.0,
        },
    })
}

pub fn weekly_trend_chart() -> ChartSpec {
    ChartSpec::Line(LineChartSpec {
        mount_id: WEEKLY_TREND_MOUNT.to_string(),
        labels: WEEKDAY_LABELS.iter().map(|day| day.to_string()).collect(),
        datasets: WEEKLY_TREND
            .iter()
            .map(|(dimension, values)| Series {
                label: dimension.label().to_string(),
                data: values.to_vec(),
            })
            .collect(),
        y_axis: AxisSpec {
            begin_at_zero: false,
            min: Some(3.5),
            max: Some(5.0),
            step_size: 0.5,
        },
    })
}

/// Every chart of the analytics view, in drawing order.
pub fn build_charts(summary: &FeedbackSummary) -> Vec<ChartSpec> {
    let mut charts: Vec<ChartSpec> = Dimension::ALL
        .into_iter()
        .map(|dimension| dimension_chart(summary, dimension))
        .collect();
    charts.push(comparative_chart(summary));
    charts.push(weekly_trend_chart());
    charts
}

/// Draws each chart whose mount point exists; returns the mounts drawn.
pub fn render_charts(surface: &mut dyn ChartSurface, summary: &FeedbackSummary) -> Vec<String> {
    let mut drawn = Vec::new();
    for chart in build_charts(summary) {
        let mount_id = chart.mount_id().to_string();
        if !surface.has_mount(&mount_id) {
            debug!(target: "app::charts", %mount_id, "mount point missing; chart skipped");
            continue;
        }
        surface.draw(chart);
        drawn.push(mount_id);
    }
    drawn
}

fn dimension_labels() -> Vec<String> {
    Dimension::ALL
        .iter()
        .map(|dimension| dimension.label().to_string())
        .collect()
}

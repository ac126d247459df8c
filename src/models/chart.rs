use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AxisSpec {
    pub begin_at_zero: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub step_size: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub label: String,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarChartSpec {
    pub mount_id: String,
    pub title: String,
    pub labels: Vec<String>,
    pub dataset: Series,
    pub y_axis: AxisSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RadarChartSpec {
    pub mount_id: String,
    pub labels: Vec<String>,
    pub dataset: Series,
    pub radial_axis: AxisSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineChartSpec {
    pub mount_id: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Series>,
    pub y_axis: AxisSpec,
}

/// Plain description of one chart; the presentation layer draws it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartSpec {
    Bar(BarChartSpec),
    Radar(RadarChartSpec),
    Line(LineChartSpec),
}

impl ChartSpec {
    pub fn mount_id(&self) -> &str {
        match self {
            ChartSpec::Bar(spec) => &spec.mount_id,
            ChartSpec::Radar(spec) => &spec.mount_id,
            ChartSpec::Line(spec) => &spec.mount_id,
        }
    }
}

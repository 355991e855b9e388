//! Chart descriptions in the shape Plotly.js accepts as `{data, layout}`.

use serde::Serialize;

use crate::models::{DisplayOption, Series};
use crate::regression::linear_fit;

/// Plotly's default qualitative palette, cycled per series.
pub const PALETTE: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    /// A chart with no traces and no layout, rendered blank.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Bar,
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<BarMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    pub x: f64,
    pub xanchor: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    pub title: AxisTitle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickformat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryorder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryarray: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AxisTitle {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    Group,
}

/// Layout settings applied after the defaults.
#[derive(Debug, Clone, Default)]
pub struct LayoutOverrides {
    pub barmode: Option<BarMode>,
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone)]
pub struct ChartSpec<'a> {
    pub categories: &'a [String],
    pub series: &'a [Series],
    pub title: &'a str,
    pub x_title: &'a str,
    pub y_title: &'a str,
    pub options: &'a [DisplayOption],
    pub category_order: Option<&'a [String]>,
    pub overrides: LayoutOverrides,
}

pub fn build_figure(spec: &ChartSpec<'_>) -> Figure {
    let show = |option: DisplayOption| spec.options.contains(&option);
    let show_numbers = show(DisplayOption::Numbers);
    let mut data = Vec::new();

    for (series, color) in spec.series.iter().zip(PALETTE.iter().cycle()) {
        let text = show_numbers.then(|| {
            series
                .values
                .iter()
                .map(|value| format!("{value:.2}%"))
                .collect::<Vec<_>>()
        });
        let hovertemplate = format!(
            "<b>{}</b><br>{}: %{{x}}<br>{}: %{{y:.2f}}%<extra></extra>",
            series.label, spec.x_title, spec.y_title
        );

        if show(DisplayOption::Bar) {
            data.push(Trace {
                kind: TraceKind::Bar,
                name: series.label.clone(),
                x: spec.categories.to_vec(),
                y: series.values.clone(),
                mode: None,
                text: text.clone(),
                textposition: Some(if show_numbers { "auto" } else { "none" }.to_string()),
                marker: Some(Marker {
                    color: color.to_string(),
                    size: None,
                }),
                line: None,
                hovertemplate: Some(hovertemplate.clone()),
                hoverinfo: None,
            });
        }

        if show(DisplayOption::Distribution) {
            let mode = if show_numbers {
                "lines+markers+text"
            } else {
                "lines+markers"
            };
            data.push(Trace {
                kind: TraceKind::Scatter,
                name: format!("Scatter Plot ({})", series.label),
                x: spec.categories.to_vec(),
                y: series.values.clone(),
                mode: Some(mode.to_string()),
                text: text.clone(),
                textposition: Some("top center".to_string()),
                marker: Some(Marker {
                    color: color.to_string(),
                    size: Some(8),
                }),
                line: Some(Line {
                    color: color.to_string(),
                    dash: None,
                }),
                hovertemplate: Some(hovertemplate),
                hoverinfo: None,
            });
        }

        if show(DisplayOption::Trendline) {
            if let Some(trace) = trendline(spec.categories, series, color) {
                data.push(trace);
            }
        }
    }

    let category_order = spec.category_order.map(<[String]>::to_vec);
    let layout = Layout {
        title: Some(Title {
            text: spec.title.to_string(),
            x: 0.5,
            xanchor: "center".to_string(),
        }),
        xaxis: Some(Axis {
            title: AxisTitle {
                text: spec.x_title.to_string(),
            },
            categoryorder: category_order.as_ref().map(|_| "array".to_string()),
            categoryarray: category_order,
            ..Axis::default()
        }),
        yaxis: Some(Axis {
            title: AxisTitle {
                text: spec.y_title.to_string(),
            },
            range: Some([0.0, 100.0]),
            tickformat: Some(".2f".to_string()),
            ..Axis::default()
        }),
        hovermode: Some("x unified".to_string()),
        barmode: spec.overrides.barmode,
    };

    Figure { data, layout }
}

/// Linear trend over the positions of the non-zero points of `series`.
fn trendline(categories: &[String], series: &Series, color: &str) -> Option<Trace> {
    let valid: Vec<(usize, f64)> = series
        .values
        .iter()
        .copied()
        .enumerate()
        .filter(|(index, value)| *index < categories.len() && value.is_finite() && *value != 0.0)
        .collect();

    let points: Vec<(f64, f64)> = valid.iter().map(|&(i, v)| (i as f64, v)).collect();
    let fit = linear_fit(&points)?;

    Some(Trace {
        kind: TraceKind::Scatter,
        name: format!("Trendline ({})", series.label),
        x: valid.iter().map(|&(i, _)| categories[i].clone()).collect(),
        y: valid.iter().map(|&(i, _)| fit.at(i as f64)).collect(),
        mode: Some("lines".to_string()),
        text: None,
        textposition: None,
        marker: None,
        line: Some(Line {
            color: color.to_string(),
            dash: Some("dot".to_string()),
        }),
        hovertemplate: None,
        hoverinfo: Some("skip".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<String> {
        ["08:30", "09:00", "09:30", "10:00"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn series(label: &str, values: &[f64]) -> Series {
        Series {
            label: label.to_string(),
            values: values.to_vec(),
        }
    }

    fn spec<'a>(
        categories: &'a [String],
        series: &'a [Series],
        options: &'a [DisplayOption],
    ) -> ChartSpec<'a> {
        ChartSpec {
            categories,
            series,
            title: "Trend",
            x_title: "Time Slot",
            y_title: "Percentage",
            options,
            category_order: Some(categories),
            overrides: LayoutOverrides::default(),
        }
    }

    #[test]
    fn bar_only_by_default_with_pinned_axis() {
        let cats = categories();
        let data = [series("Jan - Received", &[10.0, 20.0, 0.0, 40.0])];
        let figure = build_figure(&spec(&cats, &data, &[DisplayOption::Bar]));

        assert_eq!(figure.data.len(), 1);
        let bar = &figure.data[0];
        assert_eq!(bar.kind, TraceKind::Bar);
        assert_eq!(bar.text, None);
        assert_eq!(bar.textposition.as_deref(), Some("none"));
        let yaxis = figure.layout.yaxis.as_ref().unwrap();
        assert_eq!(yaxis.range, Some([0.0, 100.0]));
        let xaxis = figure.layout.xaxis.as_ref().unwrap();
        assert_eq!(xaxis.categoryorder.as_deref(), Some("array"));
        assert_eq!(xaxis.categoryarray.as_deref(), Some(cats.as_slice()));
    }

    #[test]
    fn numbers_label_bars_and_points() {
        let cats = categories();
        let data = [series("2024 - Received", &[12.5, 0.0, 50.0, 100.0])];
        let figure = build_figure(&spec(
            &cats,
            &data,
            &[DisplayOption::Bar, DisplayOption::Distribution, DisplayOption::Numbers],
        ));

        assert_eq!(figure.data.len(), 2);
        let text = figure.data[0].text.as_ref().unwrap();
        assert_eq!(text[0], "12.50%");
        assert_eq!(figure.data[0].textposition.as_deref(), Some("auto"));
        let scatter = &figure.data[1];
        assert_eq!(scatter.name, "Scatter Plot (2024 - Received)");
        assert_eq!(scatter.mode.as_deref(), Some("lines+markers+text"));
    }

    #[test]
    fn trendline_fits_positional_indices_of_nonzero_points() {
        let cats = categories();
        let data = [series("Mon - Received", &[10.0, 0.0, 30.0, 40.0])];
        let figure = build_figure(&spec(&cats, &data, &[DisplayOption::Trendline]));

        assert_eq!(figure.data.len(), 1);
        let trend = &figure.data[0];
        assert_eq!(trend.name, "Trendline (Mon - Received)");
        assert_eq!(trend.x, vec!["08:30", "09:30", "10:00"]);
        assert_eq!(trend.hoverinfo.as_deref(), Some("skip"));
        assert_eq!(trend.line.as_ref().unwrap().dash.as_deref(), Some("dot"));
        // Points (0,10), (2,30), (3,40) lie on y = 10x + 10.
        for (y, expected) in trend.y.iter().zip([10.0, 30.0, 40.0]) {
            assert!((y - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn trendline_omitted_with_single_valid_point() {
        let cats = categories();
        let data = [series("Jan - Received", &[0.0, 55.0, 0.0, 0.0])];
        let figure = build_figure(&spec(
            &cats,
            &data,
            &[DisplayOption::Bar, DisplayOption::Trendline],
        ));
        assert_eq!(figure.data.len(), 1);
        assert_eq!(figure.data[0].kind, TraceKind::Bar);
    }

    #[test]
    fn colors_cycle_through_palette() {
        let cats = categories();
        let data: Vec<Series> = (0..11)
            .map(|i| series(&format!("s{i}"), &[1.0, 2.0, 3.0, 4.0]))
            .collect();
        let figure = build_figure(&spec(&cats, &data, &[DisplayOption::Bar]));
        let color = |i: usize| figure.data[i].marker.as_ref().unwrap().color.clone();
        assert_eq!(color(0), PALETTE[0]);
        assert_eq!(color(10), PALETTE[0]);
        assert_eq!(color(1), PALETTE[1]);
    }

    #[test]
    fn overrides_and_serialization() {
        let cats = categories();
        let data = [series("2023 - Received", &[1.0, 2.0, 3.0, 4.0])];
        let mut chart = spec(&cats, &data, &[DisplayOption::Bar]);
        chart.overrides = LayoutOverrides {
            barmode: Some(BarMode::Group),
        };
        let figure = build_figure(&chart);
        let json = serde_json::to_value(&figure).unwrap();
        assert_eq!(json["layout"]["barmode"], "group");
        assert_eq!(json["data"][0]["type"], "bar");
        assert_eq!(json["layout"]["hovermode"], "x unified");
        assert!(json["data"][0].get("hoverinfo").is_none());
    }

    #[test]
    fn empty_figure_serializes_blank() {
        let json = serde_json::to_value(Figure::empty()).unwrap();
        assert_eq!(json, serde_json::json!({ "data": [], "layout": {} }));
    }
}

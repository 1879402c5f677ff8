use crate::utils::finite_min_and_max;
use chrono::prelude::*;
use plotly::color::Rgb;
use plotly::common::{DashType, Line, Mode, Title};
use plotly::layout::{Axis, AxisType, Layout};
use plotly::{Plot, Scatter};
use tracing::info;

// Ten-colors qualitative cycle, assigned to the series in insertion order.
pub const COLOR_CYCLE: [SeriesColor; 10] = [
    SeriesColor(31, 119, 180),
    SeriesColor(255, 127, 14),
    SeriesColor(44, 160, 44),
    SeriesColor(214, 39, 40),
    SeriesColor(148, 103, 189),
    SeriesColor(140, 86, 75),
    SeriesColor(227, 119, 194),
    SeriesColor(127, 127, 127),
    SeriesColor(188, 189, 34),
    SeriesColor(23, 190, 207),
];

/// Fraction of the data span added above the highest value.
const Y_MARGIN: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColor(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    pub color: SeriesColor,
    pub stroke: Stroke,
    pub in_legend: bool,
}

/// A line chart of date series, independent of the plotting backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub y_min: Option<f64>,
    pub series: Vec<Series>,
}

impl Chart {
    pub fn new(title: &str) -> Chart {
        Chart {
            title: title.to_string(),
            y_min: None,
            series: Vec::new(),
        }
    }

    /// Add a solid line shown in the legend,
    /// its color is the next one in the cycle and is returned
    /// so that related series can share it.
    pub fn line(&mut self, label: &str, x: Vec<NaiveDate>, y: Vec<f64>) -> SeriesColor {
        let n_legend = self.series.iter().filter(|s| s.in_legend).count();
        let color = COLOR_CYCLE[n_legend % COLOR_CYCLE.len()];
        self.series.push(Series {
            label: label.to_string(),
            x,
            y,
            color,
            stroke: Stroke::Solid,
            in_legend: true,
        });
        color
    }

    /// Add a dashed line with the given color, not listed in the legend.
    pub fn dashed_line(&mut self, label: &str, x: Vec<NaiveDate>, y: Vec<f64>, color: SeriesColor) {
        self.series.push(Series {
            label: label.to_string(),
            x,
            y,
            color,
            stroke: Stroke::Dashed,
            in_legend: false,
        });
    }

    /// Fix the lower bound of the y axis, the upper bound stays automatic.
    pub fn y_min(&mut self, y_min: f64) -> &mut Self {
        self.y_min = Some(y_min);
        self
    }

    pub fn legend_labels(&self) -> Vec<&str> {
        self.series
            .iter()
            .filter(|s| s.in_legend)
            .map(|s| s.label.as_str())
            .collect()
    }

    /// The y axis range: the fixed lower bound, or the data minimum,
    /// and the data maximum plus a margin proportional to the data span.
    pub fn y_range(&self) -> (f64, f64) {
        let Some((data_min, data_max)) =
            finite_min_and_max(self.series.iter().flat_map(|s| s.y.iter()))
        else {
            let ymin = self.y_min.unwrap_or(0.);
            return (ymin, ymin + 1.);
        };
        let ymin = self.y_min.unwrap_or(data_min);
        let span = data_max - data_min;
        let ymax = if span > 0. {
            data_max + span * Y_MARGIN
        } else {
            data_max + data_max.abs() * Y_MARGIN
        };
        if ymax > ymin {
            (ymin, ymax)
        } else {
            (ymin, ymin + 1.)
        }
    }

    /// Build the plotly figure, dates are passed as ISO 8601 strings.
    pub fn to_plot(&self) -> Plot {
        let mut plot = Plot::new();
        for s in self.series.iter() {
            let x: Vec<String> = s.x.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect();
            let SeriesColor(r, g, b) = s.color;
            let mut line = Line::new().color(Rgb::new(r, g, b)).width(2.);
            if s.stroke == Stroke::Dashed {
                line = line.dash(DashType::Dash);
            }
            let trace = Scatter::new(x, s.y.clone())
                .name(&s.label)
                .mode(Mode::Lines)
                .line(line)
                .show_legend(s.in_legend);
            plot.add_trace(trace);
        }
        let (ymin, ymax) = self.y_range();
        let layout = Layout::new()
            .title(Title::new(&self.title))
            .show_legend(true)
            .x_axis(Axis::new().type_(AxisType::Date))
            .y_axis(Axis::new().range(vec![ymin, ymax]));
        plot.set_layout(layout);
        plot
    }

    /// Open the chart in the default viewer.
    pub fn show(&self) {
        info!(title = %self.title, series = self.series.len(), "showing chart");
        self.to_plot().show();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: u32) -> Vec<NaiveDate> {
        (1..=n)
            .map(|m| NaiveDate::from_ymd_opt(2023, m, 1).unwrap())
            .collect()
    }

    #[test]
    fn colors_cycle_over_legend_series() {
        let mut chart = Chart::new("colors");
        let c0 = chart.line("a", dates(2), vec![1., 2.]);
        chart.dashed_line("a trend", dates(2), vec![1., 2.], c0);
        let c1 = chart.line("b", dates(2), vec![1., 2.]);
        assert_eq!(c0, COLOR_CYCLE[0]);
        assert_eq!(c1, COLOR_CYCLE[1]);
        assert_eq!(chart.series[1].color, c0);
        assert_eq!(chart.series[1].stroke, Stroke::Dashed);
        assert_eq!(chart.legend_labels(), vec!["a", "b"]);
    }

    #[test]
    fn y_range_from_zero_with_margin() {
        let mut chart = Chart::new("range");
        chart.line("a", dates(3), vec![100., 150., 200.]);
        chart.y_min(0.);
        let (ymin, ymax) = chart.y_range();
        assert_eq!(ymin, 0.);
        assert!((ymax - 205.).abs() < 1e-9);
    }

    #[test]
    fn y_range_of_constant_series() {
        let mut chart = Chart::new("flat");
        chart.line("a", dates(3), vec![50.; 3]);
        chart.y_min(0.);
        let (ymin, ymax) = chart.y_range();
        assert_eq!(ymin, 0.);
        assert!(ymax > 50.);
    }

    #[test]
    fn y_range_without_data() {
        let mut chart = Chart::new("empty");
        chart.y_min(0.);
        assert_eq!(chart.y_range(), (0., 1.));
    }

    #[test]
    fn plotly_figure_has_all_traces() {
        let mut chart = Chart::new("98052: median_sale_price");
        let c = chart.line("AllTypes", dates(2), vec![100., 110.]);
        chart.dashed_line("AllTypes trend", dates(2), vec![100., 110.], c);
        chart.y_min(0.);
        let json: serde_json::Value = serde_json::from_str(&chart.to_plot().to_json()).unwrap();
        let data = json["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["name"], "AllTypes");
        assert_eq!(data[0]["x"][0], "2023-01-01");
        assert_eq!(data[1]["line"]["dash"], "dash");
        assert_eq!(json["layout"]["yaxis"]["range"][0], 0.0);
    }
}

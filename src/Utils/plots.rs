//! Rendering of sampled functions: PNG charts through plotters, value tables through tabled.
use crate::error::{FormatError, MathError, Result};
use crate::numerical::function_analysis::{Analysis, Samples};
use crate::symbolic::utils::format_number;
use log::info;
use plotters::prelude::*;
use std::path::Path;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// A point drawn on top of the curve: root, extremum or inflection.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkedPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

/// Everything a renderer needs to draw one function.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub arg: String,
    pub color: RGBColor,
    pub samples: Samples,
    pub marked: Vec<MarkedPoint>,
}

impl ChartData {
    pub fn from_samples(title: &str, samples: Samples, color: RGBColor) -> Self {
        ChartData {
            title: title.to_string(),
            arg: "x".to_string(),
            color,
            samples,
            marked: Vec::new(),
        }
    }

    /// the curve plus its roots, critical points and inflection points
    pub fn from_analysis(analysis: &Analysis, color: RGBColor) -> Self {
        let mut marked: Vec<MarkedPoint> = analysis
            .roots
            .iter()
            .map(|&x| MarkedPoint {
                x,
                y: 0.0,
                label: "root".to_string(),
            })
            .collect();
        marked.extend(analysis.critical_points.iter().map(|p| MarkedPoint {
            x: p.x,
            y: p.y,
            label: p.kind.to_string(),
        }));
        marked.extend(analysis.inflection_points.iter().map(|p| MarkedPoint {
            x: p.x,
            y: p.y,
            label: "Inflection".to_string(),
        }));
        ChartData {
            title: format!("f({}) = {}", analysis.variable, analysis.function),
            arg: analysis.variable.clone(),
            color,
            samples: analysis.samples.clone(),
            marked,
        }
    }

    /// x and y ranges with a margin; a curve without finite values gets [-1, 1] for y
    fn ranges(&self) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
        let x = &self.samples.x;
        let (x_min, x_max) = match (x.first(), x.last()) {
            (Some(a), Some(b)) if a < b => (*a, *b),
            _ => (-1.0, 1.0),
        };
        let (y_min, y_max) = self.samples.y_range().unwrap_or((-1.0, 1.0));
        let pad = if y_max > y_min {
            0.05 * (y_max - y_min)
        } else {
            1.0
        };
        (x_min..x_max, (y_min - pad)..(y_max + pad))
    }
}

/// Draws a chart into a file.
pub trait ChartRenderer {
    fn render(&self, chart: &ChartData, path: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Copy)]
pub struct PlottersRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        PlottersRenderer {
            width: 800,
            height: 600,
        }
    }
}

fn drawing_error<E: std::fmt::Display>(e: E) -> MathError {
    MathError::Io(e.to_string())
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, chart_data: &ChartData, path: &Path) -> Result<()> {
        let (x_range, y_range) = chart_data.ranges();
        let root_area = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root_area.fill(&WHITE).map_err(drawing_error)?;

        let mut chart = ChartBuilder::on(&root_area)
            .caption(&chart_data.title, ("sans-serif", 30))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(30)
            .build_cartesian_2d(x_range.clone(), y_range.clone())
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .x_desc(&chart_data.arg)
            .y_desc("y")
            .draw()
            .map_err(drawing_error)?;

        // axes through the origin
        if y_range.contains(&0.0) {
            chart
                .draw_series(LineSeries::new(
                    vec![(x_range.start, 0.0), (x_range.end, 0.0)],
                    &BLACK,
                ))
                .map_err(drawing_error)?;
        }
        if x_range.contains(&0.0) {
            chart
                .draw_series(LineSeries::new(
                    vec![(0.0, y_range.start), (0.0, y_range.end)],
                    &BLACK,
                ))
                .map_err(drawing_error)?;
        }

        let color = chart_data.color;
        // the curve is broken wherever a value is missing
        for (i, segment) in chart_data.samples.segments().into_iter().enumerate() {
            let series = chart
                .draw_series(LineSeries::new(segment, &color))
                .map_err(drawing_error)?;
            if i == 0 {
                series
                    .label(chart_data.title.clone())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
            }
        }

        if !chart_data.marked.is_empty() {
            chart
                .draw_series(
                    chart_data
                        .marked
                        .iter()
                        .map(|p| Circle::new((p.x, p.y), 5, RED.filled())),
                )
                .map_err(drawing_error)?;
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(drawing_error)?;
        root_area.present().map_err(drawing_error)?;
        info!("chart '{}' saved to {}", chart_data.title, path.display());
        Ok(())
    }
}

#[derive(Tabled)]
struct SampleRow {
    x: String,
    #[tabled(rename = "f(x)")]
    y: String,
}

/// Every `every`-th sample as a table; missing values are shown as "—".
pub fn value_table(samples: &Samples, every: usize) -> String {
    let rows: Vec<SampleRow> = samples
        .x
        .iter()
        .zip(samples.y.iter())
        .step_by(every.max(1))
        .map(|(x, y)| SampleRow {
            x: format_number(*x, 4),
            y: if y.is_finite() {
                format_number(*y, 4)
            } else {
                "—".to_string()
            },
        })
        .collect();
    let mut table = Table::new(&rows);
    table.with(Style::modern_rounded());
    table.to_string()
}

/// `#rrggbb`, or a color name in English or Arabic.
pub fn parse_color(text: &str) -> Result<RGBColor> {
    let text = text.trim();
    let invalid = || {
        MathError::Format(FormatError::InvalidSetting {
            key: "color".to_string(),
            reason: format!("'{}' is neither #rrggbb nor a known color name", text),
        })
    };
    if let Some(hex) = text.strip_prefix('#') {
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        return Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?));
    }
    let color = match text.to_lowercase().as_str() {
        "red" | "أحمر" => RED,
        "green" | "أخضر" => RGBColor(0, 128, 0),
        "blue" | "أزرق" => BLUE,
        "black" | "أسود" => BLACK,
        "cyan" => CYAN,
        "magenta" => MAGENTA,
        "yellow" | "أصفر" => YELLOW,
        "orange" | "برتقالي" => RGBColor(255, 165, 0),
        "purple" | "بنفسجي" => RGBColor(128, 0, 128),
        "gray" | "grey" | "رمادي" => RGBColor(128, 128, 128),
        _ => return Err(invalid()),
    };
    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::function_analysis::{Domain, FunctionAnalyzer};
    use tempfile::tempdir;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#1f77b4").unwrap(), RGBColor(0x1f, 0x77, 0xb4));
        assert_eq!(parse_color("Red").unwrap(), RED);
        assert_eq!(parse_color("أزرق").unwrap(), BLUE);
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#gggggg").is_err());
        assert!(parse_color("chartreuse").is_err());
    }

    #[test]
    fn test_value_table_marks_missing_values() {
        let samples = FunctionAnalyzer::new("sqrt(x)")
            .unwrap()
            .sample(&Domain::new(-4.0, 4.0).unwrap(), 9);
        let table = value_table(&samples, 4);
        assert!(table.contains("f(x)"));
        assert!(table.contains("—"));
        assert!(table.contains('2'));
        // rows for x = -4, 0, 4 plus header and borders
        assert_eq!(table.lines().filter(|l| l.contains('│')).count(), 4);
    }

    #[test]
    fn test_chart_data_from_analysis() {
        let analysis = FunctionAnalyzer::new("x^2 - 1")
            .unwrap()
            .analyze(&Domain::default(), 100);
        let chart = ChartData::from_analysis(&analysis, BLUE);
        assert_eq!(chart.title, "f(x) = x**2 - 1");
        // two roots and one minimum
        assert_eq!(chart.marked.len(), 3);
        let (x, y) = chart.ranges();
        assert_eq!(x, -10.0..10.0);
        assert!(y.start < -1.0 && y.end > 99.0);
    }

    #[test]
    fn test_render_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let samples = FunctionAnalyzer::new("1/x")
            .unwrap()
            .sample(&Domain::new(-1.0, 1.0).unwrap(), 21);
        let chart = ChartData::from_samples("1/x", samples, RED);
        match PlottersRenderer::default().render(&chart, &path) {
            Ok(()) => assert!(path.exists()),
            // no system font available for the caption
            Err(MathError::Io(_)) => {}
            Err(e) => panic!("unexpected error {}", e),
        }
    }
}

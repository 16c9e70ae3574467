//! Digitization of a curve drawn by hand on a canvas.
//!
//! The canvas is a raw pixel buffer; stroke pixels are mapped into the plot window, reduced to
//! one point per x column and joined by a spline, so the drawing can be sampled like any typed
//! function.
use crate::error::{DomainError, MathError, Result};
use crate::numerical::function_analysis::{Domain, Samples};
use itertools::Itertools;
use log::info;
use splines::{Interpolation, Key, Spline};

/// Row-major canvas pixels, `channels` bytes per pixel: 1 for gray, 4 for RGBA.
/// Only built through [`PixelBuffer::new`] and [`PixelBuffer::blank`], so the size always matches.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

/// The region of the plane the canvas covers. Row 0 is the top edge, at `y_max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewWindow {
    pub x: Domain,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for ViewWindow {
    fn default() -> Self {
        ViewWindow {
            x: Domain::default(),
            y_min: -10.0,
            y_max: 10.0,
        }
    }
}

impl ViewWindow {
    pub fn new(x: Domain, y_min: f64, y_max: f64) -> Result<ViewWindow> {
        Domain::new(y_min, y_max)?;
        Ok(ViewWindow { x, y_min, y_max })
    }
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<PixelBuffer> {
        if channels != 1 && channels != 4 {
            return Err(MathError::unsupported(format!(
                "{} channels per pixel, expected 1 (gray) or 4 (RGBA)",
                channels
            )));
        }
        let expected = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(channels));
        if width == 0 || height == 0 || expected != Some(data.len()) {
            return Err(DomainError::PixelBufferSize {
                width,
                height,
                channels,
                len: data.len(),
            }
            .into());
        }
        Ok(PixelBuffer {
            width,
            height,
            channels,
            data,
        })
    }

    /// white gray canvas
    pub fn blank(width: usize, height: usize) -> PixelBuffer {
        PixelBuffer {
            width,
            height,
            channels: 1,
            data: vec![u8::MAX; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Marks one pixel as stroke: black for gray, opaque black for RGBA. Outside the canvas
    /// nothing happens.
    pub fn paint(&mut self, col: usize, row: usize) {
        if col >= self.width || row >= self.height {
            return;
        }
        let channels = self.channels;
        let offset = (row * self.width + col) * channels;
        if let Some(pixel) = self.data.get_mut(offset..offset + channels) {
            pixel.fill(0);
            if channels == 4 {
                pixel[3] = u8::MAX;
            }
        }
    }

    fn is_stroke(&self, row: usize, col: usize, threshold: u8) -> bool {
        let offset = (row * self.width + col) * self.channels;
        match self.channels {
            4 => self.data.get(offset + 3).is_some_and(|a| *a > threshold),
            _ => self.data.get(offset).is_some_and(|v| *v < threshold),
        }
    }

    /// Plane coordinates of every stroke pixel. RGBA pixels are strokes when their alpha is
    /// above `threshold`, gray pixels when they are darker than `threshold`.
    pub fn point_cloud(&self, view: &ViewWindow, threshold: u8) -> Vec<(f64, f64)> {
        let scale = |index: usize, count: usize| {
            if count > 1 {
                index as f64 / (count - 1) as f64
            } else {
                0.0
            }
        };
        let mut points = Vec::new();
        for row in 0..self.height {
            for col in 0..self.width {
                if self.is_stroke(row, col, threshold) {
                    let x = view.x.start + scale(col, self.width) * view.x.width();
                    let y = view.y_max - scale(row, self.height) * (view.y_max - view.y_min);
                    points.push((x, y));
                }
            }
        }
        points
    }
}

/// A hand-drawn curve as a function of x.
#[derive(Debug, Clone)]
pub struct DigitizedCurve {
    spline: Spline<f64, f64>,
    /// one (x, mean y) per distinct x, ascending
    pub knots: Vec<(f64, f64)>,
}

impl DigitizedCurve {
    /// Fits the curve through a point cloud. Strokes several pixels thick are averaged per
    /// column. Interior segments are Catmull-Rom, the two end segments linear.
    pub fn fit(points: &[(f64, f64)]) -> Result<DigitizedCurve> {
        let knots: Vec<(f64, f64)> = points
            .iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .sorted_by(|a, b| a.0.total_cmp(&b.0))
            .chunk_by(|(x, _)| *x)
            .into_iter()
            .map(|(x, column)| {
                let ys: Vec<f64> = column.map(|(_, y)| *y).collect();
                (x, ys.iter().sum::<f64>() / ys.len() as f64)
            })
            .collect();
        if knots.len() < 2 {
            return Err(DomainError::NotEnoughPoints {
                needed: 2,
                got: knots.len(),
            }
            .into());
        }
        let n = knots.len();
        let keys = knots
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                // Catmull-Rom needs one key before and two after the segment
                let interpolation = if n >= 4 && i >= 1 && i + 3 <= n {
                    Interpolation::CatmullRom
                } else {
                    Interpolation::Linear
                };
                Key::new(x, y, interpolation)
            })
            .collect();
        info!(
            "digitized curve from {} pixels, {} knots on [{}, {}]",
            points.len(),
            n,
            knots[0].0,
            knots[n - 1].0
        );
        Ok(DigitizedCurve {
            spline: Spline::from_vec(keys),
            knots,
        })
    }

    /// x range covered by the drawing
    pub fn range(&self) -> (f64, f64) {
        (self.knots[0].0, self.knots[self.knots.len() - 1].0)
    }

    /// y at `x`, NaN outside the drawn range
    pub fn value(&self, x: f64) -> f64 {
        let (first, last) = self.range();
        if x < first || x > last {
            return f64::NAN;
        }
        self.spline.clamped_sample(x).unwrap_or(f64::NAN)
    }

    pub fn sample(&self, domain: &Domain, points: usize) -> Samples {
        Samples::from_fn(domain.grid(points), |x| self.value(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn diagonal_canvas(size: usize) -> PixelBuffer {
        let mut canvas = PixelBuffer::blank(size, size);
        for i in 0..size {
            // bottom-left to top-right
            canvas.paint(i, size - 1 - i);
        }
        canvas
    }

    #[test]
    fn test_buffer_size_is_checked() {
        assert!(PixelBuffer::new(2, 2, 1, vec![0; 4]).is_ok());
        assert_eq!(
            PixelBuffer::new(2, 2, 4, vec![0; 4]),
            Err(MathError::Domain(DomainError::PixelBufferSize {
                width: 2,
                height: 2,
                channels: 4,
                len: 4
            }))
        );
        assert!(matches!(
            PixelBuffer::new(1, 1, 3, vec![0; 3]),
            Err(MathError::Unsupported(_))
        ));
    }

    #[test]
    fn test_short_data_reads_as_blank() {
        let canvas = PixelBuffer {
            width: 4,
            height: 4,
            channels: 1,
            data: vec![0; 3],
        };
        assert_eq!(canvas.point_cloud(&ViewWindow::default(), 128).len(), 3);
        assert!(PixelBuffer::new(4, 4, 1, vec![0; 3]).is_err());
        assert!(PixelBuffer::new(usize::MAX, 2, 4, Vec::new()).is_err());
    }

    #[test]
    fn test_paint_marks_strokes() {
        let mut gray = PixelBuffer::blank(3, 2);
        gray.paint(2, 1);
        gray.paint(5, 5);
        assert_eq!(gray.data(), &[255, 255, 255, 255, 255, 0]);
        let mut rgba = PixelBuffer::new(1, 1, 4, vec![255, 255, 255, 0]).unwrap();
        rgba.paint(0, 0);
        assert_eq!(rgba.data(), &[0, 0, 0, 255]);
        assert_eq!(rgba.point_cloud(&ViewWindow::default(), 128).len(), 1);
    }

    #[test]
    fn test_point_cloud_flips_rows() {
        let canvas = diagonal_canvas(11);
        let view = ViewWindow::default();
        let points = canvas.point_cloud(&view, 128);
        assert_eq!(points.len(), 11);
        assert!(points.contains(&(-10.0, -10.0)));
        assert!(points.contains(&(10.0, 10.0)));
        for (x, y) in points {
            assert_relative_eq!(x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rgba_alpha_marks_strokes() {
        let mut data = vec![0u8; 2 * 2 * 4];
        // top-right pixel opaque
        data[4 + 3] = 255;
        let canvas = PixelBuffer::new(2, 2, 4, data).unwrap();
        let view = ViewWindow::new(Domain::new(0.0, 1.0).unwrap(), 0.0, 1.0).unwrap();
        assert_eq!(canvas.point_cloud(&view, 0), vec![(1.0, 1.0)]);
    }

    #[test]
    fn test_fit_averages_columns() {
        let curve = DigitizedCurve::fit(&[(0.0, 1.0), (0.0, 3.0), (1.0, 4.0)]).unwrap();
        assert_eq!(curve.knots, vec![(0.0, 2.0), (1.0, 4.0)]);
        assert_relative_eq!(curve.value(0.5), 3.0);
    }

    #[test]
    fn test_fit_needs_two_columns() {
        assert_eq!(
            DigitizedCurve::fit(&[(1.0, 1.0), (1.0, 2.0)]).unwrap_err(),
            MathError::Domain(DomainError::NotEnoughPoints { needed: 2, got: 1 })
        );
        assert!(DigitizedCurve::fit(&[]).is_err());
    }

    #[test]
    fn test_drawn_line_is_reproduced() {
        let canvas = diagonal_canvas(21);
        let points = canvas.point_cloud(&ViewWindow::default(), 128);
        let curve = DigitizedCurve::fit(&points).unwrap();
        let samples = curve.sample(&Domain::default(), 41);
        assert_eq!(samples.missing_count(), 0);
        for (x, y) in samples.finite_points() {
            assert_relative_eq!(x, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_outside_drawing_is_missing() {
        let curve = DigitizedCurve::fit(&[(-1.0, 0.0), (0.0, 1.0), (1.0, 0.0)]).unwrap();
        let samples = curve.sample(&Domain::new(-2.0, 2.0).unwrap(), 5);
        assert!(samples.y[0].is_nan());
        assert!(samples.y[4].is_nan());
        assert_relative_eq!(samples.y[2], 1.0);
        assert_eq!(samples.missing_count(), 2);
    }
}

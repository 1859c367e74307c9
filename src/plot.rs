//! Numeric helpers for drawing a compiled expression on a pixel grid.
//!
//! Nothing here draws: the functions turn an expression and the visible
//! window into pixel coordinates, and pick tick positions for the axes.

use crate::error::Error;
use crate::expr::Expr;

/// Approximate distance between two axis ticks, in pixels
pub const TICK_SPACING_PX: f64 = 70.0;

/// The region of the plane that is visible on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

/// Size of the drawing surface, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
}

/// A point in pixel coordinates. `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Column
    pub x: f64,
    /// Row
    pub y: f64,
}

/// A connected run of samples
pub type Polyline = Vec<Point>;

impl Viewport {
    /// Create a viewport, checking that all bounds are finite and that each
    /// minimum is below the matching maximum.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self, Error> {
        let bounds = [x_min, x_max, y_min, y_max];
        if bounds.iter().any(|bound| !bound.is_finite()) {
            return Err(Error::ViewportError(format!(
                "bounds must be finite, got x in [{}, {}] and y in [{}, {}]",
                x_min, x_max, y_min, y_max
            )));
        }
        if x_min >= x_max {
            return Err(Error::ViewportError(format!(
                "x_min ({}) must be less than x_max ({})",
                x_min, x_max
            )));
        }
        if y_min >= y_max {
            return Err(Error::ViewportError(format!(
                "y_min ({}) must be less than y_max ({})",
                y_min, y_max
            )));
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Horizontal bounds as `(x_min, x_max)`
    #[must_use]
    pub fn x_range(&self) -> (f64, f64) {
        (self.x_min, self.x_max)
    }

    /// Vertical bounds as `(y_min, y_max)`
    #[must_use]
    pub fn y_range(&self) -> (f64, f64) {
        (self.y_min, self.y_max)
    }

    /// Check if `y` is inside the vertical range, bounds included
    #[must_use]
    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.y_min && y <= self.y_max
    }

    /// The plane abscissa sampled by pixel `column`
    #[must_use]
    pub fn x_at_column(&self, column: u32, canvas: &Canvas) -> f64 {
        self.x_min + f64::from(column) / f64::from(canvas.width) * (self.x_max - self.x_min)
    }

    /// Map a point of the plane to pixel coordinates
    #[must_use]
    pub fn to_screen(&self, x: f64, y: f64, canvas: &Canvas) -> Point {
        let width = f64::from(canvas.width);
        let height = f64::from(canvas.height);
        Point {
            x: (x - self.x_min) / (self.x_max - self.x_min) * width,
            y: height - (y - self.y_min) / (self.y_max - self.y_min) * height,
        }
    }
}

impl Canvas {
    /// Create a canvas, both dimensions must be non-zero
    pub fn new(width: u32, height: u32) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::ViewportError(format!(
                "canvas must not be empty, got {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    /// Width in pixels, also the number of sampled columns
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Sample `expr` once per pixel column and split the curve where it is
/// undefined or leaves the viewport.
///
/// # Examples
///
/// ```
/// # use plotexpr::compile;
/// # use plotexpr::plot::{sample, Canvas, Viewport};
/// let expr = compile("1 / x").unwrap();
/// let viewport = Viewport::new(-1.0, 1.0, -10.0, 10.0).unwrap();
/// let canvas = Canvas::new(200, 100).unwrap();
/// // the pole at x = 0 splits the curve in two
/// assert_eq!(sample(&expr, &viewport, &canvas).len(), 2);
/// ```
#[must_use]
pub fn sample(expr: &Expr, viewport: &Viewport, canvas: &Canvas) -> Vec<Polyline> {
    sample_with(|x| expr.eval(x), viewport, canvas)
}

/// Same as [`sample`](fn.sample.html) for any function of `x`, for example a
/// `JitFunction`.
pub fn sample_with<F>(function: F, viewport: &Viewport, canvas: &Canvas) -> Vec<Polyline>
where
    F: Fn(f64) -> f64,
{
    let mut polylines = Vec::new();
    let mut current = Polyline::new();
    for column in 0..canvas.width {
        let x = viewport.x_at_column(column, canvas);
        let y = function(x);
        if y.is_finite() && viewport.contains_y(y) {
            let point = viewport.to_screen(x, y, canvas);
            current.push(Point {
                x: f64::from(column),
                y: point.y,
            });
        } else if !current.is_empty() {
            polylines.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        polylines.push(current);
    }
    log::trace!("sampled {} polylines", polylines.len());
    polylines
}

/// Pick a "nice" distance between ticks (1, 2 or 5 times a power of ten)
/// so that ticks are about [`TICK_SPACING_PX`](constant.TICK_SPACING_PX.html)
/// pixels apart.
///
/// # Examples
///
/// ```
/// # use plotexpr::plot::tick_interval;
/// assert_eq!(tick_interval(20.0, 700.0), 2.0);
/// assert_eq!(tick_interval(1.0, 700.0), 0.1);
/// ```
#[must_use]
pub fn tick_interval(range: f64, pixels: f64) -> f64 {
    tick_interval_with(range, pixels, TICK_SPACING_PX)
}

/// Same as [`tick_interval`](fn.tick_interval.html) with a custom spacing
#[must_use]
pub fn tick_interval_with(range: f64, pixels: f64, spacing: f64) -> f64 {
    let raw_interval = range / (pixels / spacing);
    let magnitude = 10f64.powi(raw_interval.log10().floor() as i32);
    let normalized = raw_interval / magnitude;
    let nice = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Tick positions in `[min, max]` for an axis `pixels` long
#[must_use]
pub fn ticks(min: f64, max: f64, pixels: f64) -> Vec<f64> {
    let interval = tick_interval(max - min, pixels);
    if !interval.is_finite() || interval <= 0.0 {
        return Vec::new();
    }
    let first = (min / interval).ceil();
    let mut ticks = Vec::new();
    let mut index = 0.0;
    loop {
        // multiply instead of accumulating to avoid drift
        let tick = (first + index) * interval;
        // the second check stops once `first` is too large to be incremented
        if tick > max || ticks.last() == Some(&tick) {
            break;
        }
        ticks.push(tick);
        index += 1.0;
    }
    ticks
}

/// Pixel row of the x-axis and pixel column of the y-axis, when zero is
/// inside the corresponding range
#[must_use]
pub fn axis_positions(viewport: &Viewport, canvas: &Canvas) -> (Option<f64>, Option<f64>) {
    let origin = viewport.to_screen(0.0, 0.0, canvas);
    let x_axis = if viewport.contains_y(0.0) {
        Some(origin.y)
    } else {
        None
    };
    let y_axis = if viewport.x_min <= 0.0 && viewport.x_max >= 0.0 {
        Some(origin.x)
    } else {
        None
    };
    (x_axis, y_axis)
}

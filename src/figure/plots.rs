use std::path::PathBuf;

use anyhow::{Context, Result};
use plotters::prelude::*;

use super::config::{OutputConfiguration, PlotConfiguration};
use super::{Figure, FigureError};
use crate::color::{PlotColors, SeriesColor};
use crate::consts::{CURVE_SAMPLES, FIGURE_HEIGHT, FIGURE_WIDTH};
use crate::data::model::FitData;
use crate::fit::{FitFunction, FitResult};

// ---------------------------------------------------------------------------
// Public plots
// ---------------------------------------------------------------------------

/// Data points with their x/y error bars.
pub fn plot_data(data: &FitData, config: &PlotConfiguration) -> Result<Figure, FigureError> {
    let colors = PlotColors::default();
    let x_range = config_x_range(data, config);
    render(
        &config.data_title,
        config,
        x_range,
        &[Layer::Points {
            name: "data",
            points: error_points(data, &data.y),
            color: colors.data,
        }],
    )
}

/// Data points with the fitted curve drawn over the x range.
pub fn plot_fitting(
    func: &FitFunction,
    data: &FitData,
    config: &PlotConfiguration,
    a: &[f64],
) -> Result<Figure, FigureError> {
    let colors = PlotColors::default();
    let x_range = config_x_range(data, config);
    render(
        &config.title,
        config,
        x_range,
        &[
            Layer::Points {
                name: "data",
                points: error_points(data, &data.y),
                color: colors.data,
            },
            Layer::Curve {
                name: "fit",
                points: sample_curve(func, a, x_range),
                color: colors.fit,
            },
        ],
    )
}

/// `y - f(a; x)` for each record, around a zero line.
pub fn plot_residuals(
    func: &FitFunction,
    data: &FitData,
    config: &PlotConfiguration,
    a: &[f64],
) -> Result<Figure, FigureError> {
    let colors = PlotColors::default();
    let x_range = config_x_range(data, config);
    let residuals = residuals(func, data, a);
    render(
        &config.residuals_title,
        config,
        x_range,
        &[
            Layer::Zero,
            Layer::Points {
                name: "residuals",
                points: error_points(data, &residuals),
                color: colors.residuals,
            },
        ],
    )
}

/// Write the fitting and residuals figures and the result summary (text and
/// JSON) into the output directory. Returns the written paths.
pub fn plot_all(
    func: &FitFunction,
    data: &FitData,
    config: &PlotConfiguration,
    output: &OutputConfiguration,
    result: &FitResult,
) -> Result<Vec<PathBuf>> {
    let fitting = output.fitting_path();
    plot_fitting(func, data, config, &result.a)?
        .save(&fitting)
        .with_context(|| format!("saving {}", fitting.display()))?;

    let residuals = output.residuals_path();
    plot_residuals(func, data, config, &result.a)?
        .save(&residuals)
        .with_context(|| format!("saving {}", residuals.display()))?;

    let mut written = vec![fitting, residuals];
    written.extend(write_result_files(func, output, result)?);
    Ok(written)
}

/// Write `<base>_result.txt` and `<base>_result.json`.
pub fn write_result_files(
    func: &FitFunction,
    output: &OutputConfiguration,
    result: &FitResult,
) -> Result<Vec<PathBuf>> {
    let text_path = output.result_text_path();
    std::fs::write(&text_path, format!("{func}\n\n{result}\n"))
        .with_context(|| format!("writing {}", text_path.display()))?;

    let json_path = output.result_json_path();
    let json = result.to_json().context("serializing fit result")?;
    std::fs::write(&json_path, json).with_context(|| format!("writing {}", json_path.display()))?;

    Ok(vec![text_path, json_path])
}

pub fn residuals(func: &FitFunction, data: &FitData, a: &[f64]) -> Vec<f64> {
    data.x
        .iter()
        .zip(&data.y)
        .map(|(&x, &y)| y - func.eval(a, x))
        .collect()
}

/// `CURVE_SAMPLES` evenly spaced points of `f(a; x)` over `x_range`.
pub fn sample_curve(func: &FitFunction, a: &[f64], x_range: (f64, f64)) -> Vec<(f64, f64)> {
    let (lo, hi) = x_range;
    let step = (hi - lo) / (CURVE_SAMPLES - 1) as f64;
    (0..CURVE_SAMPLES)
        .map(|i| lo + step * i as f64)
        .map(|x| (x, func.eval(a, x)))
        .filter(|(_, y)| y.is_finite())
        .collect()
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct ErrorPoint {
    x: f64,
    y: f64,
    xerr: f64,
    yerr: f64,
}

enum Layer {
    Points {
        name: &'static str,
        points: Vec<ErrorPoint>,
        color: SeriesColor,
    },
    Curve {
        name: &'static str,
        points: Vec<(f64, f64)>,
        color: SeriesColor,
    },
    /// Horizontal line at y = 0.
    Zero,
}

fn error_points(data: &FitData, y: &[f64]) -> Vec<ErrorPoint> {
    (0..data.len())
        .map(|i| ErrorPoint {
            x: data.x[i],
            y: y[i],
            xerr: data.xerr[i].abs(),
            yerr: data.yerr[i].abs(),
        })
        .collect()
}

fn config_x_range(data: &FitData, config: &PlotConfiguration) -> (f64, f64) {
    let (lo, hi) = data.x_range();
    config.x_range(lo, hi)
}

fn y_range(layers: &[Layer]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for layer in layers {
        match layer {
            Layer::Points { points, .. } => {
                for p in points {
                    lo = lo.min(p.y - p.yerr);
                    hi = hi.max(p.y + p.yerr);
                }
            }
            Layer::Curve { points, .. } => {
                for &(_, y) in points {
                    lo = lo.min(y);
                    hi = hi.max(y);
                }
            }
            Layer::Zero => {
                lo = lo.min(0.0);
                hi = hi.max(0.0);
            }
        }
    }
    super::config::padded_range(lo, hi)
}

fn render_error<E: std::fmt::Display>(e: E) -> FigureError {
    FigureError::Render(e.to_string())
}

fn render(
    title: &str,
    config: &PlotConfiguration,
    x_range: (f64, f64),
    layers: &[Layer],
) -> Result<Figure, FigureError> {
    let (width, height) = (FIGURE_WIDTH, FIGURE_HEIGHT);
    let mut pixels = vec![0u8; (width * height * 3) as usize];
    let (y_min, y_max) = y_range(layers);

    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range.0..x_range.1, y_min..y_max)
            .map_err(render_error)?;

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(config.x_label.as_str())
            .y_desc(config.y_label.as_str());
        if !config.grid {
            mesh.disable_mesh();
        }
        mesh.draw().map_err(render_error)?;

        for layer in layers {
            match layer {
                Layer::Points {
                    name,
                    points,
                    color,
                } => {
                    let style = color.to_plotters().filled();
                    chart
                        .draw_series(points.iter().map(|p| {
                            ErrorBar::new_vertical(p.x, p.y - p.yerr, p.y, p.y + p.yerr, style, 6)
                        }))
                        .map_err(render_error)?;
                    chart
                        .draw_series(points.iter().map(|p| {
                            ErrorBar::new_horizontal(p.y, p.x - p.xerr, p.x, p.x + p.xerr, style, 6)
                        }))
                        .map_err(render_error)?;
                    chart
                        .draw_series(points.iter().map(|p| Circle::new((p.x, p.y), 3, style)))
                        .map_err(render_error)?
                        .label(*name)
                        .legend(move |(x, y)| PathElement::new(vec![(x - 4, y), (x + 4, y)], style));
                }
                Layer::Curve {
                    name,
                    points,
                    color,
                } => {
                    let rgb = color.to_plotters();
                    chart
                        .draw_series(LineSeries::new(points.iter().copied(), rgb.stroke_width(2)))
                        .map_err(render_error)?
                        .label(*name)
                        .legend(move |(x, y)| {
                            PathElement::new(vec![(x - 8, y), (x + 8, y)], rgb.stroke_width(2))
                        });
                }
                Layer::Zero => {
                    chart
                        .draw_series(LineSeries::new(
                            [(x_range.0, 0.0), (x_range.1, 0.0)],
                            BLACK.stroke_width(1),
                        ))
                        .map_err(render_error)?;
                }
            }
        }

        if config.legend {
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .position(SeriesLabelPosition::UpperRight)
                .draw()
                .map_err(render_error)?;
        }

        root.present().map_err(render_error)?;
    }

    Ok(Figure::from_rgb(width, height, pixels))
}

use crate::data::model::min_max;
use crate::figure::PlotConfiguration;
use crate::figure::config::padded_range;
use crate::fit::FitFunction;

/// Editable plot options. Range fields are text so they can be left empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfigurationBox {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub grid: bool,
    pub legend: bool,
    pub x_min: String,
    pub x_max: String,
}

impl Default for PlotConfigurationBox {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            grid: false,
            legend: true,
            x_min: String::new(),
            x_max: String::new(),
        }
    }
}

impl PlotConfigurationBox {
    pub fn plot_configuration(&self) -> PlotConfiguration {
        let title = self.title.trim();
        let (data_title, residuals_title) = if title.is_empty() {
            ("Data".to_string(), "Residuals".to_string())
        } else {
            (format!("{title} - Data"), format!("{title} - Residuals"))
        };
        PlotConfiguration {
            title: title.to_string(),
            data_title,
            residuals_title,
            x_label: self.x_label.clone(),
            y_label: self.y_label.clone(),
            grid: self.grid,
            legend: self.legend,
            x_min: self.x_min.trim().parse().ok(),
            x_max: self.x_max.trim().parse().ok(),
        }
    }

    pub fn load_fit_function(&mut self, func: Option<&FitFunction>) {
        self.title = func.map(FitFunction::title).unwrap_or_default();
    }

    pub fn load_columns(&mut self, x: Option<&str>, y: Option<&str>) {
        self.x_label = x.unwrap_or_default().to_string();
        self.y_label = y.unwrap_or_default().to_string();
    }

    /// Set the x range to the span of `x` plus padding.
    pub fn set_xmin_xmax(&mut self, x: &[f64]) {
        let (lo, hi) = min_max(x);
        let (lo, hi) = padded_range(lo, hi);
        self.x_min = format_bound(lo);
        self.x_max = format_bound(hi);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Shortest text that parses back to exactly `v`.
fn format_bound(v: f64) -> String {
    if v == 0.0 { "0".into() } else { v.to_string() }
}

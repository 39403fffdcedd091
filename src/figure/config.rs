use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// PlotConfiguration
// ---------------------------------------------------------------------------

/// Display options shared by every figure.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfiguration {
    pub title: String,
    pub data_title: String,
    pub residuals_title: String,
    pub x_label: String,
    pub y_label: String,
    pub grid: bool,
    pub legend: bool,
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
}

impl Default for PlotConfiguration {
    fn default() -> Self {
        Self {
            title: String::new(),
            data_title: "Data".into(),
            residuals_title: "Residuals".into(),
            x_label: "x".into(),
            y_label: "y".into(),
            grid: false,
            legend: false,
            x_min: None,
            x_max: None,
        }
    }
}

impl PlotConfiguration {
    /// Configured x range, falling back to the data range with padding.
    pub fn x_range(&self, data_min: f64, data_max: f64) -> (f64, f64) {
        let (lo, hi) = padded_range(data_min, data_max);
        let lo = self.x_min.unwrap_or(lo);
        let hi = self.x_max.unwrap_or(hi);
        if lo < hi { (lo, hi) } else { (hi - 1.0, hi + 1.0) }
    }
}

/// `[min, max]` widened by `X_RANGE_PADDING` of the span on each side.
pub fn padded_range(min: f64, max: f64) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let gap = (max - min) * crate::consts::X_RANGE_PADDING;
    if gap > 0.0 {
        (min - gap, max + gap)
    } else {
        (min - 1.0, max + 1.0)
    }
}

// ---------------------------------------------------------------------------
// OutputConfiguration
// ---------------------------------------------------------------------------

/// Where `plot_all` writes its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfiguration {
    pub base_name: String,
    pub output_dir: PathBuf,
}

impl OutputConfiguration {
    pub fn build(base_name: impl Into<String>, output_dir: impl AsRef<Path>) -> Self {
        Self {
            base_name: base_name.into(),
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn fitting_path(&self) -> PathBuf {
        self.path("fitting.png")
    }

    pub fn residuals_path(&self) -> PathBuf {
        self.path("fitting_residuals.png")
    }

    pub fn result_text_path(&self) -> PathBuf {
        self.path("result.txt")
    }

    pub fn result_json_path(&self) -> PathBuf {
        self.path("result.json")
    }

    fn path(&self, suffix: &str) -> PathBuf {
        self.output_dir.join(format!("{}_{suffix}", self.base_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_names_follow_base_name() {
        let out = OutputConfiguration::build("linear", "/tmp/out");
        assert_eq!(out.fitting_path(), PathBuf::from("/tmp/out/linear_fitting.png"));
        assert_eq!(
            out.residuals_path(),
            PathBuf::from("/tmp/out/linear_fitting_residuals.png")
        );
        assert_eq!(out.result_json_path(), PathBuf::from("/tmp/out/linear_result.json"));
    }

    #[test]
    fn x_range_prefers_configured_bounds() {
        let mut config = PlotConfiguration::default();
        assert_eq!(config.x_range(0.0, 10.0), (-1.0, 11.0));
        config.x_min = Some(2.0);
        assert_eq!(config.x_range(0.0, 10.0), (2.0, 11.0));
    }

    #[test]
    fn single_point_range_is_widened() {
        assert_eq!(padded_range(3.0, 3.0), (2.0, 4.0));
    }
}

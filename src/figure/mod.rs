/// Plotting engine: figures rendered off-screen and written to disk.
///
/// ```text
///  FitData + FitFunction + a
///        │  plots::plot_*
///        ▼
///   ┌──────────┐
///   │  Figure   │  RGB raster, native size
///   └──────────┘
///        │  Figure::save
///        ▼
///   .png / .jpg / .pdf
/// ```

pub mod config;
pub mod pdf;
pub mod plots;

use std::path::Path;

use eframe::egui;
use image::{ImageFormat, RgbImage};
use thiserror::Error;

pub use config::{OutputConfiguration, PlotConfiguration};

#[derive(Debug, Error)]
pub enum FigureError {
    #[error("cannot save figure with suffix '{0}'; allowed formats: png, jpg, pdf")]
    UnsupportedFormat(String),
    #[error("rendering failed: {0}")]
    Render(String),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// FigureFormat
// ---------------------------------------------------------------------------

/// File formats a figure can be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureFormat {
    Png,
    Jpg,
    Pdf,
}

impl FigureFormat {
    pub const EXTENSIONS: [&'static str; 3] = ["png", "jpg", "pdf"];

    /// Format from the path's extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(FigureFormat::Png),
            "jpg" => Some(FigureFormat::Jpg),
            "pdf" => Some(FigureFormat::Pdf),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Figure
// ---------------------------------------------------------------------------

/// A rendered figure: tightly packed RGB8 pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Figure {
    /// `pixels` must hold `width * height * 3` bytes.
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 3) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgb([self.width as usize, self.height as usize], &self.pixels)
    }

    fn to_image(&self) -> Result<RgbImage, FigureError> {
        RgbImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| FigureError::Render("pixel buffer does not match figure size".into()))
    }

    /// Write the figure; the format is chosen by the path's extension.
    pub fn save(&self, path: &Path) -> Result<(), FigureError> {
        let format = FigureFormat::from_path(path).ok_or_else(|| {
            let suffix = path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            FigureError::UnsupportedFormat(suffix)
        })?;

        match format {
            FigureFormat::Png => self.to_image()?.save_with_format(path, ImageFormat::Png)?,
            FigureFormat::Jpg => self.to_image()?.save_with_format(path, ImageFormat::Jpeg)?,
            FigureFormat::Pdf => std::fs::write(path, pdf::encode(self)?)?,
        }
        log::info!("Saved figure to {}", path.display());
        Ok(())
    }
}

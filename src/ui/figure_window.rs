use eframe::egui::{self, TextureHandle, TextureOptions, Ui};

use crate::consts::FIGURE_WINDOW_HEIGHT_RATIO;
use crate::dialogs::{FileDialogs, Messages};
use crate::figure::{Figure, FigureError, FigureFormat};

/// Produces a fresh figure each time it is called.
pub type PlotMethod = Box<dyn Fn() -> Result<Figure, FigureError>>;

// ---------------------------------------------------------------------------
// Figure window
// ---------------------------------------------------------------------------

/// A floating window showing one figure, with a "Save" button.
pub struct FigureWindow {
    id: u64,
    title: String,
    plot_method: PlotMethod,
    figure: Figure,
    texture: Option<TextureHandle>,
    pub open: bool,
}

impl FigureWindow {
    /// Render once for display. Saving renders again.
    pub fn new(id: u64, title: impl Into<String>, plot_method: PlotMethod) -> Result<Self, FigureError> {
        let figure = plot_method()?;
        Ok(Self {
            id,
            title: title.into(),
            plot_method,
            figure,
            texture: None,
            open: true,
        })
    }

    /// Window size: figure width by `FIGURE_WINDOW_HEIGHT_RATIO` times its height.
    pub fn window_size(&self) -> egui::Vec2 {
        egui::vec2(
            self.figure.width() as f32,
            self.figure.height() as f32 * FIGURE_WINDOW_HEIGHT_RATIO,
        )
    }

    pub fn save(&self, dialogs: &dyn FileDialogs, messages: &mut Messages) {
        let Some(path) = dialogs.save_file("Save figure", "fig", &FigureFormat::EXTENSIONS) else {
            return;
        };
        if FigureFormat::from_path(&path).is_none() {
            let suffix = path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            messages.error(
                "Invalid File Suffix",
                format!(
                    "Cannot save figure with suffix '{suffix}'. Allowed suffixes: {}",
                    FigureFormat::EXTENSIONS.join(", ")
                ),
            );
            return;
        }
        if let Err(e) = (self.plot_method)().and_then(|figure| figure.save(&path)) {
            messages.error("Save figure error", e.to_string());
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, dialogs: &dyn FileDialogs, messages: &mut Messages) {
        let texture = self.texture.get_or_insert_with(|| {
            ctx.load_texture(
                format!("figure_{}", self.id),
                self.figure.to_color_image(),
                TextureOptions::LINEAR,
            )
        });
        let texture = texture.clone();

        let size = self.window_size();
        let mut save_clicked = false;
        egui::Window::new(self.title.clone())
            .id(egui::Id::new(("figure_window", self.id)))
            .open(&mut self.open)
            .default_size(size)
            .resizable(true)
            .show(ctx, |ui: &mut Ui| {
                if ui.button("Save").clicked() {
                    save_clicked = true;
                }
                ui.separator();
                ui.add(egui::Image::new(&texture).shrink_to_fit());
            });

        if save_clicked {
            self.save(dialogs, messages);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::dialogs::testing::FakeDialogs;
    use crate::dialogs::MessageLevel;

    fn counting_window(calls: Rc<Cell<usize>>) -> FigureWindow {
        let method: PlotMethod = Box::new(move || {
            calls.set(calls.get() + 1);
            Ok(Figure::from_rgb(4, 2, vec![200; 4 * 2 * 3]))
        });
        FigureWindow::new(1, "Data", method).unwrap()
    }

    #[test]
    fn window_is_taller_than_figure() {
        let window = counting_window(Rc::new(Cell::new(0)));
        assert_eq!(window.window_size(), egui::vec2(4.0, 2.0 * FIGURE_WINDOW_HEIGHT_RATIO));
    }

    #[test]
    fn gif_destination_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("fig.gif");
        let calls = Rc::new(Cell::new(0));
        let window = counting_window(calls.clone());
        let dialogs = FakeDialogs {
            save_path: Some(target.clone()),
            ..Default::default()
        };
        let mut messages = Messages::default();

        window.save(&dialogs, &mut messages);

        let message = messages.pop().expect("error dialog");
        assert_eq!(message.title, "Invalid File Suffix");
        assert_eq!(message.level, MessageLevel::Error);
        assert!(!target.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn save_renders_again() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("fig.png");
        let calls = Rc::new(Cell::new(0));
        let window = counting_window(calls.clone());
        let dialogs = FakeDialogs {
            save_path: Some(target.clone()),
            ..Default::default()
        };
        let mut messages = Messages::default();

        window.save(&dialogs, &mut messages);

        assert!(messages.is_empty());
        assert!(target.exists());
        assert_eq!(calls.get(), 2);
        let requests = dialogs.save_requests.borrow();
        assert_eq!(requests[0].0, "fig");
        assert_eq!(requests[0].1, vec!["png", "jpg", "pdf"]);
    }

    #[test]
    fn cancelled_save_is_silent() {
        let calls = Rc::new(Cell::new(0));
        let window = counting_window(calls.clone());
        let mut messages = Messages::default();
        window.save(&FakeDialogs::default(), &mut messages);
        assert!(messages.is_empty());
        assert_eq!(calls.get(), 1);
    }
}

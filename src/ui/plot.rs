use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::color::PlotColors;
use crate::figure::plots::sample_curve;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Preview plot (central panel)
// ---------------------------------------------------------------------------

/// Preview of whatever is already computed. Never triggers a computation.
pub fn preview_plot(ui: &mut Ui, state: &AppState) {
    let Some(data) = state.cached_fit_data() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Load a file, then Fit or Plot to preview the data");
        });
        return;
    };

    let colors = PlotColors::default();
    let config = state.plot_configuration.plot_configuration();

    Plot::new("preview_plot")
        .legend(Legend::default())
        .x_axis_label(config.x_label.clone())
        .y_axis_label(config.y_label.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let points: PlotPoints = data.x.iter().zip(&data.y).map(|(&x, &y)| [x, y]).collect();
            plot_ui.points(
                Points::new(points)
                    .name("data")
                    .color(colors.data.to_egui())
                    .radius(3.0),
            );

            for ((&x, &y), &yerr) in data.x.iter().zip(&data.y).zip(&data.yerr) {
                if yerr > 0.0 {
                    plot_ui.line(
                        Line::new(PlotPoints::new(vec![[x, y - yerr], [x, y + yerr]]))
                            .color(colors.data.to_egui())
                            .width(1.0),
                    );
                }
            }

            let fitted = state
                .cached_fit_result()
                .zip(state.fitting_function.fit_function());
            if let Some((result, func)) = fitted {
                let (lo, hi) = data.x_range();
                let range = config.x_range(lo, hi);
                let curve: PlotPoints = sample_curve(&func, &result.a, range)
                    .into_iter()
                    .map(|(x, y)| [x, y])
                    .collect();
                plot_ui.line(
                    Line::new(curve)
                        .name(func.name())
                        .color(colors.fit.to_egui())
                        .width(1.5),
                );
            }
        });
}

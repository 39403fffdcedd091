use eframe::egui;

use crate::dialogs::{FileDialogs, NativeDialogs};
use crate::state::AppState;
use crate::ui::{dialogs, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EddingtonApp {
    pub state: AppState,
    file_dialogs: Box<dyn FileDialogs>,
}

impl Default for EddingtonApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
            file_dialogs: Box::new(NativeDialogs),
        }
    }
}

impl eframe::App for EddingtonApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let file_dialogs = self.file_dialogs.as_ref();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, file_dialogs);
        });

        // ---- Bottom panel: actions ----
        egui::TopBottomPanel::bottom("actions_panel").show(ctx, |ui| {
            panels::actions_panel(ui, &mut self.state, file_dialogs);
        });

        // ---- Left side panel: input boxes ----
        egui::SidePanel::left("input_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::input_panel(ui, &mut self.state, file_dialogs);
            });

        // ---- Central panel: preview ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::preview_plot(ui, &self.state);
        });

        // ---- Floating windows ----
        for figure in &mut self.state.figures {
            figure.show(ctx, file_dialogs, &mut self.state.messages);
        }
        self.state.figures.retain(|figure| figure.open);

        let chosen = self
            .state
            .records_window
            .as_mut()
            .and_then(|window| window.show(ctx));
        if self.state.records_window.as_ref().is_some_and(|w| !w.open) {
            self.state.records_window = None;
        }
        if let Some(event) = chosen {
            self.state.apply(event);
        }

        dialogs::show_messages(ctx, &mut self.state.messages);
    }
}

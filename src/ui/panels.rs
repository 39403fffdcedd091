use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, TextEdit, Ui};

use crate::boxes::{ColumnRole, InputEvent};
use crate::consts::{BIG_PADDING, SMALL_PADDING};
use crate::dialogs::FileDialogs;
use crate::fit::FunctionKind;
use crate::fit::functions::MAX_POLYNOM_DEGREE;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – input boxes
// ---------------------------------------------------------------------------

/// Render the input boxes. Edits are collected as events and applied once
/// the panel is drawn.
pub fn input_panel(ui: &mut Ui, state: &mut AppState, dialogs: &dyn FileDialogs) {
    let mut events: Vec<InputEvent> = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Input file ----
            ui.heading("Input file");
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Choose file").clicked() {
                    state.load_input_file(dialogs);
                }
                ui.label(state.input_file.file_label());
            });
            if let Some(dataset) = state.input_file.data() {
                let chosen = state.chosen_records.iter().filter(|c| **c).count();
                ui.label(format!("{chosen}/{} records chosen", dataset.records()));
            }
            if ui.button("Choose Records").clicked() {
                state.choose_records();
            }
            ui.add_space(BIG_PADDING);

            // ---- Fitting function ----
            ui.heading("Fitting function");
            fitting_function(ui, state, &mut events);
            ui.add_space(SMALL_PADDING);

            ui.strong("Initial guess");
            let mut text = state.initial_guess.text().to_string();
            let hint = match state.initial_guess.n() {
                Some(n) => format!("{n} values, e.g. 1, 1"),
                None => "choose a function first".to_string(),
            };
            if ui
                .add(TextEdit::singleline(&mut text).hint_text(hint))
                .changed()
            {
                events.push(state.initial_guess.set_text(text));
            }
            if let Some(error) = state.initial_guess.error() {
                ui.label(RichText::new(error).color(Color32::RED));
            }
            ui.add_space(BIG_PADDING);

            // ---- Data columns ----
            ui.heading("Data columns");
            data_columns(ui, state, &mut events);
            ui.add_space(BIG_PADDING);

            // ---- Plot configuration ----
            ui.heading("Plot configuration");
            plot_configuration(ui, state);
        });

    for event in events {
        state.apply(event);
    }
}

fn fitting_function(ui: &mut Ui, state: &mut AppState, events: &mut Vec<InputEvent>) {
    let current = state.fitting_function.kind();
    let mut selected = current;
    egui::ComboBox::from_id_salt("fitting_function")
        .selected_text(current.map_or("Choose function", FunctionKind::label))
        .show_ui(ui, |ui: &mut Ui| {
            for kind in FunctionKind::ALL {
                ui.selectable_value(&mut selected, Some(kind), kind.label());
            }
        });
    events.extend(state.fitting_function.select(selected));

    if selected == Some(FunctionKind::Polynom) {
        let mut degree = state.fitting_function.degree();
        ui.horizontal(|ui: &mut Ui| {
            ui.label("Degree");
            if ui
                .add(DragValue::new(&mut degree).range(1..=MAX_POLYNOM_DEGREE))
                .changed()
            {
                events.extend(state.fitting_function.set_degree(degree));
            }
        });
    }

    if let Some(func) = state.fitting_function.fit_function() {
        ui.label(RichText::new(func.syntax()).monospace());
    }
}

fn data_columns(ui: &mut Ui, state: &mut AppState, events: &mut Vec<InputEvent>) {
    let columns = state.data_columns.columns().to_vec();
    if columns.is_empty() {
        ui.label("No dataset loaded.");
        return;
    }

    egui::Grid::new("data_columns")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            for role in ColumnRole::ALL {
                ui.label(role.label());
                let mut chosen = state.data_columns.selected(role).map(str::to_string);
                egui::ComboBox::from_id_salt(("data_column", role.label()))
                    .selected_text(chosen.clone().unwrap_or_default())
                    .show_ui(ui, |ui: &mut Ui| {
                        for column in &columns {
                            ui.selectable_value(&mut chosen, Some(column.clone()), column);
                        }
                    });
                if let Some(name) = chosen {
                    events.extend(state.data_columns.set_column(role, name));
                }
                ui.end_row();
            }
        });
}

fn plot_configuration(ui: &mut Ui, state: &mut AppState) {
    let config = &mut state.plot_configuration;
    egui::Grid::new("plot_configuration")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("Title");
            ui.text_edit_singleline(&mut config.title);
            ui.end_row();

            ui.label("X label");
            ui.text_edit_singleline(&mut config.x_label);
            ui.end_row();

            ui.label("Y label");
            ui.text_edit_singleline(&mut config.y_label);
            ui.end_row();

            ui.label("X min");
            ui.text_edit_singleline(&mut config.x_min);
            ui.end_row();

            ui.label("X max");
            ui.text_edit_singleline(&mut config.x_max);
            ui.end_row();
        });
    ui.horizontal(|ui: &mut Ui| {
        ui.checkbox(&mut config.grid, "Grid");
        ui.checkbox(&mut config.legend, "Legend");
    });
}

// ---------------------------------------------------------------------------
// Bottom panel – actions
// ---------------------------------------------------------------------------

pub fn actions_panel(ui: &mut Ui, state: &mut AppState, dialogs: &dyn FileDialogs) {
    ui.add_space(SMALL_PADDING);
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Fit").clicked() {
            state.fit();
        }
        if ui.button("Plot data").clicked() {
            state.plot_data();
        }
        if ui.button("Plot Fitting").clicked() {
            state.plot_fitting();
        }
        if ui.button("Residuals").clicked() {
            state.plot_residuals();
        }
    });
    ui.add_space(SMALL_PADDING);
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Output directory");
        ui.add(TextEdit::singleline(&mut state.output_directory).desired_width(320.0));
        if ui.button("Choose directory").clicked() {
            state.choose_output_dir(dialogs);
        }
        if ui.button("Save").clicked() {
            state.save_to_output_dir();
        }
    });
    ui.add_space(SMALL_PADDING);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, dialogs: &dyn FileDialogs) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                state.load_input_file(dialogs);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.input_file.path().is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload_input_file();
                ui.close_menu();
            }
            if ui
                .add_enabled(state.input_file.data().is_some(), egui::Button::new("Close"))
                .clicked()
            {
                state.close_input_file();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(func) = state.cached_fit_result().and(state.fitting_function.fit_function()) {
            ui.label(format!("Fitted {}", func.name()));
        } else if let Some(data) = state.cached_fit_data() {
            ui.label(format!("{} records ready to fit", data.len()));
        }
    });
}

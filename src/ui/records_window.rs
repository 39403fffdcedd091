use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::boxes::InputEvent;
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Records choice window
// ---------------------------------------------------------------------------

/// Edits a copy of the chosen-records mask; only "Save" hands it back.
pub struct RecordsChoiceWindow {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
    chosen: Vec<bool>,
    pub open: bool,
}

impl RecordsChoiceWindow {
    pub fn new(dataset: &Dataset, chosen: &[bool]) -> Self {
        let rows: Vec<Vec<f64>> = (0..dataset.records()).map(|i| dataset.record(i)).collect();
        let mut chosen = chosen.to_vec();
        chosen.resize(rows.len(), true);
        Self {
            columns: dataset.column_names(),
            rows,
            chosen,
            open: true,
        }
    }

    #[cfg(test)]
    pub fn chosen(&self) -> &[bool] {
        &self.chosen
    }

    pub fn toggle(&mut self, record: usize) {
        if let Some(c) = self.chosen.get_mut(record) {
            *c = !*c;
        }
    }

    pub fn select_all(&mut self) {
        self.chosen.fill(true);
    }

    pub fn select_none(&mut self) {
        self.chosen.fill(false);
    }

    pub fn confirm(&mut self) -> InputEvent {
        self.open = false;
        InputEvent::RecordsChosen(self.chosen.clone())
    }

    pub fn cancel(&mut self) {
        self.open = false;
    }

    /// Draw the window; returns the event when the user saves.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<InputEvent> {
        let mut open = self.open;
        let mut save = false;
        let mut cancel = false;

        egui::Window::new("Choose Records")
            .open(&mut open)
            .default_size(egui::vec2(420.0, 480.0))
            .resizable(true)
            .show(ctx, |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    if ui.button("Select all").clicked() {
                        self.select_all();
                    }
                    if ui.button("Select none").clicked() {
                        self.select_none();
                    }
                    ui.label(format!(
                        "{}/{} chosen",
                        self.chosen.iter().filter(|c| **c).count(),
                        self.chosen.len()
                    ));
                });
                ui.separator();

                egui::TopBottomPanel::bottom("records_buttons").show_inside(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        save = ui.button("Save").clicked();
                        cancel = ui.button("Cancel").clicked();
                    });
                });

                self.table(ui);
            });

        if !open || cancel {
            self.cancel();
            return None;
        }
        save.then(|| self.confirm())
    }

    fn table(&mut self, ui: &mut Ui) {
        let mut table = TableBuilder::new(ui)
            .id_salt("records_table")
            .striped(true)
            .column(Column::auto());
        for _ in &self.columns {
            table = table.column(Column::auto().at_least(60.0));
        }

        let mut toggled = None;
        table
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                for name in &self.columns {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, self.rows.len(), |mut row| {
                    let i = row.index();
                    row.col(|ui| {
                        let mut checked = self.chosen[i];
                        if ui.checkbox(&mut checked, (i + 1).to_string()).changed() {
                            toggled = Some(i);
                        }
                    });
                    for value in &self.rows[i] {
                        row.col(|ui| {
                            ui.label(value.to_string());
                        });
                    }
                });
            });

        if let Some(i) = toggled {
            self.toggle(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Column::new("x", vec![1.0, 2.0, 3.0]),
            Column::new("y", vec![2.0, 4.0, 6.0]),
        ])
        .unwrap()
    }

    #[test]
    fn seeded_from_current_mask() {
        let window = RecordsChoiceWindow::new(&dataset(), &[true, false, true]);
        assert_eq!(window.chosen(), &[true, false, true]);
    }

    #[test]
    fn confirm_emits_edited_mask() {
        let mut window = RecordsChoiceWindow::new(&dataset(), &[true, true, true]);
        window.toggle(1);
        assert_eq!(window.confirm(), InputEvent::RecordsChosen(vec![true, false, true]));
        assert!(!window.open);
    }

    #[test]
    fn select_all_and_none() {
        let mut window = RecordsChoiceWindow::new(&dataset(), &[true, false, true]);
        window.select_none();
        assert_eq!(window.chosen(), &[false, false, false]);
        window.select_all();
        assert_eq!(window.chosen(), &[true, true, true]);
        window.toggle(7);
        assert_eq!(window.chosen().len(), 3);
    }
}

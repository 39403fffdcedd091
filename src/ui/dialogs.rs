use eframe::egui::{self, Color32, RichText, Ui};

use crate::dialogs::{MessageLevel, Messages};

/// Show the oldest pending message as a modal; "OK" or clicking outside
/// dismisses it and the next one appears on the following frame.
pub fn show_messages(ctx: &egui::Context, messages: &mut Messages) {
    let Some(message) = messages.front() else {
        return;
    };

    let mut ok = false;
    let response = egui::Modal::new(egui::Id::new("message_dialog")).show(ctx, |ui: &mut Ui| {
        ui.set_max_width(420.0);
        let heading = RichText::new(&message.title).heading();
        match message.level {
            MessageLevel::Info => ui.label(heading),
            MessageLevel::Error => ui.label(heading.color(Color32::RED)),
        };
        ui.add_space(crate::consts::SMALL_PADDING);
        ui.label(&message.body);
        ui.add_space(crate::consts::SMALL_PADDING);
        ui.vertical_centered(|ui: &mut Ui| {
            ok = ui.button("OK").clicked();
        });
    });

    if ok || response.should_close() {
        messages.pop();
    }
}

use eframe::egui;

use crate::common::ApiCommand;
use crate::ui::state::Composer;

pub fn render(ui: &mut egui::Ui, composer: &mut Composer) -> Option<ApiCommand> {
    ui.label("New post");
    ui.add(
        egui::TextEdit::multiline(&mut composer.content)
            .desired_rows(4)
            .desired_width(f32::INFINITY)
            .hint_text("What's on your mind?"),
    );

    if let Some(error) = &composer.error {
        ui.colored_label(egui::Color32::RED, error);
    }

    let label = if composer.submitting { "Publishing..." } else { "Publish" };
    if ui
        .add_enabled(composer.can_submit(), egui::Button::new(label))
        .clicked()
    {
        return composer.submit();
    }

    None
}

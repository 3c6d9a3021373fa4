use eframe::egui;

use crate::common::ApiCommand;
use crate::ui::state::LoginForm;

pub fn render(ui: &mut egui::Ui, form: &mut LoginForm) -> Option<ApiCommand> {
    let mut submit = false;

    ui.heading("Sign in");
    ui.separator();

    ui.label("Username");
    ui.text_edit_singleline(&mut form.username);

    ui.label("Password");
    let password = ui.add(egui::TextEdit::singleline(&mut form.password).password(true));
    if password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
        submit = true;
    }

    if let Some(error) = &form.error {
        ui.colored_label(egui::Color32::RED, error);
    }

    let label = if form.submitting { "Signing in..." } else { "Sign in" };
    if ui
        .add_enabled(!form.submitting, egui::Button::new(label))
        .clicked()
    {
        submit = true;
    }

    if submit { form.submit() } else { None }
}

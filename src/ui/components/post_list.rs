use chrono::{DateTime, NaiveDateTime};
use eframe::egui;

use crate::common::{Post, PostId};
use crate::ui::state::CommentBoxes;

/// Renders the feed. Returns the post whose comment button was pressed.
pub fn render(ui: &mut egui::Ui, posts: &[Post], boxes: &mut CommentBoxes) -> Option<PostId> {
    if posts.is_empty() {
        ui.label(egui::RichText::new("No posts yet. Be the first to share something!").weak());
        return None;
    }

    let mut pressed = None;
    egui::ScrollArea::vertical().show(ui, |ui| {
        for post in posts {
            ui.push_id(post.id, |ui| {
                ui.group(|ui| {
                    if render_post(ui, post, boxes) {
                        pressed = Some(post.id);
                    }
                });
            });
            ui.add_space(8.0);
        }
    });

    pressed
}

fn render_post(ui: &mut egui::Ui, post: &Post, boxes: &mut CommentBoxes) -> bool {
    ui.label(&post.content);
    let stamp = format_timestamp(post.created_at.as_deref());
    if !stamp.is_empty() {
        ui.label(egui::RichText::new(stamp).weak().small());
    }

    if !post.comments.is_empty() {
        ui.separator();
        ui.label(egui::RichText::new(format!("Comments ({})", post.comments.len())).strong());
        for comment in &post.comments {
            ui.horizontal_wrapped(|ui| {
                ui.label(&comment.content);
                let stamp = format_timestamp(comment.created_at.as_deref());
                if !stamp.is_empty() {
                    ui.label(egui::RichText::new(stamp).weak().small());
                }
            });
        }
    }

    ui.separator();
    if let Some(error) = boxes.error(post.id) {
        ui.colored_label(egui::Color32::RED, error);
    }

    let submitting = boxes.is_submitting(post.id);
    let mut send = false;
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(boxes.draft_mut(post.id)).hint_text("Write a comment..."),
        );
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            send = true;
        }
        let label = if submitting { "Sending..." } else { "Comment" };
        if ui.add_enabled(!submitting, egui::Button::new(label)).clicked() {
            send = true;
        }
    });

    send && !submitting
}

/// Human-readable timestamp, or an empty string when it cannot be parsed.
pub fn format_timestamp(raw: Option<&str>) -> String {
    const DISPLAY: &str = "%-d %B %Y, %H:%M";

    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return String::new();
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(DISPLAY).to_string();
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|parsed| parsed.format(DISPLAY).to_string())
        .unwrap_or_default()
}

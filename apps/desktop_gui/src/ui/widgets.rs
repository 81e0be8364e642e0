use contacts_core::leading_letter;
use eframe::egui;
use shared::domain::Contact;

const HEADER_HEIGHT: f32 = 26.0;
const ROW_HEIGHT: f32 = 44.0;
const BADGE_SIZE: f32 = 30.0;

pub fn section_header(ui: &mut egui::Ui, letter: &str, text_scale: f32, accent: egui::Color32) {
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), HEADER_HEIGHT * text_scale),
        egui::Sense::hover(),
    );
    ui.painter().text(
        egui::pos2(rect.left() + 10.0, rect.center().y),
        egui::Align2::LEFT_CENTER,
        letter,
        egui::FontId::proportional(13.0 * text_scale),
        accent,
    );
    ui.painter().hline(
        (rect.left() + 30.0 * text_scale)..=rect.right(),
        rect.center().y,
        egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color),
    );
}

/// Clickable contact row with an initial badge; returns the row response.
pub fn contact_row(
    ui: &mut egui::Ui,
    contact: &Contact,
    selected: bool,
    show_badge: bool,
    text_scale: f32,
    accent: egui::Color32,
) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), ROW_HEIGHT * text_scale),
        egui::Sense::click(),
    );
    let visuals = ui.visuals().clone();

    if selected {
        ui.painter().rect_filled(
            rect,
            egui::CornerRadius::same(6),
            accent.gamma_multiply(0.35),
        );
    } else if response.hovered() {
        ui.painter()
            .rect_filled(rect, egui::CornerRadius::same(6), visuals.faint_bg_color);
    }

    let row = rect.shrink2(egui::vec2(8.0, 4.0));
    let mut text_left = row.left();
    if show_badge {
        let badge_size = BADGE_SIZE * text_scale;
        let center = egui::pos2(row.left() + badge_size / 2.0, row.center().y);
        ui.painter()
            .circle_filled(center, badge_size / 2.0, accent.gamma_multiply(0.8));
        ui.painter().text(
            center,
            egui::Align2::CENTER_CENTER,
            leading_letter(&contact.name),
            egui::FontId::proportional(14.0 * text_scale),
            egui::Color32::WHITE,
        );
        text_left += badge_size + 10.0;
    }

    let name = if contact.name.trim().is_empty() {
        "(no name)"
    } else {
        contact.name.as_str()
    };
    ui.painter().text(
        egui::pos2(text_left, row.center().y - 7.0 * text_scale),
        egui::Align2::LEFT_CENTER,
        name,
        egui::FontId::proportional(14.0 * text_scale),
        visuals.strong_text_color(),
    );
    ui.painter().text(
        egui::pos2(text_left, row.center().y + 9.0 * text_scale),
        egui::Align2::LEFT_CENTER,
        &contact.phone_number,
        egui::FontId::proportional(11.5 * text_scale),
        visuals.weak_text_color(),
    );

    response.on_hover_cursor(egui::CursorIcon::PointingHand)
}

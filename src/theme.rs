use crate::uploader::UploadStatus;
use eframe::egui::{self, Color32, CornerRadius, FontId, Frame, Margin, Stroke, TextStyle};

#[derive(Debug, Clone)]
pub struct Theme {
    pub navy: Color32,
    pub navy_light: Color32,
    pub panel: Color32,
    pub input: Color32,
    pub blue: Color32,
    pub accent: Color32,
    pub info: Color32,
    pub success: Color32,
    pub danger: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub border: Color32,
    pub user_bubble: Color32,
    pub assistant_bubble: Color32,
    pub spacing_8: f32,
    pub spacing_12: f32,
    pub spacing_16: f32,
    pub radius_8: u8,
    pub radius_12: u8,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            navy: Color32::from_rgb(0x0A, 0x12, 0x24),
            navy_light: Color32::from_rgb(0x13, 0x1E, 0x38),
            panel: Color32::from_rgb(0x17, 0x24, 0x40),
            input: Color32::from_rgb(0x1D, 0x2B, 0x4A),
            blue: Color32::from_rgb(0x00, 0x82, 0xF0),
            accent: Color32::from_rgb(0x00, 0xB4, 0xE6),
            info: Color32::from_rgb(0x4F, 0xA8, 0xFF),
            success: Color32::from_rgb(0x2E, 0xC2, 0x7E),
            danger: Color32::from_rgb(0xF0, 0x4E, 0x4E),
            text_primary: Color32::from_rgb(0xF2, 0xF5, 0xFA),
            text_secondary: Color32::from_rgb(0x9A, 0xA8, 0xC0),
            border: Color32::from_rgba_premultiplied(255, 255, 255, 20),
            user_bubble: Color32::from_rgb(0x00, 0x6C, 0xC8),
            assistant_bubble: Color32::from_rgb(0x1A, 0x2A, 0x4C),
            spacing_8: 8.0,
            spacing_12: 12.0,
            spacing_16: 16.0,
            radius_8: 8,
            radius_12: 12,
        }
    }
}

impl Theme {
    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.navy;
        visuals.window_fill = self.navy_light;
        visuals.override_text_color = Some(self.text_primary);
        visuals.widgets.noninteractive.bg_fill = self.panel;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.inactive.bg_fill = self.input;
        visuals.widgets.inactive.weak_bg_fill = self.input;
        visuals.widgets.hovered.bg_fill = self.navy_light;
        visuals.widgets.active.bg_fill = self.blue;
        visuals.selection.bg_fill = self.blue;
        visuals.hyperlink_color = self.accent;
        visuals.extreme_bg_color = self.input;

        let mut style = (*ctx.style()).clone();
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
        style.text_styles.insert(TextStyle::Heading, FontId::proportional(18.0));
        style.text_styles.insert(TextStyle::Body, FontId::proportional(14.0));
        style.text_styles.insert(TextStyle::Small, FontId::proportional(11.0));
        ctx.set_style(style);
    }

    pub fn card_frame(&self) -> Frame {
        Frame::new()
            .fill(self.navy_light)
            .inner_margin(Margin::same(self.spacing_16 as i8))
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(Stroke::new(1.0, self.border))
    }

    pub fn step_frame(&self) -> Frame {
        Frame::new()
            .fill(self.panel)
            .inner_margin(Margin::same(self.spacing_12 as i8))
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(Stroke::new(1.0, self.border))
    }

    pub fn bubble_frame(&self, fill: Color32) -> Frame {
        Frame::new()
            .fill(fill)
            .inner_margin(Margin::symmetric(self.spacing_12 as i8, self.spacing_8 as i8))
            .corner_radius(CornerRadius::same(self.radius_8))
    }

    pub fn status_color(&self, status: UploadStatus) -> Color32 {
        match status {
            UploadStatus::Error => self.danger,
            UploadStatus::Success => self.success,
            _ => self.info,
        }
    }
}

use eframe::egui::{self, ColorImage, Key, TextureHandle, TextureOptions};

use crate::session::ChaosSession;
use crate::settings::SimulationSettings;
use crate::share;

const STORAGE_KEY: &str = "settings";

pub struct TapestryApp {
    session: ChaosSession,
    texture: Option<TextureHandle>,
    share_code: String,
    share_error: Option<String>,
}

impl TapestryApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = cc
            .storage
            .and_then(|storage| storage.get_string(STORAGE_KEY))
            .map(|blob| match share::decode_json(&blob) {
                Ok(settings) => settings,
                Err(err) => {
                    log::warn!("Ignoring stored settings: {err}");
                    SimulationSettings::default()
                }
            })
            .unwrap_or_default();

        let session = ChaosSession::new(settings, 800, 600);
        let share_code = share::encode_share_code(session.committed_settings()).unwrap_or_default();

        Self {
            session,
            texture: None,
            share_code,
            share_error: None,
        }
    }

    /// Writes the last committed settings; a slider mid-drag never leaks
    /// into storage or the share code.
    fn persist(&mut self, storage: &mut dyn eframe::Storage) {
        match share::encode_json(self.session.committed_settings()) {
            Ok(blob) => storage.set_string(STORAGE_KEY, blob),
            Err(err) => log::warn!("Failed to persist settings: {err}"),
        }
        self.refresh_share_code();
    }

    fn refresh_share_code(&mut self) {
        match share::encode_share_code(self.session.committed_settings()) {
            Ok(code) => self.share_code = code,
            Err(err) => log::warn!("Failed to refresh share code: {err}"),
        }
    }

    fn update_texture(&mut self, ctx: &egui::Context) {
        let [width, height] = self.session.dimensions();
        let image = ColorImage::from_rgba_unmultiplied([width, height], self.session.pixels());

        if let Some(texture) = &mut self.texture {
            texture.set(image, TextureOptions::NEAREST);
        } else {
            self.texture = Some(ctx.load_texture("chaos-tapestry", image, TextureOptions::NEAREST));
        }
    }

    /// Returns true when an edit was committed and the settings should be
    /// persisted.
    fn draw_controls(&mut self, ui: &mut egui::Ui) -> bool {
        let mut edited = false;
        let mut committed = false;

        ui.heading("Chaos Tapestry");
        {
            let settings = self.session.settings_mut();
            let mut track = |response: egui::Response| {
                edited |= response.changed();
                committed |= response.drag_stopped() || response.lost_focus();
            };

            track(ui.add(egui::Slider::new(&mut settings.seed, 0..=9999).text("seed")));
            track(ui.add(
                egui::Slider::new(&mut settings.scale, 1.0..=50.0)
                    .step_by(1.0)
                    .text("scale"),
            ));
            track(ui.add(
                egui::Slider::new(&mut settings.outer_iterations, 1..=1000)
                    .text("outer iterations"),
            ));
            track(ui.add(
                egui::Slider::new(&mut settings.inner_iterations, 1..=1000)
                    .text("inner iterations"),
            ));
            track(ui.add(
                egui::Slider::new(&mut settings.periodicity, 1..=1000).text("Q (periodicity)"),
            ));
            track(ui.add(
                egui::Slider::new(&mut settings.coupling_constant, -10.0..=10.0)
                    .step_by(0.00001)
                    .text("K (coupling)"),
            ));
            track(ui.add(
                egui::Slider::new(&mut settings.pi_factor, 1.0..=100.0)
                    .step_by(1.0)
                    .text("pi factor"),
            ));
            track(ui.add(
                egui::Slider::new(&mut settings.offset_min, -50.0..=50.0)
                    .step_by(1.0)
                    .text("offset min"),
            ));
            track(ui.add(
                egui::Slider::new(&mut settings.offset_max, -50.0..=50.0)
                    .step_by(1.0)
                    .text("offset max"),
            ));
        }

        if edited {
            self.session.apply_edits();
        }
        if committed {
            self.session.commit_edits();
        }

        ui.horizontal(|ui| {
            if ui.button("Update").clicked() {
                self.session.rerender();
            }
            if ui.button("Reset").clicked() {
                self.session.reset_to_default();
                committed = true;
            }
            let has_previous = self.session.previous().is_some();
            if ui
                .add_enabled(has_previous, egui::Button::new("Previous"))
                .clicked()
            {
                self.session.restore_previous();
                committed = true;
            }
            if ui.button("Randomize").clicked() {
                self.session.randomize();
                committed = true;
            }
        });

        ui.separator();
        ui.heading("Share code");
        ui.add(
            egui::TextEdit::multiline(&mut self.share_code)
                .desired_rows(3)
                .desired_width(f32::INFINITY)
                .font(egui::TextStyle::Monospace),
        );
        ui.horizontal(|ui| {
            if ui.button("Apply code").clicked() {
                match share::decode_share_code(&self.share_code) {
                    Ok(settings) => {
                        self.session.apply_settings(settings);
                        self.share_error = None;
                        committed = true;
                    }
                    Err(err) => {
                        log::warn!("Rejected share code: {err}");
                        self.share_error = Some(err);
                    }
                }
            }
            if ui.button("Copy").clicked() {
                ui.ctx().copy_text(self.share_code.clone());
            }
        });
        if let Some(err) = &self.share_error {
            ui.colored_label(egui::Color32::from_rgb(230, 100, 100), err);
        }

        ui.separator();
        ui.label("Pan with the arrow keys or WASD.");
        let camera = self.session.camera();
        ui.label(format!("Camera: ({:.2}, {:.2})", camera.x, camera.y));

        committed
    }

    /// One pan tick per axis per frame while a key is held.
    fn handle_camera_keys(&mut self, ctx: &egui::Context) -> bool {
        let mut direction_x = 0.0;
        let mut direction_y = 0.0;
        ctx.input(|input| {
            if input.key_down(Key::ArrowUp) || input.key_down(Key::W) {
                direction_y += 1.0;
            }
            if input.key_down(Key::ArrowDown) || input.key_down(Key::S) {
                direction_y -= 1.0;
            }
            if input.key_down(Key::ArrowLeft) || input.key_down(Key::A) {
                direction_x += 1.0;
            }
            if input.key_down(Key::ArrowRight) || input.key_down(Key::D) {
                direction_x -= 1.0;
            }
        });

        if direction_x != 0.0 || direction_y != 0.0 {
            self.session.pan(direction_x, direction_y);
            true
        } else {
            false
        }
    }
}

impl eframe::App for TapestryApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let mut persist = false;

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(290.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        persist |= self.draw_controls(ui);
                    });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let available = ui.available_size();
                let width = available.x.max(1.0) as usize;
                let height = available.y.max(1.0) as usize;
                self.session.resize(width, height);
                self.update_texture(ui.ctx());

                if let Some(texture) = &self.texture {
                    ui.image((texture.id(), texture.size_vec2()));
                }
            });

        if !ctx.wants_keyboard_input() && self.handle_camera_keys(ctx) {
            ctx.request_repaint();
        }

        if persist {
            if let Some(storage) = frame.storage_mut() {
                self.persist(storage);
            }
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.persist(storage);
    }
}

use std::time::Instant;

use eframe::egui;

use crate::config::ViewerConfig;
use crate::state::AppState;
use crate::ui::{chart, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PrevalenceApp {
    pub state: AppState,
}

impl PrevalenceApp {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for PrevalenceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Playback steps are applied before drawing so the frame shows them.
        self.state.advance_playback(now);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, now);
        });

        // ---- Left side panel: selectors ----
        egui::SidePanel::left("selection_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, now);
            });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            chart::prevalence_chart(ui, &mut self.state, now);
        });

        if self.state.transitions.is_animating(now) {
            ctx.request_repaint();
        } else if let Some(wait) = self.state.playback.time_until_next(now) {
            ctx.request_repaint_after(wait);
        }
    }
}

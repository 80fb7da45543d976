use std::f64::consts::TAU;
use std::time::Instant;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, GridMark, Plot};

use crate::data::model::{format_percent, AgeBand, PrevalenceDataset, PrevalenceRecord, Scope};
use crate::data::scale::BandScale;
use crate::state::{AppState, ChartView};
use crate::tween::MarkKey;

/// Ring radii (inner, outer) in points.
const LOCAL_RING: (f32, f32) = (70.0, 90.0);
const GLOBAL_RING: (f32, f32) = (60.0, 70.0);

/// Height of the band axis in plot units.
const BAND_EXTENT: f64 = 100.0;

/// Global bars are drawn as a thinner overlay on top of local bars.
const GLOBAL_BAR_RATIO: f64 = 0.45;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render arcs, bars and legend for the current view.
pub fn prevalence_chart(ui: &mut Ui, state: &mut AppState, now: Instant) {
    let (Some(dataset), Some(view)) = (&state.dataset, &state.view) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a prevalence CSV to begin  (File → Open…)");
        });
        return;
    };

    if !view.from_selection {
        ui.weak("Initial view. Pick a region or country, sex and classification to compare.");
    } else if view.subsets.is_empty() {
        ui.weak("No estimates match this selection.");
    }

    let mut toggle_palette = false;
    ui.horizontal_top(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            for band in [AgeBand::Children, AgeBand::Adults] {
                arc_gauge(ui, state, dataset, view, band, now);
            }
        });

        ui.vertical(|ui: &mut Ui| {
            let legend_height = 90.0;
            let plot_height = (ui.available_height() - legend_height).max(120.0);
            bar_chart(ui, state, dataset, view, plot_height, now);
            toggle_palette = legend(ui, state, dataset, view);
        });
    });

    if toggle_palette {
        state.toggle_palette();
    }
}

// ---------------------------------------------------------------------------
// Arcs
// ---------------------------------------------------------------------------

fn arc_gauge(
    ui: &mut Ui,
    state: &AppState,
    dataset: &PrevalenceDataset,
    view: &ChartView,
    band: AgeBand,
    now: Instant,
) {
    let size = Vec2::new(240.0, 260.0);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let center = response.rect.center() + Vec2::new(0.0, 10.0);
    let text_color = ui.visuals().text_color();

    painter.text(
        center - Vec2::new(0.0, 112.0),
        Align2::CENTER_CENTER,
        band.title(),
        FontId::proportional(16.0),
        text_color,
    );

    let local = view.subsets.first(dataset, Scope::Local, band);
    let global = view.subsets.first(dataset, Scope::Global, band);

    for (scope, ring) in [(Scope::Global, GLOBAL_RING), (Scope::Local, LOCAL_RING)] {
        let Some(sweep) = state.transitions.value(&MarkKey::Arc(band, scope), now) else {
            continue;
        };
        ring_segment(&painter, center, ring, sweep, state.palette.color(scope));
    }

    if let Some(rec) = local {
        painter.text(
            center,
            Align2::CENTER_CENTER,
            format_percent(rec.mean),
            FontId::proportional(22.0),
            text_color,
        );
    }
    if let Some(rec) = global {
        painter.text(
            center + Vec2::new(0.0, 20.0),
            Align2::CENTER_CENTER,
            format!("{} Global", format_percent(rec.mean)),
            FontId::proportional(12.0),
            text_color.gamma_multiply(0.5),
        );
    }

    let tooltip: Vec<String> = [local, global].into_iter().flatten().map(tooltip_text).collect();
    if !tooltip.is_empty() {
        response.on_hover_text(tooltip.join("\n\n"));
    }
}

/// Draw a ring segment sweeping clockwise from 12 o'clock by `fraction × 2π`.
fn ring_segment(
    painter: &egui::Painter,
    center: Pos2,
    (inner, outer): (f32, f32),
    fraction: f64,
    color: Color32,
) {
    let fraction = fraction.clamp(0.0, 1.0);
    if fraction <= 0.0 {
        return;
    }
    let radius = (inner + outer) / 2.0;
    let width = outer - inner;
    let steps = ((fraction * 128.0).ceil() as usize).max(2);
    let points: Vec<Pos2> = (0..=steps)
        .map(|i| {
            let angle = fraction * TAU * i as f64 / steps as f64;
            Pos2::new(
                center.x + radius * angle.sin() as f32,
                center.y - radius * angle.cos() as f32,
            )
        })
        .collect();
    painter.add(egui::Shape::line(points, Stroke::new(width, color)));
}

fn tooltip_text(rec: &PrevalenceRecord) -> String {
    let who = match rec.scope() {
        Scope::Global => "Global".to_string(),
        Scope::Local => rec.location_name.clone(),
    };
    format!(
        "{who} Prevalence: {}\nRange: {} - {}",
        format_percent(rec.mean),
        format_percent(rec.lower),
        format_percent(rec.upper)
    )
}

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

fn bar_chart(
    ui: &mut Ui,
    state: &AppState,
    dataset: &PrevalenceDataset,
    view: &ChartView,
    height: f32,
    now: Instant,
) {
    ui.strong(AgeBand::Other.title());
    let bands = BandScale::new(
        view.scales.categories.clone(),
        (0.0, BAND_EXTENT),
        state.config.band_padding,
    );
    let bandwidth = bands.bandwidth();

    let mut charts = Vec::new();
    for (scope, ratio) in [(Scope::Local, 1.0), (Scope::Global, GLOBAL_BAR_RATIO)] {
        let color = state.palette.color(scope);
        let bars: Vec<Bar> = view
            .subsets
            .get(scope, AgeBand::Other)
            .iter()
            .filter_map(|&i| {
                let rec = dataset.record(i);
                let center = bands.center(&rec.age_group)?;
                let key = MarkKey::Bar(scope, rec.age_group.clone());
                let length = state.transitions.value(&key, now).unwrap_or(rec.mean);
                Some(
                    Bar::new(center, length)
                        .width(bandwidth * ratio)
                        .name(tooltip_text(rec))
                        .fill(color),
                )
            })
            .collect();
        if !bars.is_empty() {
            charts.push(
                BarChart::new(bars)
                    .horizontal()
                    .color(color)
                    .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| bar.name.clone())),
            );
        }
    }

    let (_, max_mean) = view.scales.magnitude;
    let tick_bands = bands.clone();
    let label_bands = bands;

    Plot::new("prevalence_bars")
        .height(height)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show_grid([true, false])
        .include_x(0.0)
        .include_x(max_mean)
        .include_y(0.0)
        .include_y(BAND_EXTENT)
        .x_axis_formatter(|mark: GridMark, _range| format_percent(mark.value))
        .y_grid_spacer(move |_input| {
            tick_bands
                .categories()
                .iter()
                .filter_map(|c| tick_bands.center(c))
                .map(|value| GridMark {
                    value,
                    step_size: BAND_EXTENT,
                })
                .collect()
        })
        .y_axis_formatter(move |mark: GridMark, _range| {
            label_bands
                .categories()
                .iter()
                .find(|c| {
                    label_bands
                        .center(c)
                        .is_some_and(|center| (center - mark.value).abs() < 1e-6)
                })
                .cloned()
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Legend
// ---------------------------------------------------------------------------

/// Returns `true` when the palette toggle was clicked.
fn legend(ui: &mut Ui, state: &AppState, dataset: &PrevalenceDataset, view: &ChartView) -> bool {
    let local = view
        .subsets
        .first(dataset, Scope::Local, AgeBand::Adults)
        .or_else(|| view.subsets.first(dataset, Scope::Local, AgeBand::Other));

    swatch_row(ui, state.palette.color(Scope::Global), "Global Prevalence");
    if let Some(rec) = local {
        swatch_row(
            ui,
            state.palette.color(Scope::Local),
            &format!("{} Prevalence", rec.location_name),
        );
    }
    let metric = local.map_or(state.selection.bmi, |rec| rec.metric);
    ui.label(metric.label());
    ui.link("Change Palette").clicked()
}

fn swatch_row(ui: &mut Ui, color: Color32, text: &str) {
    ui.horizontal(|ui: &mut Ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(10.0), Sense::hover());
        ui.painter().rect_filled(rect, 0.0, color);
        ui.label(text);
    });
}

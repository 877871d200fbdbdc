// src/gui/components/map_view.rs
//
// Map page: metric and clip controls, frame slider, legend, and the region
// table of the current frame with a color swatch per row. Polygons are not
// drawn.

use eframe::egui::{self, Color32, RichText, Sense};
use egui_extras::{Column, TableBuilder};

use crate::{
    choropleth::{hex, Metric},
    gui::app::App,
};

pub fn draw_controls(ui: &mut egui::Ui, app: &mut App) {
    let mut rebuild = false;
    ui.horizontal(|ui| {
        let gui = &mut app.state.gui;
        ui.label("Métrica:");
        egui::ComboBox::from_id_salt("map_metric")
            .selected_text(gui.map_metric.label())
            .show_ui(ui, |ui| {
                for m in Metric::ALL {
                    rebuild |= ui.selectable_value(&mut gui.map_metric, m, m.label()).changed();
                }
            });
        rebuild |= ui.checkbox(&mut gui.map_clip, "Limitar escala aos percentis 5–95").changed();
    });
    if rebuild {
        logf!("UI: map metric={:?} clip={}", app.state.gui.map_metric, app.state.gui.map_clip);
        app.rebuild_map();
    }

    let Some(map) = app.map.as_ref() else {
        ui.label("Clique em BUSCAR para carregar emendas e polígonos.");
        return;
    };
    if map.frames.is_empty() {
        ui.label("Nenhuma data válida nas emendas.");
        return;
    }

    let last = map.frames.len() - 1;
    let label = map.frame(app.state.gui.map_frame).map(|f| f.label.clone()).unwrap_or_default();
    let mut frame = app.state.gui.map_frame.min(last);
    let moved = ui.horizontal(|ui| {
        ui.label("Data:");
        let r = ui.add(egui::Slider::new(&mut frame, 0..=last).show_value(false)).changed();
        ui.label(RichText::new(label).monospace());
        r
    }).inner;
    if moved {
        app.state.gui.map_frame = frame;
        app.rebuild_view();
    }
}

fn swatch(ui: &mut egui::Ui, color: Option<[u8; 3]>) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(18.0, 12.0), Sense::hover());
    let fill = color.map_or(Color32::GRAY, |[r, g, b]| Color32::from_rgb(r, g, b));
    ui.painter().rect_filled(rect, 2.0, fill);
}

fn legend(ui: &mut egui::Ui, app: &App) {
    let Some(map) = app.map.as_ref() else { return };
    let Some(bounds) = map.bounds else {
        ui.label("Sem valores para a métrica escolhida.");
        return;
    };
    ui.horizontal(|ui| {
        ui.label(format!("{:.2}", bounds.lower));
        ui.spacing_mut().item_spacing.x = 0.0;
        for i in 0..=24 {
            swatch(ui, Some(map.scale.at(i as f64 / 24.0)));
        }
        ui.spacing_mut().item_spacing.x = 8.0;
        ui.label(format!("{:.2}", bounds.upper));
        ui.label(RichText::new(map.metric.label()).weak());
    });
    if !map.unmatched_codes.is_empty() {
        ui.label(RichText::new(format!("{} código(s) sem polígono", map.unmatched_codes.len())).weak());
    }
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    legend(ui, app);
    ui.separator();

    let Some(map) = app.map.as_ref() else { return };
    let Some(frame) = map.frame(app.state.gui.map_frame) else { return };

    TableBuilder::new(ui)
        .striped(true)
        .id_salt("map_regions")
        .column(Column::exact(26.0))
        .column(Column::initial(90.0))
        .column(Column::initial(240.0).clip(true))
        .column(Column::initial(140.0))
        .column(Column::initial(80.0))
        .column(Column::remainder())
        .header(22.0, |mut h| {
            for t in ["", "Código", "Município", "Valor (R$)", "Cor", "Polígono"] {
                h.col(|ui| { ui.strong(t); });
            }
        })
        .body(|body| {
            body.rows(18.0, frame.regions.len(), |mut row| {
                let Some(r) = frame.regions.get(row.index()) else { return };
                row.col(|ui| swatch(ui, r.color));
                row.col(|ui| { ui.label(r.code.to_string()); });
                row.col(|ui| { ui.label(&r.name); });
                row.col(|ui| { ui.label(r.value.map(|v| format!("{v:.2}")).unwrap_or_default()); });
                row.col(|ui| { ui.monospace(r.color.map(hex).unwrap_or_default()); });
                row.col(|ui| { ui.label(if r.matched { "Sim" } else { "Não" }); });
            });
        });
}

// src/gui/components/filter_panel.rs
//
// "Filtrar o resultado" toggle plus one multi-select per categorical column.
// Every change rebuilds the view through FilterState, so the table always
// reflects the stored selection.

use eframe::egui;

use crate::{
    config::options::PageKind,
    gui::app::App,
    specs::camara::{COL_SITUACAO, COL_TIPO},
};

pub fn draw(ui: &mut egui::Ui, app: &mut App, kind: PageKind) {
    let Some(enabled) = app.filter_enabled_mut(kind) else { return };
    let mut changed = ui.checkbox(enabled, "Filtrar o resultado").changed();
    let enabled = *enabled;

    if enabled {
        if let Some(table) = app.tables.get(&kind) {
            app.filters.entry(kind).or_default().init_from(table);
        }
        if let Some(filter) = app.filters.get_mut(&kind) {
            let options = filter.options().clone();
            ui.horizontal_top(|ui| {
                for (column, values) in [(COL_TIPO, &options.tipo), (COL_SITUACAO, &options.situacao)] {
                    let selected = match column {
                        COL_TIPO => filter.selection().tipo.clone(),
                        _ => filter.selection().situacao.clone(),
                    };
                    egui::CollapsingHeader::new(format!("{column} ({}/{})", selected.len(), values.len()))
                        .id_salt((kind, column))
                        .show(ui, |ui| {
                            egui::ScrollArea::vertical().max_height(160.0).id_salt((kind, column, "scroll")).show(ui, |ui| {
                                for v in values {
                                    let mut on = selected.contains(v);
                                    let label = if v.is_empty() { "(vazio)" } else { v.as_str() };
                                    if ui.checkbox(&mut on, label).changed() {
                                        filter.toggle(column, v, on);
                                        changed = true;
                                    }
                                }
                            });
                        });
                }
            });
        } else {
            ui.label("Busque os dados para habilitar o filtro.");
        }
    }

    if changed {
        logd!("UI: filter changed for {:?} (enabled={})", kind, enabled);
        app.rebuild_view();
    }
}

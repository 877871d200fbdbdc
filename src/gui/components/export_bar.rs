// src/gui/components/export_bar.rs
//
// Export settings (format, header row, target file) and the page actions.
// Copiar/Exportar act on `app.view`, i.e. the table as currently filtered.

use eframe::egui::{self, Color32, RichText};

use crate::{
    config::options::ExportFormat,
    gui::{actions, app::App},
};

fn settings_row(ui: &mut egui::Ui, app: &mut App) {
    let mut format_changed = false;
    ui.horizontal(|ui| {
        let export = &mut app.state.options.export;
        ui.label("Formato:");
        for (fmt, text) in [(ExportFormat::Csv, "CSV"), (ExportFormat::Tsv, "TSV")] {
            format_changed |= ui.selectable_value(&mut export.format, fmt, text).changed();
        }
        if ui.checkbox(&mut export.include_headers, "Incluir cabeçalho").changed() {
            logf!("UI: include_headers → {}", export.include_headers);
        }

        ui.separator();
        ui.label("Arquivo:");
        let field = egui::TextEdit::singleline(&mut app.out_path_text)
            .font(egui::TextStyle::Monospace)
            .desired_width(320.0);
        if ui.add(field).changed() {
            app.out_path_dirty = true;
        }
    });

    if format_changed {
        logf!("UI: export format → {:?}", app.state.options.export.format);
        app.sync_out_path_text();
    }
}

fn actions_row(ui: &mut egui::Ui, app: &mut App) {
    let idle = app.running.is_none();
    ui.horizontal(|ui| {
        if ui.button("Copiar").clicked() {
            actions::copy(app, ui.ctx());
        }
        if ui.button("Exportar").clicked() {
            actions::export(app);
        }

        let buscar = egui::Button::new(RichText::new("BUSCAR").color(Color32::BLACK).strong())
            .fill(Color32::from_rgb(220, 30, 30));
        if ui.add_enabled(idle, buscar).clicked() {
            actions::fetch(app, false);
        }
        let atualizar = ui.add_enabled(idle, egui::Button::new("Atualizar"))
            .on_hover_text("Ignora o cache de uma hora e consulta de novo");
        if atualizar.clicked() {
            actions::fetch(app, true);
        }

        if !idle {
            ui.spinner();
        }
        ui.label(total_label(app.fetched_rows(), app.view.row_count()));
    });
}

/// The total counts everything fetched; the filtered count is added when it differs.
fn total_label(fetched: usize, shown: usize) -> String {
    if fetched == shown {
        format!("Total: {fetched} linha(s)")
    } else {
        format!("Total: {fetched} linha(s), exibindo {shown}")
    }
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    settings_row(ui, app);
    actions_row(ui, app);
}

#[cfg(test)]
mod tests {
    use super::total_label;

    #[test]
    fn total_ignores_the_filter() {
        assert_eq!(total_label(12, 12), "Total: 12 linha(s)");
        assert_eq!(total_label(12, 3), "Total: 12 linha(s), exibindo 3");
        assert_eq!(total_label(0, 0), "Total: 0 linha(s)");
    }
}

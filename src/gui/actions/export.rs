// src/gui/actions/export.rs
use eframe::egui;

use crate::{file, gui::app::App};

fn apply_out_path(app: &mut App) {
    // normalize out_path first (mutates app) before any &app borrows
    if app.out_path_dirty {
        app.state.options.export.set_path(&app.out_path_text);
        logf!("Export: Out path set → {}", app.state.options.export.out_path().display());
        app.out_path_dirty = false;
    }
}

/// Write what the table shows (filtered) to the chosen file.
pub fn export(app: &mut App) {
    apply_out_path(app);

    if app.view.rows.is_empty() {
        logd!("Export: Clicked, but there's nothing to export");
        app.status("Nada para exportar");
        return;
    }

    let kind = app.current_page_kind();
    logf!(
        "Export: Begin page={:?}, rows={}, headers={}",
        kind, app.view.row_count(), app.view.header_count()
    );

    let msg = match file::write_export_single(&app.state.options.export, &app.view) {
        Ok(path) => {
            logf!("Export: OK → {}", path.display());
            format!("Exportado: {}", path.display())
        }
        Err(e) => {
            loge!("Export: Error: {}", e);
            format!("Erro ao exportar: {e}")
        }
    };
    app.status(msg);
}

pub fn copy(app: &mut App, ui_ctx: &egui::Context) {
    if app.view.rows.is_empty() {
        logd!("Copy: Clicked, but there's nothing to copy");
        app.status("Nada para copiar");
        return;
    }
    let txt = file::export_string(&app.state.options.export, &app.view);
    logf!("Copy: page={:?}, rows={}", app.current_page_kind(), app.view.row_count());
    ui_ctx.copy_text(txt);
    app.status("Copiado para a área de transferência");
}

// src/gui/components/data_table.rs
//
// Draws the live table from `app.view`. Purely a view.

use eframe::egui::{self, Align, Layout, RichText, TextWrapMode};
use egui_extras::{Column, TableBuilder};

use crate::gui::app::App;

/// Initial width per column; wide text columns get more room.
fn initial_width(header: &str) -> f32 {
    match header {
        "Ementa" => 420.0,
        "Autor" | "Tramitação" | "Situação" | "Município" => 220.0,
        "Data e Hora" | "Data" => 140.0,
        _ => 90.0,
    }
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let page = app.current_page();
    let kind = page.kind();
    let view = &app.view;

    let headers: Vec<String> = view.headers.clone()
        .or_else(|| page.columns().map(|c| c.iter().map(|x| s!(*x)).collect()))
        .unwrap_or_default();
    let cols = headers.len().max(view.rows.first().map_or(0, |r| r.len()));
    if cols == 0 {
        ui.label("Sem dados. Clique em BUSCAR.");
        return;
    }
    let numeric = page.numeric_columns();

    // Ensure scroll bars allocate space (not floating over content)
    {
        let s = &mut ui.style_mut().spacing.scroll;
        s.floating = false;
        s.bar_width = 10.0;
        s.handle_min_length = 48.0;
    }

    let avail_h = ui.available_height();
    egui::ScrollArea::horizontal()
        .id_salt("inner_table_hscroll")
        .max_height(avail_h)
        .show(ui, |ui| {
            let mut table = TableBuilder::new(ui)
                .striped(true)
                .min_scrolled_height(0.0)
                .id_salt(("table_state", kind));
            for ci in 0..cols {
                let w = headers.get(ci).map_or(90.0, |h| initial_width(h));
                table = table.column(Column::initial(w).resizable(true).clip(true).at_least(20.0));
            }

            table
                .header(24.0, |mut header| {
                    for ci in 0..cols {
                        header.col(|ui| {
                            let text = headers.get(ci).cloned().unwrap_or_else(|| format!("Col {}", ci + 1));
                            ui.add(egui::Label::new(RichText::new(text).strong()).selectable(false));
                        });
                    }
                })
                .body(|body| {
                    body.rows(20.0, view.rows.len(), |mut row| {
                        let Some(data) = view.rows.get(row.index()) else { return };
                        for ci in 0..cols {
                            let cell = data.get(ci).map(String::as_str).unwrap_or_default();
                            row.col(|ui| {
                                ui.style_mut().wrap_mode = Some(TextWrapMode::Truncate);
                                let label = egui::Label::new(cell).truncate();
                                if numeric.contains(&ci) {
                                    ui.centered_and_justified(|ui| { ui.add(label).on_hover_text(cell); });
                                } else {
                                    ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                                        ui.add(label).on_hover_text(cell);
                                    });
                                }
                            });
                        }
                    });
                });
        });
}

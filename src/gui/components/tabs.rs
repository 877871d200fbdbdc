// src/gui/components/tabs.rs
//
// Renders the top tabs and performs the tab switch itself. On switch the
// table view is rebuilt from the page's canonical data, and the export file
// name follows the page unless the user typed one.

use eframe::egui;

use crate::gui::{app::App, router};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let pages = router::all_pages();
        let cur = app.current_index();

        for (idx, page) in pages.iter().enumerate() {
            let selected = idx == cur;
            let title = if app.running == Some(page.kind()) {
                format!("{} ⏳", page.title())
            } else {
                s!(page.title())
            };

            if ui.selectable_label(selected, title).clicked() && !selected {
                let prev = app.current_page_kind();
                app.set_current_index(idx);
                let new_kind = page.kind();
                logf!("UI: Tab switch {:?} → {:?}", prev, new_kind);

                app.state.options.export.set_default_stem_for_page(new_kind);
                app.sync_out_path_text();
                app.rebuild_view();
            }
        }
    });
}

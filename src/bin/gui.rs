// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use eframe::egui::{IconData, ViewportBuilder};
use monitor_legislativo::gui;

/// 32×32 icon drawn in code: a YlOrRd gradient square with a dark border.
fn app_icon() -> IconData {
    use monitor_legislativo::choropleth::ColorScale;

    const SIDE: u32 = 32;
    let mut rgba = Vec::with_capacity((SIDE * SIDE * 4) as usize);
    for y in 0..SIDE {
        for x in 0..SIDE {
            let border = x < 2 || y < 2 || x >= SIDE - 2 || y >= SIDE - 2;
            let [r, g, b] = if border {
                [0x55, 0x22, 0x22]
            } else {
                ColorScale::YlOrRd.at((x + y) as f64 / (2 * (SIDE - 1)) as f64)
            };
            rgba.extend_from_slice(&[r, g, b, 0xff]);
        }
    }
    IconData { rgba, width: SIDE, height: SIDE }
}

fn main() {
    if let Err(e) = monitor_legislativo::log::init() {
        eprintln!("log disabled: {e}");
    }

    let options = eframe::NativeOptions {
        // eframe 0.32: icon set via viewport builder
        viewport: ViewportBuilder::default()
            .with_icon(app_icon())
            .with_title("Monitor legislativo RS"),
        ..Default::default()
    };

    if let Err(e) = gui::run(options) {
        eprintln!("GUI failed: {e}");
        std::process::exit(1);
    }
}

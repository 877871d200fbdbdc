// src/gui/progress.rs
use std::sync::{Arc, Mutex};

use eframe::egui;

use crate::progress::Progress;

/// Writes progress into the shared status line and wakes the UI.
pub struct GuiProgress {
    status: Arc<Mutex<String>>,
    ctx: egui::Context,
    done: usize,
    failed: usize,
    total: usize,
}

impl GuiProgress {
    pub fn new(status: Arc<Mutex<String>>, ctx: egui::Context) -> Self {
        Self { status, ctx, done: 0, failed: 0, total: 0 }
    }

    fn set_status(&self, msg: impl Into<String>) {
        *self.status.lock().unwrap_or_else(|p| p.into_inner()) = msg.into();
        self.ctx.request_repaint();
    }
}

impl Progress for GuiProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
        self.failed = 0;
    }
    fn log(&mut self, msg: &str) {
        self.set_status(msg);
    }
    fn item_done(&mut self, label: &str) {
        self.done += 1;
        if self.total > 0 {
            self.set_status(format!("Detalhando {label} ({}/{})", self.done, self.total));
        } else {
            self.set_status(format!("Recebido: {label}"));
        }
    }
    fn item_failed(&mut self, label: &str) {
        self.done += 1;
        self.failed += 1;
        self.set_status(format!("Falha parcial em {label} ({}/{})", self.done, self.total));
    }
    fn finish(&mut self) {
        if self.total == 0 {
            self.set_status("Consulta concluída");
        } else if self.failed > 0 {
            self.set_status(format!("Consulta concluída ({}/{}, {} com falha)", self.done, self.total, self.failed));
        } else {
            self.set_status(format!("Consulta concluída ({}/{})", self.done, self.total));
        }
    }
}

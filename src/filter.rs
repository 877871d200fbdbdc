// src/filter.rs
//! Per-page categorical filter on the two columns shared by both proposition
//! tables. The first call captures the distinct values as the default
//! selection; later calls narrow by whatever is stored. Narrowing the same
//! table twice with the same selection gives the same rows.

use std::collections::HashSet;

use crate::engine::Table;
use crate::specs::camara::{COL_SITUACAO, COL_TIPO};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub tipo: Vec<String>,
    pub situacao: Vec<String>,
}

impl Selection {
    /// Distinct values of both filter columns, in order of first appearance.
    pub fn distinct_of(table: &Table) -> Self {
        Self { tipo: table.distinct(COL_TIPO), situacao: table.distinct(COL_SITUACAO) }
    }

    pub fn values_mut(&mut self, column: &str) -> Option<&mut Vec<String>> {
        match column {
            COL_TIPO => Some(&mut self.tipo),
            COL_SITUACAO => Some(&mut self.situacao),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FilterState {
    initialized: bool,
    /// Everything selectable in the current table.
    options: Selection,
    selected: Selection,
}

impl FilterState {
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn options(&self) -> &Selection {
        &self.options
    }

    pub fn selection(&self) -> &Selection {
        &self.selected
    }

    /// First use only: every distinct value becomes selectable and selected.
    pub fn init_from(&mut self, table: &Table) {
        if self.initialized {
            return;
        }
        self.options = Selection::distinct_of(table);
        self.selected = self.options.clone();
        self.initialized = true;
        logd!(
            "Filter: initialized with {} tipo(s), {} situação(ões)",
            self.options.tipo.len(), self.options.situacao.len()
        );
    }

    /// Forget the captured values; the next `init_from` starts over.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Flip one value in or out of the stored selection.
    pub fn toggle(&mut self, column: &str, value: &str, on: bool) {
        let Some(values) = self.selected.values_mut(column) else { return };
        let present = values.iter().any(|v| v == value);
        if on && !present {
            values.push(s!(value));
        } else if !on && present {
            values.retain(|v| v != value);
        }
    }

    /// Toggle off → the table unchanged. Toggle on → store `choice` when
    /// given and different, then narrow by the stored selection.
    pub fn apply(&mut self, table: &Table, enabled: bool, choice: Option<Selection>) -> Table {
        self.init_from(table);
        if !enabled {
            return table.clone();
        }
        if let Some(choice) = choice {
            if choice != self.selected {
                logd!("Filter: selection changed");
                self.selected = choice;
            }
        }
        narrow(table, &self.selected)
    }
}

/// Rows whose Tipo and Situação are both selected. A table without those
/// columns (schema-less empty) passes through.
pub fn narrow(table: &Table, selection: &Selection) -> Table {
    if table.columns.is_empty() {
        return table.clone();
    }
    let tipos: HashSet<&str> = selection.tipo.iter().map(String::as_str).collect();
    let situacoes: HashSet<&str> = selection.situacao.iter().map(String::as_str).collect();
    let mut out = table.clone();
    out.retain_in(COL_TIPO, &tipos);
    out.retain_in(COL_SITUACAO, &situacoes);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Column, ColumnKind, Value};

    fn table() -> Table {
        let col = |label: &str| Column { key: s!(label), label: s!(label), kind: ColumnKind::Text };
        let row = |t: &str, s: &str| vec![Value::Text(s!(t)), Value::Text(s!(s))];
        Table {
            columns: vec![col(COL_TIPO), col(COL_SITUACAO)],
            rows: vec![
                row("PL", "Aguardando Parecer"),
                row("PEC", "Arquivada"),
                row("PL", "Arquivada"),
                row("REQ", "Aprovada"),
            ],
        }
    }

    #[test]
    fn first_use_selects_everything() {
        let mut f = FilterState::default();
        let out = f.apply(&table(), true, None);
        assert_eq!(out.len(), 4);
        assert_eq!(f.selection().tipo, ["PL", "PEC", "REQ"]);
        assert_eq!(f.options().situacao, ["Aguardando Parecer", "Arquivada", "Aprovada"]);
    }

    #[test]
    fn disabled_returns_everything() {
        let mut f = FilterState::default();
        f.init_from(&table());
        f.toggle(COL_TIPO, "PL", false);
        assert_eq!(f.apply(&table(), false, None).len(), 4);
    }

    #[test]
    fn unchanged_choice_still_narrows() {
        let mut f = FilterState::default();
        let choice = Selection { tipo: vec![s!("PL")], situacao: vec![s!("Arquivada")] };
        let first = f.apply(&table(), true, Some(choice.clone()));
        let second = f.apply(&table(), true, Some(choice.clone()));
        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
        assert_eq!(narrow(&first, &choice), first);
    }

    #[test]
    fn toggle_edits_stored_selection() {
        let mut f = FilterState::default();
        f.init_from(&table());
        f.toggle(COL_SITUACAO, "Arquivada", false);
        assert_eq!(f.apply(&table(), true, None).len(), 2);
        f.toggle(COL_SITUACAO, "Arquivada", true);
        assert_eq!(f.apply(&table(), true, None).len(), 4);
    }
}

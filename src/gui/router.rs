// src/gui/router.rs
use super::pages::{self, Page};

pub static PAGES: &[&'static dyn Page] = &[
    &pages::camara::PAGE,
    &pages::senado::PAGE,
    &pages::emendas::PAGE,
    &pages::mapa::PAGE,
];

pub fn all_pages() -> &'static [&'static dyn Page] {
    PAGES
}

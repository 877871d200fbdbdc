// src/progress.rs
//
// Status reporting for the fetch and enrichment loops. The GUI turns these
// calls into its status line, the CLI prints them to stderr.

pub trait Progress {
    /// A phase starts. `total` is 0 when the item count is not known yet
    /// (listing pages).
    fn begin(&mut self, _total: usize) {}

    fn log(&mut self, _msg: &str) {}

    /// `label` is a page number or a proposition id.
    fn item_done(&mut self, _label: &str) {}

    /// The item is kept with default values and the run goes on.
    fn item_failed(&mut self, _label: &str) {}

    /// Always called, also after an error.
    fn finish(&mut self) {}
}

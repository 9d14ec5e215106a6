// src/progress.rs
/// Lightweight progress reporting used by long-running operations (extract/transform).
/// Frontends (GUI/CLI) implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items (0 if unknown).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one logical unit completes (e.g., a page of deals was fetched).
    fn item_done(&mut self, _done: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Collects log lines; handy for tests and for the GUI's status history.
#[derive(Default, Debug)]
pub struct VecProgress {
    pub lines: Vec<String>,
    pub done: usize,
}

impl Progress for VecProgress {
    fn log(&mut self, msg: &str) { self.lines.push(s!(msg)); }
    fn item_done(&mut self, done: usize) { self.done = done; }
}

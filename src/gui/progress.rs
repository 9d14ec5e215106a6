// src/gui/progress.rs
use std::sync::{Arc, Mutex};
use crate::progress::Progress;

pub struct GuiProgress {
    status: Arc<Mutex<String>>,
    done: usize,
}

impl GuiProgress {
    pub fn new(status: Arc<Mutex<String>>) -> Self {
        Self { status, done: 0 }
    }
    fn set_status(&self, msg: impl Into<String>) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }
}

impl Progress for GuiProgress {
    fn log(&mut self, msg: &str) {
        logd!("Progress: {msg}");
        self.set_status(s!(msg));
    }
    fn item_done(&mut self, done: usize) {
        self.done = done;
    }
    fn finish(&mut self) {
        if self.done == 0 {
            self.set_status(s!("Refresh finished"));
        } else {
            self.set_status(format!("Refresh finished ({} page(s))", self.done));
        }
    }
}

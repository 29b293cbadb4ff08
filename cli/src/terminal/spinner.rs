use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// The spinner currently on screen, if any. Log lines go above it.
static SPINNER: Mutex<Option<ProgressBar>> = Mutex::new(None);

pub fn start(message: String) {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_strings(TICK_STRINGS));
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));

    if let Ok(mut slot) = SPINNER.lock() {
        if let Some(previous) = slot.replace(pb) {
            previous.finish_and_clear();
        }
    }
}

pub fn set_message(message: String) {
    if let Ok(slot) = SPINNER.lock() {
        if let Some(pb) = slot.as_ref() {
            pb.set_message(message);
        }
    }
}

pub fn finish() {
    if let Ok(mut slot) = SPINNER.lock() {
        if let Some(pb) = slot.take() {
            pb.finish_and_clear();
        }
    }
}

pub fn report_connect_progress(done: usize, total: usize) {
    set_message(format!(
        "Finished {} of {} connect scans...",
        done.to_string().green().bold(),
        total
    ));
}

/// Log sink that prints above an active spinner instead of through it.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(slot) = SPINNER.lock() {
            if let Some(pb) = slot.as_ref().filter(|pb| !pb.is_hidden()) {
                let msg = String::from_utf8_lossy(buf);
                pb.println(msg.trim_end());
                return Ok(buf.len());
            }
        }
        io::stdout().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

//! Terminal progress spinner.
//!
//! The spinner runs on its own thread and redraws one stderr line every
//! [`TICK`]. It also acts as the merge observer so the line can show how many
//! tensors are done. Nothing is drawn when stderr is not a terminal.

use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use orbit_merge::{MergeObserver, MergeSummary, TensorOutcome};

const TICK: Duration = Duration::from_millis(80);
const CLEAR_LINE: &str = "\x1b[2K\r";

#[cfg(windows)]
const FRAMES: &[&str] = &["o", "0", ".", "\\"];
#[cfg(not(windows))]
const FRAMES: &[&str] = &["⠋", "⠙", "⠸", "⠴", "⠦", "⠇"];

#[derive(Default)]
struct Progress {
    stop: AtomicBool,
    done: AtomicUsize,
    total: AtomicUsize,
}

/// Animated `[orbit]` label with a tensor counter.
pub struct Spinner {
    progress: Arc<Progress>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    /// Start drawing, unless stderr is not a terminal.
    pub fn start(label: &str, extra: String) -> Self {
        if !std::io::stderr().is_terminal() {
            return Self::disabled();
        }

        let progress = Arc::new(Progress::default());
        let shared = Arc::clone(&progress);
        let label = label.to_string();
        let handle = thread::spawn(move || animate(&label, &extra, &shared));

        Spinner {
            progress,
            handle: Some(handle),
        }
    }

    /// A spinner that only counts and never draws.
    pub fn disabled() -> Self {
        Spinner {
            progress: Arc::new(Progress::default()),
            handle: None,
        }
    }

    /// Stop the animation and wait for the drawing thread.
    pub fn finish(&mut self) {
        self.progress.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    #[cfg(test)]
    fn counts(&self) -> (usize, usize) {
        (
            self.progress.done.load(Ordering::Relaxed),
            self.progress.total.load(Ordering::Relaxed),
        )
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.finish();
    }
}

impl MergeObserver for Spinner {
    fn on_start(&self, total: usize) {
        self.progress.total.store(total, Ordering::Relaxed);
    }

    fn on_tensor(&self, _name: &str, _outcome: &TensorOutcome) {
        self.progress.done.fetch_add(1, Ordering::Relaxed);
    }

    fn on_finish(&self, summary: &MergeSummary) {
        self.progress
            .done
            .store(summary.tensors_written(), Ordering::Relaxed);
    }
}

fn animate(label: &str, extra: &str, progress: &Progress) {
    let mut stderr = std::io::stderr();
    let mut tick = 0usize;
    while !progress.stop.load(Ordering::Acquire) {
        let line = render_frame(
            label,
            tick,
            extra,
            progress.done.load(Ordering::Relaxed),
            progress.total.load(Ordering::Relaxed),
        );
        let _ = write!(stderr, "{}{}", CLEAR_LINE, line);
        let _ = stderr.flush();
        thread::sleep(TICK);
        tick = tick.wrapping_add(1);
    }
    let _ = writeln!(stderr, "{}[{}] done", CLEAR_LINE, label);
    let _ = stderr.flush();
}

/// One spinner line.
///
/// A frame glyph replaces one letter of `label`; the glyph moves to the next
/// letter after every full cycle of frames.
pub fn render_frame(label: &str, tick: usize, extra: &str, done: usize, total: usize) -> String {
    let mut letters: Vec<String> = label.chars().map(String::from).collect();
    if !letters.is_empty() {
        let pos = (tick / FRAMES.len()) % letters.len();
        letters[pos] = FRAMES[tick % FRAMES.len()].to_string();
    }

    let mut line = format!("[{}]", letters.concat());
    if !extra.is_empty() {
        line.push(' ');
        line.push_str(extra);
    }
    if total > 0 {
        line.push_str(&format!(" {}/{}", done.min(total), total));
    }
    line
}

/// The parameter line shown next to the spinner.
pub fn params_label(alpha_par: f32, alpha_orth: f32, trust_k: f32) -> String {
    format!(
        "α∥={:.2} α⟂={:.2} trust={:.1}",
        alpha_par, alpha_orth, trust_k
    )
}

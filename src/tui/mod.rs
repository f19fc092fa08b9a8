//! Interactive test explorer.
//!
//! Provides a terminal UI with:
//! - Code and category views of the discovered tests
//! - Live status of running cases
//! - A detail pane for the selected case or node

mod app;
mod event;
mod ui;

pub use app::{App, Progress};
pub use event::{Event, EventHandler};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::panic::{self, PanicHookInfo};
use std::time::Duration;
use tracing::error;

use crate::executor::panic_reason;

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Sends panic reports to the log instead of the terminal until dropped.
///
/// Panicking tests are caught by the engine, but the process-wide hook would
/// still print over the alternate screen.
struct LogPanics {
    previous: Option<PanicHook>,
}

impl LogPanics {
    fn install() -> Self {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(log_panic));
        Self {
            previous: Some(previous),
        }
    }
}

impl Drop for LogPanics {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            panic::set_hook(previous);
        }
    }
}

fn log_panic(info: &PanicHookInfo<'_>) {
    let reason = panic_reason(info.payload());
    match info.location() {
        Some(location) => error!(
            "Panic at {}:{}: {}",
            location.file(),
            location.line(),
            reason
        ),
        None => error!("Panic: {}", reason),
    }
}

/// Run the explorer until the user quits.
pub async fn run(app: &mut App, tick_rate: Duration) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let panics = LogPanics::install();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal, tick_rate).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    drop(panics);

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const MARKER: &str = "caseview-hook-marker";

    #[test]
    fn test_panic_hook_swapped_and_restored() {
        // Counts only panics carrying MARKER so panics of parallel tests do not interfere
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let original = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if info.payload().downcast_ref::<&str>() == Some(&MARKER) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }));

        let guard = LogPanics::install();
        assert!(panic::catch_unwind(|| panic!("caseview-hook-marker")).is_err());
        assert_eq!(seen.load(Ordering::SeqCst), 0);

        drop(guard);
        assert!(panic::catch_unwind(|| panic!("caseview-hook-marker")).is_err());
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        panic::set_hook(original);
    }
}

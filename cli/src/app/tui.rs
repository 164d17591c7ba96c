//! TUI (Terminal User Interface) runtime loop.
//!
//! This module contains the terminal setup, event loop, and teardown
//! logic for running the dashboard.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use color_eyre::eyre::{Result, WrapErr};
use crossterm::{
    cursor::{Hide, Show},
    event, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use powerdash_platform::MacOSSampler;
use ratatui::prelude::*;
use tracing::{debug, info, warn};

use crate::config::UserConfig;
use crate::input;
use crate::ui;

use super::{App, TICK_INTERVAL};

/// Sets up the terminal for TUI mode.
///
/// Enables raw mode, switches to the alternate screen buffer and hides the
/// cursor.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// Disables raw mode and returns to the main screen buffer.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Restores the terminal before the previous panic hook prints its report.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        previous(panic_info);
    }));
}

/// Routes SIGINT into a flag the loop checks each tick.
fn install_interrupt_handler() -> Result<Arc<AtomicBool>> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })
    .wrap_err("Failed to install interrupt handler")?;
    Ok(interrupted)
}

/// Entry point for running the dashboard.
///
/// Sets up the terminal, runs the main event loop, and restores the terminal
/// when finished.
pub fn run_tui(user_config: UserConfig) -> Result<()> {
    let interrupted = install_interrupt_handler()?;
    install_panic_hook();

    let mut terminal = setup_terminal()?;
    let result = run_tui_loop(&mut terminal, &user_config, &interrupted);
    restore_terminal(&mut terminal)?;
    result
}

/// The main dashboard loop.
///
/// Each tick reads at most one pending key, refreshes samples when due,
/// redraws the whole frame and then waits up to [`TICK_INTERVAL`].
fn run_tui_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    user_config: &UserConfig,
    interrupted: &AtomicBool,
) -> Result<()> {
    let mut app = App::new(MacOSSampler::new(), user_config);
    let mut tick_count: u64 = 0;

    loop {
        if interrupted.load(Ordering::SeqCst) {
            info!("Interrupted, shutting down");
            break;
        }

        if let Some(key) = input::poll_latest_key()? {
            let action = input::handle_key(key);
            debug!(?key, ?action, "Key pressed");
            if !app.handle_action(action) {
                info!("Quit requested");
                break;
            }
        }

        tick_count += 1;
        if app.tick(Instant::now()) {
            debug!(tick_count, "Samples refreshed");
        }

        if app.state.is_ready() {
            terminal.draw(|frame| ui::render(frame, &app, Local::now(), Instant::now()))?;
        } else {
            warn!("No samples available after tick");
        }

        // Wakes early on input so key presses feel immediate.
        event::poll(TICK_INTERVAL)?;
    }

    Ok(())
}

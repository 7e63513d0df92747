use std::panic::{self, PanicHookInfo};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event as CrosstermEvent};
use tracing::{error, info};

use kaam_app::{AppConfig, AsyncTaskService, TaskService, TaskStore};

mod app;
mod boundary;
pub mod constants;
mod editor;
mod handlers;
mod terminal;
mod view;
mod widgets;

use self::app::App;
use self::constants::TUI_TICK_RATE_MS;
use self::handlers::handle_ui_action;
use self::terminal::CrosstermTerminal;
use self::view::Ui;

/// Launch the interactive TUI.
///
/// Mutations run on a small tokio runtime so the simulated latency never
/// blocks drawing. Pending mutations are awaited before returning.
pub fn run<S: TaskStore + Send + 'static>(store: S, config: &AppConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .context("failed to start the mutation runtime")?;

    let service = AsyncTaskService::new(TaskService::open(store, config.view), config.mutation.delay());
    let app = App::new(service, runtime.handle().clone());
    let mut ui = Ui::new(app);

    let mut terminal = terminal::enter_terminal()?;
    let hook = install_panic_hook();

    info!("TUI started");
    let result = run_event_loop(&mut terminal, &mut ui);

    drop(hook);
    terminal::leave_terminal(&mut terminal);

    let flushed = ui.app.finish_pending();
    info!(flushed = flushed.len(), "TUI stopped");

    result
}

type PanicHook = dyn Fn(&PanicHookInfo<'_>) + Send + Sync + 'static;

/// Puts back the panic hook that was active before [`install_panic_hook`].
struct PanicHookGuard {
    original: Arc<PanicHook>,
}

impl Drop for PanicHookGuard {
    fn drop(&mut self) {
        // Hooks cannot be swapped while unwinding.
        if thread::panicking() {
            return;
        }
        let original = Arc::clone(&self.original);
        let _ = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| original(panic_info)));
    }
}

/// Route panics outside the error boundary through a terminal restore
/// before the previous hook runs. Panics inside the boundary are only logged.
fn install_panic_hook() -> PanicHookGuard {
    let original: Arc<PanicHook> = Arc::from(panic::take_hook());
    let chained = Arc::clone(&original);
    panic::set_hook(Box::new(move |panic_info| {
        if boundary::is_guarding() {
            error!(%panic_info, "Panic while drawing");
        } else {
            terminal::restore_after_panic();
            chained(panic_info);
        }
    }));
    PanicHookGuard { original }
}

fn run_event_loop<S: TaskStore + Send + 'static>(
    terminal: &mut CrosstermTerminal,
    ui: &mut Ui<S>,
) -> Result<()> {
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(TUI_TICK_RATE_MS);

    loop {
        ui.poll_reports();
        terminal.draw(|f| ui.draw(f))?;
        if ui.should_quit {
            break;
        }

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or_default();

        if event::poll(timeout)? {
            let evt = event::read()?;
            if let CrosstermEvent::Key(key) = evt
                && let Some(action) = ui.handle_key(key)
                && let Err(err) = handle_ui_action(terminal, ui, action)
            {
                error!(error = %err, "Editor failed");
                ui.error(format!("Editor failed: {err:#}"));
            }
        }

        if last_tick.elapsed() >= tick_rate {
            ui.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

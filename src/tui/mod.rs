pub mod handlers;
pub mod state;
pub mod view;

use crate::client::{EventService, HttpEventService};
use crate::config::Config;
use crate::layout::{LayoutHandle, LayoutState};
use crate::paths::AppPaths;
use crate::screen::{Action, AppEvent, fail, perform};

use handlers::{handle_app_event, handle_key_event};
use state::AppState;
use view::draw;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

pub async fn run(config: Config) -> Result<()> {
    // --- 1. PANIC LOG ---
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        use std::io::Write;
        if let Some(path) = AppPaths::get_panic_log_path()
            && let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
        {
            let _ = writeln!(file, "PANIC: {:?}", info);
        }
        default_hook(info);
    }));

    // --- 2. CLIENT ---
    // A broken setup still opens the screen; every request then reports it.
    let service: Result<Arc<dyn EventService>, _> = HttpEventService::new(
        &config.api_url,
        config.token(),
        config.allow_insecure_certs,
    )
    .map(|service| {
        if service.is_offline() {
            tracing::warn!("no api_url configured, running offline");
        }
        Arc::new(service) as Arc<dyn EventService>
    });
    let setup_error = service.as_ref().err().map(|e| {
        tracing::error!("client setup failed: {}", e);
        format!("Connection setup failed: {}", e)
    });

    // --- 3. TERMINAL ---
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let layout = LayoutHandle::new(LayoutState {
        sidebar_collapsed: config.sidebar_collapsed,
        mobile_menu_open: false,
    });
    let mut app_state = AppState::new(config.default_sort, layout);
    if let Some(message) = setup_error {
        app_state.screen.notices.error(message);
    }

    let (action_tx, mut action_rx) = mpsc::channel::<Action>(32);
    let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(32);

    // --- 4. NETWORK TASK ---
    // Each call runs on its own task, so overlapping requests resolve in any order.
    tokio::spawn(async move {
        while let Some(action) = action_rx.recv().await {
            if matches!(action, Action::Quit) {
                break;
            }
            let event_tx = event_tx.clone();
            match &service {
                Ok(service) => {
                    let service = service.clone();
                    tokio::spawn(async move {
                        if let Some(event) = perform(service.as_ref(), action).await {
                            let _ = event_tx.send(event).await;
                        }
                    });
                }
                Err(e) => {
                    if let Some(event) = fail(action, e.clone()) {
                        let _ = event_tx.send(event).await;
                    }
                }
            }
        }
    });

    let _ = action_tx.send(app_state.screen.start()).await;

    // --- 5. UI LOOP ---
    let result = ui_loop(&mut terminal, &mut app_state, &action_tx, &mut event_rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn ui_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app_state: &mut AppState,
    action_tx: &mpsc::Sender<Action>,
    event_rx: &mut mpsc::Receiver<AppEvent>,
) -> Result<()> {
    loop {
        app_state.screen.notices.prune(Instant::now());
        terminal.draw(|f| draw(f, app_state))?;

        // A. Network Events
        while let Ok(event) = event_rx.try_recv() {
            handle_app_event(app_state, event);
        }

        // B. Layout changes are remembered across runs
        if app_state.screen.layout_mut().take_changed() {
            let collapsed = app_state.screen.layout().current().sidebar_collapsed;
            if let Ok(mut cfg) = Config::load()
                && cfg.sidebar_collapsed != collapsed
            {
                cfg.sidebar_collapsed = collapsed;
                if let Err(e) = cfg.save() {
                    tracing::warn!("could not save layout preference: {}", e);
                }
            }
        }

        // C. User Input
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => app_state.next(),
                    MouseEventKind::ScrollUp => app_state.previous(),
                    _ => {}
                },
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match handle_key_event(key, app_state) {
                        Some(Action::Quit) => {
                            let _ = action_tx.send(Action::Quit).await;
                            return Ok(());
                        }
                        Some(action) => {
                            if action_tx.send(action).await.is_err() {
                                app_state.message = "Error: network task stopped".to_string();
                            }
                        }
                        None => {}
                    }
                }
                _ => {}
            }
        }
    }
}

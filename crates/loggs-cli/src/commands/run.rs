use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use loggs_core::{AppConfig, Catalog, Page};
use loggs_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::{handle_key_event, handle_mouse_event},
    widgets::{AboutWidget, HomeWidget, LayerStackWidget, LoaderWidget, StatusBarWidget},
};

/// Longest frame step fed to the views, so a stalled terminal does not
/// make springs jump
const MAX_FRAME_DT: f64 = 0.1;

pub fn run(mut config: AppConfig, catalog: Catalog, page: Option<Page>) -> Result<()> {
    if let Some(page) = page {
        config.ui.start_page = page;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Loggs Visual"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, config, catalog);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: AppConfig,
    catalog: Catalog,
) -> Result<()> {
    let size = terminal.size()?;
    let event_handler = EventHandler::with_animation_fps(config.ui.tick_rate_ms, config.ui.animation_fps);
    let mut app = App::new(config, catalog, (size.width, size.height))?;
    tracing::info!(page = app.page.as_str(), "Showcase started");

    // Checked at the end of each iteration to pick the next poll rate
    let mut needs_fast_update = true;
    let mut last_frame = Instant::now();

    loop {
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f64().min(MAX_FRAME_DT);
        last_frame = now;
        app.update(dt);

        terminal.draw(|frame| {
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(frame.area());

            match app.page {
                Page::Home => HomeWidget::render(frame, main_layout[0], &app),
                Page::Works => LayerStackWidget::render(frame, main_layout[0], &app),
                Page::About => AboutWidget::render(frame, main_layout[0], &app),
            }
            StatusBarWidget::render(frame, main_layout[1], &app);
            let screen = frame.area();
            LoaderWidget::render(frame, screen, &app);
        })?;

        // Handle events (faster poll while something is moving)
        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => app.apply(handle_key_event(key)),
                AppEvent::Mouse(mouse) => app.apply(handle_mouse_event(mouse)),
                AppEvent::Resize(width, height) => app.resize((width, height)),
                AppEvent::Tick => {}
            }
        }

        needs_fast_update = app.needs_animation();

        if app.should_quit {
            break;
        }
    }

    app.shutdown();
    tracing::info!("Showcase closed");
    Ok(())
}

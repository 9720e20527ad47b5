use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use owner_dash::app::{App, StatusLevel, UserMenuItem};
use owner_dash::config::{self, Config};
use owner_dash::core::ViewId;
use owner_dash::domain::Session;
use owner_dash::infrastructure::{
    DataService, HttpDataService, MockDataService, RuntimeBridge, RuntimeCommand, RuntimeEvent,
};
use owner_dash::modules::dashboard::{AvailabilityOutcome, RefreshOutcome};
use owner_dash::modules::export;
use owner_dash::ui;

#[derive(Debug, Parser)]
#[command(
    name = "owner-dash",
    version,
    about = "Terminal owner dashboard for a car and tour rental backend"
)]
struct Args {
    /// Backend base URL (e.g. http://localhost:5000)
    #[arg(long)]
    api: Option<String>,

    /// Bearer token sent with every request
    #[arg(long)]
    token: Option<String>,

    /// Initial owner path (e.g. /owner/reports)
    #[arg(long)]
    path: Option<String>,

    /// Use the built-in demo backend instead of HTTP
    #[arg(long)]
    mock: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();
    let config = config::load();

    let service = data_service(&args, &config)?;
    let runtime = RuntimeBridge::new(service, config.page_limit)?;

    let start_path = args
        .path
        .clone()
        .unwrap_or_else(|| config.start_path.clone());
    let mut app = App::new(Session::new(config.profile()), &start_path);
    app.dark_mode = config.dark_mode;
    if args.mock {
        app.set_status("Demo backend", StatusLevel::Info);
    }

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, runtime);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

/// Log to a file; the terminal belongs to the UI
fn init_logging() {
    let Some(path) = config::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn data_service(args: &Args, config: &Config) -> Result<Arc<dyn DataService>> {
    if args.mock {
        log::info!("using demo backend");
        return Ok(Arc::new(
            MockDataService::demo().with_latency(Duration::from_millis(250)),
        ));
    }

    let base_url = args.api.as_deref().unwrap_or(&config.api_base_url);
    let token = args.token.clone().or_else(|| config.api_token.clone());
    let service = HttpDataService::new(base_url, token, config.request_timeout())
        .with_context(|| format!("invalid backend {base_url}"))?;
    log::info!("using backend {}", service.endpoint_name());
    Ok(Arc::new(service))
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &runtime);
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, key);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }

        pump_background(&mut app, &runtime);
    }
}

fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        match event {
            RuntimeEvent::RefreshFinished(outcome) => app.finish_refresh(outcome),
            RuntimeEvent::AvailabilityFinished(outcome) => app.apply_availability(outcome),
            RuntimeEvent::Error { message } => {
                log::error!("{message}");
                app.set_status(message, StatusLevel::Error);
            }
        }
    }

    if app.take_refresh_request() {
        if let Err(err) = runtime.send(RuntimeCommand::Refresh) {
            app.finish_refresh(RefreshOutcome::Failed(format!(
                "Failed to load dashboard data: {err}"
            )));
        }
    }

    if let Some(request) = app.take_availability_request() {
        if let Err(err) = runtime.send(RuntimeCommand::SetAvailability(request.clone())) {
            app.apply_availability(AvailabilityOutcome::Failed {
                request,
                message: err.to_string(),
            });
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.help_open = false;
        }
        return;
    }

    if app.user_menu_open {
        match key.code {
            KeyCode::Esc | KeyCode::Char('u') => app.user_menu_open = false,
            KeyCode::Char(c) => {
                if let Some(item) = UserMenuItem::ALL.into_iter().find(|item| item.key() == c) {
                    app.select_user_menu_item(item);
                }
            }
            _ => {}
        }
        return;
    }

    if app.notifications_open {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') => app.notifications_open = false,
            KeyCode::Char('m') => app.mark_all_read(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Esc => {
            app.close_overlay();
        }
        KeyCode::Char('r') => app.request_refresh(),
        KeyCode::Char('s') => app.toggle_sidebar(),
        KeyCode::Char('u') => app.toggle_user_menu(),
        KeyCode::Char('n') => app.toggle_notifications(),
        KeyCode::Char('d') => app.toggle_dark_mode(),
        KeyCode::Char('e') => {
            let action = export::export_current_view(app);
            app.apply_action(action);
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if let Some(view) = ViewId::from_shortcut(c) {
                app.navigate_to(view);
            }
        }
        _ if app.active_view() == ViewId::Dashboard => handle_dashboard_key(app, key),
        _ => {}
    }
}

fn handle_dashboard_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::BackTab => app.switch_fleet_focus(),
        KeyCode::Char('j') | KeyCode::Down => app.move_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection(-1),
        KeyCode::Char('a') => app.toggle_selected_availability(),
        _ => {}
    }
}

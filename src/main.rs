use std::fs;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use vigil::app::{
    sample_feed, App, ClickTarget, DataMode, EndpointOption, Focus, InputMode, PromptKind,
    RowFilter, StatusLevel,
};
use vigil::config;
use vigil::core::ExportFormat;
use vigil::domain::advisory::SeverityBand;
use vigil::infrastructure::api::ApiEndpoint;
use vigil::infrastructure::runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
use vigil::ui;

#[derive(Debug, Parser)]
#[command(
    name = "vigil",
    version,
    about = "Vigil: a local-first threat advisory feed TUI"
)]
struct Args {
    /// Advisory API base URL (e.g. http://localhost:5000)
    #[arg(long)]
    api: Option<String>,

    /// Run against a built-in sample feed, no backend required
    #[arg(long)]
    offline: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::load();
    init_logging();

    let (endpoints, endpoint_options) = endpoints_from_args_and_config(&args, &config);

    let mut app = App::new(&config);
    app.api_endpoints = endpoint_options;

    let runtime = if args.offline {
        app.data_mode = DataMode::Sample;
        app.ingest_advisories(sample_feed());
        None
    } else {
        app.data_mode = DataMode::Api;
        app.api_endpoint = endpoints
            .first()
            .map(|endpoint| endpoint.display())
            .unwrap_or_default();
        app.set_status("Connecting…", StatusLevel::Info);
        Some(RuntimeBridge::new(
            endpoints,
            Duration::from_secs(config.refresh_secs.max(5)),
        )?)
    };

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, runtime);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

fn init_logging() {
    let Some(path) = config::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
}

fn endpoints_from_args_and_config(
    args: &Args,
    config: &config::Config,
) -> (Vec<ApiEndpoint>, Vec<EndpointOption>) {
    use std::collections::BTreeSet;

    let mut endpoints = Vec::new();
    let mut options = Vec::new();
    let mut seen = BTreeSet::<String>::new();

    let mut push_endpoint = |endpoints: &mut Vec<ApiEndpoint>,
                             options: &mut Vec<EndpointOption>,
                             url: &str,
                             name: Option<String>| {
        let endpoint = ApiEndpoint::new(url);
        let display = endpoint.display();
        if !seen.insert(display.to_lowercase()) {
            return;
        }
        let label = name
            .filter(|value| !value.trim().is_empty())
            .map(|name| format!("{name} ({display})"))
            .unwrap_or_else(|| display.clone());
        options.push(EndpointOption { label, display });
        endpoints.push(endpoint);
    };

    // CLI argument takes precedence
    if let Some(api) = args.api.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        push_endpoint(&mut endpoints, &mut options, api, Some("cli".to_string()));
    }

    // Config file endpoints
    for entry in &config.endpoints {
        let name = entry.name.clone().filter(|value| !value.trim().is_empty());
        if let Some(url) = entry.url.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            push_endpoint(&mut endpoints, &mut options, url, name);
        }
    }

    // Default fallback
    if endpoints.is_empty() {
        push_endpoint(
            &mut endpoints,
            &mut options,
            "http://127.0.0.1:5000",
            Some("local".to_string()),
        );
    }

    (endpoints, options)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: Option<RuntimeBridge>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, runtime.as_ref());
        terminal.draw(|f| ui::draw(f, &mut app))?;
        if app.should_quit {
            if let Some(runtime) = runtime.as_ref() {
                let _ = runtime.send(RuntimeCommand::Shutdown);
            }
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => handle_key(&mut app, key),
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }

        pump_background(&mut app, runtime.as_ref());
    }
}

fn pump_background(app: &mut App, runtime: Option<&RuntimeBridge>) {
    let Some(runtime) = runtime else {
        return;
    };

    for event in runtime.poll_events() {
        match event {
            RuntimeEvent::Connected { endpoint } => app.apply_connected(endpoint),
            RuntimeEvent::AdvisoriesLoaded { advisories } => app.ingest_advisories(advisories),
            RuntimeEvent::Error { message } => app.apply_fetch_error(message),
        }
    }

    if app.take_refresh_request() {
        let _ = runtime.send(RuntimeCommand::Refresh);
    }
    if let Some(index) = app.take_endpoint_switch_request() {
        let _ = runtime.send(RuntimeCommand::SwitchEndpoint { index });
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

    // The modal has exactly one close control.
    if app.detail_row.is_some() {
        match key.code {
            KeyCode::Esc => app.close_detail(),
            KeyCode::Char('y') => handle_copy_to_clipboard(app),
            _ => {}
        }
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Command => handle_command_mode(app, key),
        InputMode::Prompt(kind) => handle_prompt_mode(app, key, kind),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => app.should_quit = true,
        (KeyCode::Char('?'), _) => app.help_open = true,
        (KeyCode::Char('/'), _) => app.enter_prompt(PromptKind::Search),
        (KeyCode::Char('i'), _) => app.enter_prompt(PromptKind::Ioc),
        (KeyCode::Char(':'), _) => app.enter_command(),
        (KeyCode::Char('b'), _) => app.toggle_sidebar(),
        (KeyCode::Char('r'), _) => app.request_refresh(),
        (KeyCode::Char('e'), _) => {
            let action = vigil::modules::export::export_feed(&app.rows, ExportFormat::Csv);
            app.apply_action(action);
        }
        (KeyCode::Char('y'), _) => handle_copy_to_clipboard(app),
        (KeyCode::Char('['), _) => app.cycle_endpoint(false),
        (KeyCode::Char(']'), _) => app.cycle_endpoint(true),
        (KeyCode::Char('u'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            app.page_up(10);
        }
        (KeyCode::Char('d'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            app.page_down(10);
        }
        (KeyCode::Char('g'), _) => app.go_to_top(),
        (KeyCode::Char('G'), _) => app.go_to_bottom(),
        (KeyCode::Tab, _) => {
            app.focus = match app.focus {
                Focus::Sidebar => Focus::Feed,
                Focus::Feed => Focus::Sidebar,
            };
        }
        (KeyCode::Up | KeyCode::Char('k'), _) => match app.focus {
            Focus::Sidebar => app.sidebar_select_prev(),
            Focus::Feed => app.move_selection_up(),
        },
        (KeyCode::Down | KeyCode::Char('j'), _) => match app.focus {
            Focus::Sidebar => app.sidebar_select_next(),
            Focus::Feed => app.move_selection_down(),
        },
        (KeyCode::Enter, _) => match app.focus {
            Focus::Sidebar => app.apply_selected_source(),
            Focus::Feed => app.open_detail(),
        },
        (KeyCode::Esc, _) => {
            if app.row_filter != RowFilter::All {
                app.clear_filter();
                app.set_status(
                    format!("Cleared filters, {} advisories", app.visible_count()),
                    StatusLevel::Info,
                );
            }
        }
        _ => {}
    }
}

fn handle_command_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.exit_command(),
        KeyCode::Enter => app.apply_command(),
        KeyCode::Backspace => {
            app.command.input.pop();
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.command.input.push(ch);
        }
        _ => {}
    }
}

fn handle_prompt_mode(app: &mut App, key: KeyEvent, kind: PromptKind) {
    match key.code {
        // Both exits keep whatever the live filter already shows.
        KeyCode::Esc | KeyCode::Enter => app.exit_prompt(),
        KeyCode::Backspace => {
            app.command.input.pop();
            app.apply_prompt_input(kind);
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.command.input.push(ch);
            app.apply_prompt_input(kind);
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.help_open
        || app.detail_row.is_some()
        || matches!(app.input_mode, InputMode::Command | InputMode::Prompt(_))
    {
        return;
    }
    let Some(size) = terminal_rect() else {
        return;
    };
    let areas = ui::layout::areas(size, app.sidebar_collapsed);
    let col = mouse.column;
    let row = mouse.row;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let target = classify_click(app, areas, col, row);
            app.apply_click(target);
        }
        MouseEventKind::ScrollUp => app.move_selection_up(),
        MouseEventKind::ScrollDown => app.move_selection_down(),
        _ => {}
    }
}

/// Map a click position to a ClickTarget using the same layout geometry
/// the renderer used for this frame.
fn classify_click(app: &App, areas: ui::layout::UiAreas, col: u16, row: u16) -> ClickTarget {
    if rect_contains(areas.sidebar_toggle, col, row) {
        return ClickTarget::SidebarToggle;
    }

    if rect_contains(areas.sidebar, col, row) {
        if !app.sidebar_collapsed {
            if rect_contains(areas.sidebar_sources, col, row) {
                let inner = rect_inner(areas.sidebar_sources);
                if rect_contains(inner, col, row) {
                    let idx = (row - inner.y) as usize;
                    if idx < app.source_counts.len() {
                        return ClickTarget::SidebarSource(idx);
                    }
                }
            }
            if rect_contains(areas.sidebar_iocs, col, row) {
                let inner = rect_inner(areas.sidebar_iocs);
                if rect_contains(inner, col, row) {
                    let idx = (row - inner.y) as usize;
                    if idx < app.ioc_suggestions.len() {
                        return ClickTarget::SidebarIoc(idx);
                    }
                }
            }
        }
        return ClickTarget::SidebarBody;
    }

    if rect_contains(areas.chart, col, row) {
        let inner = rect_inner(areas.chart);
        if let Some(bar) =
            ui::widgets::severity_chart::hit_test(inner, SeverityBand::ALL.len(), col, row)
        {
            return ClickTarget::ChartBar(bar);
        }
        return ClickTarget::Outside;
    }

    if rect_contains(areas.list, col, row) {
        let inner = rect_inner(areas.list);
        if rect_contains(inner, col, row) {
            let row_idx = (row - inner.y) as usize;
            let height = inner.height.max(1) as usize;
            let clicked = app.list_offset(height) + row_idx;
            if clicked < app.visible_count() {
                return ClickTarget::FeedRow(clicked);
            }
        }
        return ClickTarget::Outside;
    }

    ClickTarget::Outside
}

fn handle_copy_to_clipboard(app: &mut App) {
    use arboard::Clipboard;

    let text = app
        .detail_advisory()
        .or_else(|| app.selected_advisory())
        .map(|advisory| advisory.ioc_text().unwrap_or_else(|| advisory.title.clone()));
    let Some(text) = text else {
        app.set_status("Nothing to copy", StatusLevel::Warn);
        return;
    };

    match Clipboard::new() {
        Ok(mut clipboard) => {
            if clipboard.set_text(&text).is_ok() {
                app.apply_action(vigil::core::Action::Copy(text));
            } else {
                app.set_status("Failed to copy to clipboard", StatusLevel::Error);
            }
        }
        Err(_) => {
            app.set_status("Clipboard not available", StatusLevel::Error);
        }
    }
}

fn terminal_rect() -> Option<Rect> {
    let (width, height) = crossterm::terminal::size().ok()?;
    Some(Rect {
        x: 0,
        y: 0,
        width,
        height,
    })
}

fn rect_contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x
        && col < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

fn rect_inner(rect: Rect) -> Rect {
    Rect {
        x: rect.x.saturating_add(1),
        y: rect.y.saturating_add(1),
        width: rect.width.saturating_sub(2),
        height: rect.height.saturating_sub(2),
    }
}

//! Terminal UI: console log, metrics panel, and settings overlay

use crate::theme::{cpu_color, memory_color, Palette};
use awaken_core::{timestamp_now, ThemeName};
use awaken_sim::{catalog, SimConfig, Simulation};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::time::Duration;

const SPINNER: [&str; 8] = ["⠋", "⠙", "⠸", "⠴", "⠦", "⠇", "⠏", "⠋"];
/// Frames drawn per spinner glyph (~100ms at the 16ms poll interval).
const FRAMES_PER_GLYPH: usize = 6;
const NETWORK_PCT: u16 = 45;
const METRICS_WIDTH: u16 = 36;

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

pub struct App {
    pub sim: Simulation,
    pub theme: ThemeName,
    pub show_settings: bool,
    pub frame_count: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(sim: Simulation) -> Self {
        let theme = sim.config().theme;
        Self {
            sim,
            theme,
            show_settings: false,
            frame_count: 0,
            should_quit: false,
        }
    }

    fn palette(&self) -> Palette {
        Palette::for_theme(self.theme)
    }

    fn spinner(&self) -> &'static str {
        SPINNER[(self.frame_count / FRAMES_PER_GLYPH) % SPINNER.len()]
    }

    fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        tracing::debug!("Theme set to {}", self.theme);
    }

    fn speed_up(&mut self) {
        let speed = self.sim.speed().faster();
        self.sim.set_speed(speed);
    }

    fn slow_down(&mut self) {
        let speed = self.sim.speed().slower();
        self.sim.set_speed(speed);
    }
}

// ---------------------------------------------------------------------------
// Key handling
// ---------------------------------------------------------------------------

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl-C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Char(' ') | KeyCode::Char('s') => app.sim.toggle(),
        KeyCode::Char('o') => app.show_settings = !app.show_settings,
        KeyCode::Esc if app.show_settings => app.show_settings = false,
        KeyCode::Char('t') => app.cycle_theme(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.speed_up(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.slow_down(),
        KeyCode::Char('d') => app.sim.run_diagnostic(),
        KeyCode::Char('c') => app.sim.clear_console(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, app: &App) {
    let palette = app.palette();
    let size = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(palette.bg)), size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(size);

    draw_header(frame, app, &palette, rows[0]);
    draw_status(frame, app, &palette, rows[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(METRICS_WIDTH)])
        .split(rows[2]);

    draw_console(frame, app, &palette, body[0]);
    draw_metrics(frame, app, &palette, body[1]);

    if app.show_settings {
        draw_settings(frame, app, &palette, size);
    }
}

fn draw_header(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let (label, color) = if app.sim.is_running() {
        (" [space] Stop ", palette.error)
    } else {
        (" [space] Start ", palette.success)
    };

    let title = Line::from(vec![
        Span::styled(
            " AI Consciousness Simulator ",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Neural Architecture v2.1.7 ",
            Style::default().fg(palette.text).add_modifier(Modifier::DIM),
        ),
        Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(" [o] Settings ", Style::default().fg(palette.accent)),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(palette.border));
    frame.render_widget(Paragraph::new(title).block(block), area);
}

fn draw_status(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let style = Style::default().fg(palette.text);
    let left = Line::from(vec![
        Span::styled(format!(" Status: {}", app.sim.state()), style),
        Span::styled(
            format!(
                "  Consciousness: {:.1}%",
                app.sim.metrics().consciousness
            ),
            style,
        ),
        Span::styled(
            format!("  Speed: {}", app.sim.speed()),
            Style::default().fg(palette.accent),
        ),
        Span::styled(
            format!("  {} ", app.sim.session_id()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let clock = format!("{} ", timestamp_now());
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(clock.len() as u16)])
        .split(area);
    frame.render_widget(Paragraph::new(left), cols[0]);
    frame.render_widget(
        Paragraph::new(clock).style(style).alignment(Alignment::Right),
        cols[1],
    );
}

fn console_lines<'a>(app: &'a App, palette: &Palette) -> Vec<Line<'a>> {
    let mut lines: Vec<Line> = app
        .sim
        .logs()
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    format!("[{}] ", entry.clock()),
                    Style::default().fg(palette.text).add_modifier(Modifier::DIM),
                ),
                Span::styled(
                    format!("{}: ", entry.source),
                    Style::default().fg(palette.accent),
                ),
                Span::styled(
                    entry.message.as_str(),
                    Style::default().fg(palette.severity(entry.severity)),
                ),
            ])
        })
        .collect();

    if app.sim.is_running() {
        lines.push(Line::from(Span::styled(
            format!("{} Processing...", app.spinner()),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::SLOW_BLINK),
        )));
    }
    lines
}

/// Rows to scroll so the last wrapped line sits on the bottom edge.
fn bottom_offset(lines: &[Line], inner_width: usize, visible_height: usize) -> u16 {
    if inner_width == 0 {
        return 0;
    }
    let total_visual: usize = lines
        .iter()
        .map(|l| {
            let w = l.width();
            if w == 0 {
                1
            } else {
                w.div_ceil(inner_width)
            }
        })
        .sum();
    total_visual.saturating_sub(visible_height) as u16
}

fn draw_console(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let visible_height = area.height.saturating_sub(2) as usize;
    let inner_width = area.width.saturating_sub(2) as usize;
    let lines = console_lines(app, palette);
    let scroll_offset = bottom_offset(&lines, inner_width, visible_height);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Console ({} lines) ", app.sim.logs().len()))
        .border_style(Style::default().fg(palette.border));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll_offset, 0));
    frame.render_widget(paragraph, area);
}

fn gauge<'a>(title: &'a str, pct: f64, color: Color, palette: &Palette) -> Gauge<'a> {
    let pct = pct.clamp(0.0, 100.0);
    Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(title, Style::default().fg(palette.text))),
        )
        .gauge_style(Style::default().fg(color).bg(Color::DarkGray))
        .percent(pct.round() as u16)
        .label(format!("{:.1}%", pct))
}

fn draw_metrics(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::LEFT)
        .title(Span::styled(
            " System Metrics ",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(palette.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(7),
            Constraint::Min(0),
        ])
        .split(inner);

    let m = app.sim.metrics();
    frame.render_widget(gauge("CPU Usage", m.cpu, cpu_color(m.cpu), palette), rows[0]);
    frame.render_widget(
        gauge("Memory Usage", m.memory, memory_color(m.memory), palette),
        rows[1],
    );
    frame.render_widget(
        gauge("Consciousness", m.consciousness, Color::Magenta, palette),
        rows[2],
    );
    frame.render_widget(
        Gauge::default()
            .block(Block::default().title(Span::styled(
                "Network I/O",
                Style::default().fg(palette.text),
            )))
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
            .percent(NETWORK_PCT)
            .label("Active"),
        rows[3],
    );

    let text = Style::default().fg(palette.text);
    let info = vec![
        Line::from(Span::styled(format!("Uptime: {}", m.uptime_label()), text)),
        Line::from(Span::styled(
            format!("Neural Activity: {}", m.neural_activity),
            text,
        )),
        Line::from(Span::styled(format!("Model: {}", catalog::MODEL), text)),
        Line::from(Span::styled(format!("Region: {}", catalog::REGION), text)),
        Line::from(Span::styled(format!("Instance: {}", catalog::INSTANCE), text)),
    ];
    frame.render_widget(
        Paragraph::new(info).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" System Info ", Style::default().fg(palette.accent)))
                .border_style(Style::default().fg(palette.border)),
        ),
        rows[4],
    );

    let hints = vec![
        Line::from(Span::styled("[d] Run Diagnostic", text)),
        Line::from(Span::styled("[c] Clear Console", text)),
        Line::from(Span::styled("[q] Quit", Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(Paragraph::new(hints), rows[5]);
}

/// A rect of `width` x `height` centered in `area`, clipped to it.
fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_settings(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let popup = centered(40, 9, area);
    let text = Style::default().fg(palette.text);
    let themes: Vec<Span> = ThemeName::ALL
        .iter()
        .map(|t| {
            if *t == app.theme {
                Span::styled(
                    format!("[{}] ", t),
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(format!("{} ", t), text)
            }
        })
        .collect();

    let lines = vec![
        Line::from(Span::styled("Theme ([t] to cycle):", text)),
        Line::from(themes),
        Line::from(""),
        Line::from(Span::styled(
            format!("Speed: {}  ([-] / [+], 0.5x - 5x)", app.sim.speed()),
            text,
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[o] or [esc] to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            " Settings ",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.bg));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

pub async fn run_tui(config: SimConfig, autostart: bool) -> anyhow::Result<()> {
    let sim = Simulation::new(config);
    tracing::info!("Session {} opened", sim.session_id());
    let mut app = App::new(sim);
    if autostart {
        app.sim.start();
    }

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = terminal::disable_raw_mode();
        let _ = io::stdout().execute(LeaveAlternateScreen);
        original_hook(info);
    }));

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app);

    terminal::disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    let last_seen = app.sim.logs().last().map(|e| e.id).unwrap_or(0);
    app.sim.shutdown();
    for entry in app.sim.logs().entries_after(last_seen) {
        println!("{}", entry.to_line());
    }
    eprintln!("Awaken complete, goodbye!");

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        app.sim.drain();
        terminal.draw(|f| draw(f, app))?;
        app.frame_count = app.frame_count.wrapping_add(1);

        let timeout = Duration::from_millis(16);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
                if app.should_quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use awaken_core::{SimulationState, Speed};
    use ratatui::backend::TestBackend;

    fn app() -> App {
        let config = SimConfig {
            seed: Some(1),
            ..SimConfig::default()
        };
        App::new(Simulation::new(config))
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    // Keys

    #[test]
    fn ctrl_c_quits() {
        let mut app = app();
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
        assert!(app.sim.logs().is_empty());
    }

    #[test]
    fn plain_c_clears_console() {
        let mut app = app();
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('c'));
        assert!(!app.should_quit);
        assert_eq!(app.sim.logs().len(), 1);
        assert_eq!(app.sim.logs().last().unwrap().message, "Console cleared");
    }

    #[test]
    fn theme_key_cycles() {
        let mut app = app();
        assert_eq!(app.theme, ThemeName::Matrix);
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.theme, ThemeName::Cyberpunk);
    }

    #[test]
    fn speed_keys_step_and_saturate() {
        let mut app = app();
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.sim.speed().value(), 1.5);
        for _ in 0..20 {
            press(&mut app, KeyCode::Char('+'));
        }
        assert_eq!(app.sim.speed(), Speed::MAX);
        for _ in 0..20 {
            press(&mut app, KeyCode::Char('-'));
        }
        assert_eq!(app.sim.speed(), Speed::MIN);
    }

    #[test]
    fn settings_toggle_and_escape() {
        let mut app = app();
        press(&mut app, KeyCode::Char('o'));
        assert!(app.show_settings);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_settings);
    }

    #[tokio::test]
    async fn space_toggles_simulation() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.sim.state(), SimulationState::Booting);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.sim.state(), SimulationState::Stopped);
        assert_eq!(app.sim.logs().last().unwrap().message, "Simulation stopped");
    }

    // Rendering

    #[test]
    fn bottom_offset_accounts_for_wrapping() {
        let lines = vec![Line::from("a".repeat(25)), Line::from(""), Line::from("b")];
        // 3 + 1 + 1 visual rows at width 10
        assert_eq!(bottom_offset(&lines, 10, 2), 3);
        assert_eq!(bottom_offset(&lines, 10, 10), 0);
        assert_eq!(bottom_offset(&lines, 0, 10), 0);
    }

    #[test]
    fn centered_rect_is_clipped() {
        let area = Rect::new(0, 0, 30, 5);
        let r = centered(40, 9, area);
        assert_eq!(r, Rect::new(0, 0, 30, 5));
        let r = centered(10, 3, area);
        assert_eq!(r, Rect::new(10, 1, 10, 3));
    }

    #[test]
    fn renders_panels_and_info() {
        let mut app = app();
        app.sim.run_diagnostic();
        let screen = render(&app);
        assert!(screen.contains("AI Consciousness Simulator"));
        assert!(screen.contains("Status: STOPPED"));
        assert!(screen.contains("Manual diagnostic scan initiated"));
        assert!(screen.contains("Instance: i-0a7b2c3d4e5f67890"));
        assert!(screen.contains("Uptime: 0m 0s"));
        assert!(!screen.contains("Processing..."));
    }

    #[test]
    fn renders_settings_overlay() {
        let mut app = app();
        app.show_settings = true;
        let screen = render(&app);
        assert!(screen.contains("Settings"));
        assert!(screen.contains("[matrix]"));
        assert!(screen.contains("Speed: 1x"));
    }

    #[tokio::test]
    async fn renders_spinner_while_running() {
        let mut app = app();
        app.sim.start();
        let screen = render(&app);
        assert!(screen.contains("Processing..."));
        assert!(screen.contains("Status: BOOTING"));
        app.sim.stop();
    }
}

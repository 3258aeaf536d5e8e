use crate::entities::{BoatRecord, BoatType};
use crate::fleet::Fleet;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

/// Rows skipped by PgUp/PgDn
const PAGE_SIZE: usize = 20;

pub struct App {
    pub boats: Vec<BoatRecord>,
    pub state: TableState,
    pub total_paid: f64,
    pub total_spent: f64,
    pub power_count: usize,
    pub sailing_count: usize,
}

impl App {
    pub fn new(fleet: &Fleet) -> Self {
        let mut state = TableState::default();
        if !fleet.is_empty() {
            state.select(Some(0));
        }

        Self {
            boats: fleet.boats().to_vec(),
            state,
            total_paid: fleet.total_paid(),
            total_spent: fleet.total_spent(),
            power_count: fleet.count_by_type(BoatType::Power),
            sailing_count: fleet.count_by_type(BoatType::Sailing),
        }
    }

    pub fn selected_boat(&self) -> Option<&BoatRecord> {
        self.state.selected().and_then(|i| self.boats.get(i))
    }

    pub fn next(&mut self) {
        let len = self.boats.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.boats.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.boats.len();
        if len == 0 {
            return;
        }
        let i = self.state.selected().map_or(0, |i| (i + PAGE_SIZE).min(len - 1));
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.boats.is_empty() {
            return;
        }
        let i = self.state.selected().map_or(0, |i| i.saturating_sub(PAGE_SIZE));
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home if !app.boats.is_empty() => app.state.select(Some(0)),
                KeyCode::End if !app.boats.is_empty() => {
                    app.state.select(Some(app.boats.len() - 1))
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Totals
            Constraint::Min(0),    // Boats
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_table(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let spans = vec![
        Span::styled(
            " Fleet Ledger ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Boats: {}", app.boats.len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Power {} / Sailing {}", app.power_count, app.sailing_count),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Paid ${:.2}", app.total_paid),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Spent ${:.2}", app.total_spent),
            Style::default().fg(Color::Red),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Type", "Name", "Year", "Make", "Feet", "Paid", "Spent", "Left"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.boats.iter().map(|boat| {
        let remaining = boat.remaining_budget();
        let left_color = if remaining <= 0.0 {
            Color::Red
        } else if remaining < boat.purchase_price * 0.1 {
            Color::Yellow
        } else {
            Color::Green
        };

        let cells = vec![
            Cell::from(boat.boat_type.as_str()),
            Cell::from(truncate(&boat.name, 24)),
            Cell::from(boat.year.to_string()),
            Cell::from(truncate(&boat.make, 16)),
            Cell::from(format!("{}'", boat.feet.trunc() as i64)),
            Cell::from(format!("{:.2}", boat.purchase_price)),
            Cell::from(format!("{:.2}", boat.expense)),
            Cell::from(format!("{:.2}", remaining)).style(Style::default().fg(left_color)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Length(26),
            Constraint::Length(6),
            Constraint::Length(18),
            Constraint::Length(6),
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Length(13),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Boats "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);

    let mut spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, app.boats.len()),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(boat) = app.selected_boat() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("{} has ${:.2} left", boat.name, boat.remaining_budget()),
            Style::default().fg(Color::White),
        ));
    }

    spans.push(Span::raw(" | "));
    spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Nav | "));
    spans.push(Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Fast | "));
    spans.push(Span::styled("q", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Quit"));

    let status = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(status, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

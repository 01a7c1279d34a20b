//! TUI module - Terminal dashboard with ratatui

use std::io::{Stdout, stdout};
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs},
};
use tokio::runtime::Handle;

use crate::api::FitnessApi;
use crate::models::{Exercise, SessionLogSummary, SessionTemplateOverview, TrainingPlanOverview};
use crate::views::history;

type Tui = Terminal<CrosstermBackend<Stdout>>;

const TAB_TITLES: [&str; 4] = ["Übungen", "Pläne", "Vorlagen", "Historie"];

/// App state for TUI
pub struct App {
    api: Arc<dyn FitnessApi>,
    handle: Handle,
    tab: usize,
    exercises: Vec<Exercise>,
    plans: Vec<TrainingPlanOverview>,
    templates: Vec<SessionTemplateOverview>,
    history: Vec<SessionLogSummary>,
    status_line: String,
    should_quit: bool,
}

impl App {
    pub fn new(api: Arc<dyn FitnessApi>, handle: Handle) -> Self {
        let mut app = Self {
            api,
            handle,
            tab: 0,
            exercises: Vec::new(),
            plans: Vec::new(),
            templates: Vec::new(),
            history: Vec::new(),
            status_line: String::new(),
            should_quit: false,
        };
        app.refresh();
        app
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }

        restore_terminal()?;
        Ok(())
    }

    /// Re-fetch everything; the backend is the source of truth
    fn refresh(&mut self) {
        let api = Arc::clone(&self.api);
        let result = self.handle.block_on(async move {
            let exercises = api.get_exercises().await?;
            let plans = api.get_training_plans().await?;
            let templates = api.get_session_templates().await?;
            let history = api.get_training_history().await?;
            Ok::<_, crate::ApiError>((exercises, plans, templates, history))
        });

        match result {
            Ok((exercises, plans, templates, logs)) => {
                self.exercises = exercises;
                self.plans = plans;
                self.templates = templates;
                self.history = logs
                    .into_iter()
                    .filter(|l| l.status == crate::models::LogStatus::Completed)
                    .collect();
                self.status_line.clear();
            }
            Err(err) => self.status_line = err.user_message(),
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        let tabs = Tabs::new(TAB_TITLES.to_vec())
            .select(self.tab)
            .highlight_style(Style::default().fg(Color::Cyan).bold())
            .block(Block::default().borders(Borders::ALL).title("hantel"));
        frame.render_widget(tabs, chunks[0]);

        match self.tab {
            0 => self.render_exercises(frame, chunks[1]),
            1 => self.render_plans(frame, chunks[1]),
            2 => self.render_templates(frame, chunks[1]),
            _ => self.render_history(frame, chunks[1]),
        }

        let footer_text = if self.status_line.is_empty() {
            "q: beenden | r: neu laden | tab/←→: Ansicht wechseln".to_string()
        } else {
            self.status_line.clone()
        };
        let footer = Paragraph::new(footer_text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[2]);
    }

    fn render_exercises(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .exercises
            .iter()
            .map(|ex| {
                Row::new(vec![
                    Cell::from(ex.id.to_string()),
                    Cell::from(ex.name.clone()),
                    Cell::from(ex.category.clone()),
                    Cell::from(ex.muscle_groups.join(", ")),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Length(28),
                Constraint::Length(16),
                Constraint::Min(20),
            ],
        )
        .header(Row::new(vec!["ID", "Name", "Kategorie", "Muskelgruppen"]).style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title("Übungen"));

        frame.render_widget(table, area);
    }

    fn render_plans(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .plans
            .iter()
            .map(|plan| {
                Row::new(vec![
                    Cell::from(plan.id.to_string()),
                    Cell::from(plan.name.clone()),
                    Cell::from(plan.description.clone()),
                    Cell::from(plan.session_count.to_string()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Length(28),
                Constraint::Min(20),
                Constraint::Length(10),
            ],
        )
        .header(Row::new(vec!["ID", "Name", "Beschreibung", "Sessions"]).style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title("Trainingspläne"));

        frame.render_widget(table, area);
    }

    fn render_templates(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .templates
            .iter()
            .map(|t| {
                Row::new(vec![
                    Cell::from(t.id.to_string()),
                    Cell::from(t.name.clone()),
                    Cell::from(t.plan_name.clone()),
                    Cell::from(t.order_index.to_string()),
                    Cell::from(t.exercise_count.to_string()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Length(28),
                Constraint::Length(20),
                Constraint::Length(10),
                Constraint::Length(10),
            ],
        )
        .header(
            Row::new(vec!["ID", "Name", "Plan", "Reihenfolge", "Übungen"])
                .style(Style::default().bold()),
        )
        .block(Block::default().borders(Borders::ALL).title("Session-Vorlagen"));

        frame.render_widget(table, area);
    }

    fn render_history(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .history
            .iter()
            .map(|log| {
                Row::new(vec![
                    Cell::from(history::format_date(&log.start_time)),
                    Cell::from(log.session_name.clone()),
                    Cell::from(history::duration_label(
                        &log.start_time,
                        log.end_time.as_ref(),
                    )),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(18),
                Constraint::Length(28),
                Constraint::Min(10),
            ],
        )
        .header(Row::new(vec!["Datum", "Session", "Dauer"]).style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title("Abgeschlossene Trainings"));

        frame.render_widget(table, area);
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('r') => self.refresh(),
                KeyCode::Tab | KeyCode::Right => {
                    self.tab = (self.tab + 1) % TAB_TITLES.len();
                }
                KeyCode::Left => {
                    self.tab = (self.tab + TAB_TITLES.len() - 1) % TAB_TITLES.len();
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

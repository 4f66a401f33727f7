// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use remedia_app::{
    AppCommand, AppEvent, AppState, BackendUnreachable, FormField, Outcome, PredictRequest,
    RequestId, ResultView, Screen, SectionItem, SectionKind, ViewState,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;

const APP_TITLE: &str = "💊 AI Health Recommendation";
const BACK_LABEL: &str = "← Back to Home (esc)";
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const SCROLL_PAGE: u16 = 10;

/// Side effects the TUI cannot perform itself.
pub trait AppRuntime {
    fn predict(&mut self, request: &PredictRequest) -> Outcome;

    /// Starts a prediction and reports its outcome on `tx`. The default runs
    /// inline; real runtimes move the request onto a worker thread so the
    /// form stays responsive.
    fn spawn_prediction(
        &mut self,
        request_id: RequestId,
        request: PredictRequest,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let outcome = self.predict(&request);
        tx.send(InternalEvent::Prediction {
            request_id,
            outcome,
        })
        .map_err(|_| anyhow::anyhow!("prediction event channel closed"))?;
        Ok(())
    }

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    Prediction {
        request_id: RequestId,
        outcome: Outcome,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct ViewData {
    help_visible: bool,
    result_scroll: u16,
    status_token: u64,
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(());
    loop {
        process_internal_events(state, runtime, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Prediction {
                request_id,
                outcome,
            } => {
                let at = runtime.now();
                dispatch_and_apply(
                    state,
                    runtime,
                    view_data,
                    tx,
                    AppCommand::Resolve {
                        request_id,
                        outcome,
                        at,
                    },
                );
            }
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn dispatch_and_apply<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    apply_events(state, runtime, view_data, tx, events);
}

fn apply_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    events: Vec<AppEvent>,
) {
    for event in events {
        match event {
            AppEvent::SubmitRequested {
                request_id,
                request,
            } => {
                tracing::info!(%request_id, "submitting prediction request");
                view_data.result_scroll = 0;
                if let Err(error) = runtime.spawn_prediction(request_id, request, tx.clone()) {
                    tracing::warn!(%request_id, error = %format!("{error:#}"), "prediction did not start");
                    let at = runtime.now();
                    let follow_up = state.dispatch(AppCommand::Resolve {
                        request_id,
                        outcome: Err(BackendUnreachable),
                        at,
                    });
                    apply_events(state, runtime, view_data, tx, follow_up);
                }
            }
            AppEvent::ViewResolved {
                request_id,
                succeeded,
            } => {
                tracing::info!(%request_id, succeeded, "prediction resolved");
                view_data.result_scroll = 0;
            }
            AppEvent::StaleResponseDiscarded {
                request_id,
                pending,
            } => {
                tracing::debug!(
                    %request_id,
                    pending = ?pending.map(RequestId::get),
                    "discarding response for superseded request"
                );
            }
            AppEvent::NavigatedBack => {
                view_data.help_visible = false;
                tracing::debug!("navigated back to home");
            }
            AppEvent::StatusUpdated(_) => {
                view_data.status_token = view_data.status_token.saturating_add(1);
                schedule_status_clear(tx, view_data.status_token);
            }
            AppEvent::ScreenChanged(_)
            | AppEvent::FocusChanged(_)
            | AppEvent::FieldEdited(_)
            | AppEvent::ViewCleared
            | AppEvent::SubmitRejected(_)
            | AppEvent::StatusCleared => {}
        }
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c')) {
        return true;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::F(1)) {
            view_data.help_visible = false;
        }
        return false;
    }

    if key.code == KeyCode::F(1) {
        view_data.help_visible = true;
        return false;
    }

    let command = match state.screen {
        Screen::Home => match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => {
                view_data.help_visible = true;
                return false;
            }
            KeyCode::Enter => Some(AppCommand::OpenForm),
            _ => None,
        },
        Screen::Recommend => match key.code {
            KeyCode::Esc => Some(AppCommand::NavigateBack),
            KeyCode::Tab | KeyCode::Down => Some(AppCommand::FocusNext),
            KeyCode::BackTab | KeyCode::Up => Some(AppCommand::FocusPrev),
            KeyCode::Enter => Some(AppCommand::Submit),
            KeyCode::Backspace => Some(AppCommand::Backspace),
            KeyCode::PageDown => {
                scroll_results(view_data, SCROLL_PAGE as i32);
                None
            }
            KeyCode::PageUp => {
                scroll_results(view_data, -(SCROLL_PAGE as i32));
                None
            }
            KeyCode::Char('d') if ctrl => {
                scroll_results(view_data, (SCROLL_PAGE / 2) as i32);
                None
            }
            KeyCode::Char('u') if ctrl => {
                scroll_results(view_data, -((SCROLL_PAGE / 2) as i32));
                None
            }
            KeyCode::Char(ch) if !ctrl => Some(AppCommand::Insert(ch)),
            _ => None,
        },
    };

    if let Some(command) = command {
        dispatch_and_apply(state, runtime, view_data, internal_tx, command);
    }
    false
}

fn scroll_results(view_data: &mut ViewData, delta: i32) {
    let next = i32::from(view_data.result_scroll) + delta;
    view_data.result_scroll = next.clamp(0, i32::from(u16::MAX)) as u16;
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    match state.screen {
        Screen::Home => render_home(frame, state),
        Screen::Recommend => render_recommend(frame, state, view_data),
    }

    if view_data.help_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_home(frame: &mut ratatui::Frame<'_>, state: &AppState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(frame.area());

    let body = Paragraph::new(render_home_text())
        .wrap(Wrap { trim: false })
        .block(Block::default().title("remedia").borders(Borders::ALL));
    frame.render_widget(body, layout[0]);

    let status = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status, layout[1]);
}

fn render_recommend(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let header = Paragraph::new(APP_TITLE)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().title(BACK_LABEL).borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    for (field, area) in FormField::ALL.into_iter().zip([layout[1], layout[2]]) {
        render_input(frame, state, field, area);
    }

    let results_style = match state.view {
        ViewState::Failure(_) => Style::default().fg(Color::Red),
        ViewState::Idle | ViewState::Success(_) => Style::default(),
    };
    let results = Paragraph::new(render_view_text(&state.view, state.pending))
        .style(results_style)
        .wrap(Wrap { trim: false })
        .scroll((view_data.result_scroll, 0))
        .block(Block::default().title("results").borders(Borders::ALL));
    frame.render_widget(results, layout[3]);

    let status = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status, layout[4]);
}

fn render_input(frame: &mut ratatui::Frame<'_>, state: &AppState, field: FormField, area: Rect) {
    let focused = state.focus == field;
    let value = state.form.value(field);
    let (text, text_style) = if value.is_empty() {
        (field.placeholder(), Style::default().fg(Color::DarkGray))
    } else {
        (value, Style::default())
    };
    let border_style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let input = Paragraph::new(text).style(text_style).block(
        Block::default()
            .title(field.label())
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(input, area);

    if focused {
        let typed = u16::try_from(value.chars().count()).unwrap_or(u16::MAX);
        let max_x = area.x.saturating_add(area.width.saturating_sub(2));
        let x = area.x.saturating_add(1).saturating_add(typed).min(max_x);
        frame.set_cursor_position(Position::new(x, area.y.saturating_add(1)));
    }
}

fn render_home_text() -> String {
    [
        APP_TITLE,
        "",
        "Describe your symptoms and enter your pincode to get a likely",
        "condition, medications, precautions, diet and workout plans,",
        "calendar reminders and pharmacies near you.",
        "",
        "enter start | ? help | q quit",
    ]
    .join("\n")
}

/// Result area text for the current view. Idle shows a hint, or a waiting
/// line while a request is outstanding.
fn render_view_text(view: &ViewState, pending: Option<RequestId>) -> String {
    match view {
        ViewState::Idle => match pending {
            Some(request_id) => format!("waiting for request {request_id}..."),
            None => "Fill in both fields and press enter to get recommendations.".to_owned(),
        },
        ViewState::Failure(error) => error.to_string(),
        ViewState::Success(payload) => render_result_text(&ResultView::from_payload(payload)),
    }
}

fn render_result_text(view: &ResultView) -> String {
    let mut lines = vec![view.heading.clone()];
    if !view.description.is_empty() {
        lines.push(view.description.clone());
    }
    for section in &view.sections {
        lines.push(String::new());
        lines.push(section.title().to_owned());
        for item in &section.items {
            lines.extend(section_item_lines(section.kind, item));
        }
    }
    lines.join("\n")
}

fn section_item_lines(kind: SectionKind, item: &SectionItem) -> Vec<String> {
    match item {
        SectionItem::Placeholder(text) => match kind {
            SectionKind::Medications | SectionKind::Precautions | SectionKind::Pharmacies => {
                vec![format!("  • {text}")]
            }
            SectionKind::Diet | SectionKind::Workout | SectionKind::Calendar => {
                vec![format!("  {text}")]
            }
        },
        SectionItem::Text(text) => vec![format!("  • {text}")],
        SectionItem::Day { label, lines } => {
            let mut out = vec![format!("  {label}")];
            out.extend(lines.iter().map(|line| format!("    {line}")));
            out
        }
        SectionItem::Link { label, url } => vec![format!("  [{label}] {url}")],
        SectionItem::Pharmacy { name, address } => vec![format!("  • {name} - {address}")],
    }
}

fn status_text(state: &AppState) -> String {
    let (screen, keys) = match state.screen {
        Screen::Home => ("HOME", "enter start | ? help | q quit"),
        Screen::Recommend => (
            "FORM",
            "tab/↑↓ field | enter submit | pgup/pgdn scroll | esc back | F1 help | ctrl+q",
        ),
    };
    match &state.status_line {
        Some(status) => format!("{screen} | {status} | {keys}"),
        None => format!("{screen} | {keys}"),
    }
}

fn help_overlay_text() -> &'static str {
    "home\n  enter       open the recommendation form\n  q           quit\n\nform\n  tab / ↓     next field\n  shift+tab / ↑  previous field\n  enter       submit symptoms and pincode\n  backspace   delete last character\n  pgup / pgdn scroll results (ctrl+u / ctrl+d half page)\n  esc         back to home\n\nanywhere\n  F1          toggle this help\n  ctrl+q      quit"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

use chrono::{Local, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::presenter::{self, DueTimeLabel, PARSE_FAILURE_LABEL};
use crate::tasks;

// ─── Root draw ────────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, app: &App) {
    let t    = &app.theme;
    let area = f.area();

    // Fill background
    f.render_widget(
        Block::default().style(Style::default().bg(t.bg()).fg(t.fg())),
        area,
    );

    // Layout: [ header(1) | divider(1) | task list | status_bar(1) ]
    let root = Layout::default().direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ]).split(area);

    draw_header(f, app, root[0]);
    draw_divider(f, app, root[1]);
    draw_tasks(f, app, root[2]);
    draw_statusbar(f, app, root[3]);
}

// ─── Header bar ───────────────────────────────────────────────────────────────

/// "Today" plus the completion gauge (the original widget's circular
/// progress ring, flattened into a bar).
fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let cols = Layout::default().direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Min(0),
            Constraint::Length(12),
        ]).split(area);

    let ratio         = tasks::progress(&app.tasks);
    let (fill, track) = t.gauge();
    f.render_widget(
        Gauge::default()
            .ratio(ratio)
            .label(format!("{:.0}%", ratio * 100.0))
            .gauge_style(Style::default().fg(fill).bg(track))
            .style(Style::default().bg(t.header_bg())),
        cols[0],
    );

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " Today",
            Style::default().fg(t.fg()).add_modifier(Modifier::BOLD),
        ))).style(Style::default().bg(t.header_bg())),
        cols[1],
    );

    let done = app.tasks.iter().filter(|t| t.completed).count();
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("{done}/{} done ", app.tasks.len()),
            Style::default().fg(t.fg_dim()),
        )))
        .alignment(Alignment::Right)
        .style(Style::default().bg(t.header_bg())),
        cols[2],
    );
}

fn draw_divider(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    f.render_widget(
        Paragraph::new(Span::styled(
            "╌".repeat(area.width as usize),
            Style::default().fg(t.muted()),
        )),
        area,
    );
}

// ─── Task list ────────────────────────────────────────────────────────────────

fn draw_tasks(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;

    if app.tasks.is_empty() {
        f.render_widget(
            Paragraph::new("\n  All clear — nothing due today")
                .style(Style::default().fg(t.fg_dim())),
            area,
        );
        return;
    }

    // View models are rebuilt from scratch on every draw.
    let now = Utc::now();

    let items: Vec<ListItem> = app.tasks.iter().enumerate().map(|(i, task)| {
        let vm  = presenter::present(task, now, &Local, t);
        let sel = i == app.cursor;

        let mark  = if task.completed { " ● " } else { " ○ " };
        let marks = Style::default().fg(vm.priority_color);
        let ts    = if task.completed {
            Style::default().fg(t.fg_dim()).add_modifier(Modifier::CROSSED_OUT)
        } else if sel {
            Style::default().fg(t.fg()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(t.fg())
        };

        // Detail line: optional time label, then the description.
        let mut detail: Vec<Span> = vec![Span::raw("   ")];
        match &vm.due_time {
            DueTimeLabel::Shown(label) => {
                let ls = if label.as_str() == PARSE_FAILURE_LABEL {
                    Style::default().fg(t.error()).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(t.fg_dim())
                };
                detail.push(Span::styled(label.clone(), ls));
                detail.push(Span::styled(" · ", Style::default().fg(t.muted())));
            }
            DueTimeLabel::Hidden => {}
        }
        detail.push(Span::styled(vm.description.clone(), Style::default().fg(t.fg_dim())));

        ListItem::new(vec![
            Line::from(vec![Span::styled(mark, marks), Span::styled(vm.title.clone(), ts)]),
            Line::from(detail),
        ])
    }).collect();

    let mut state = ListState::default();
    state.select(Some(app.cursor));
    f.render_stateful_widget(List::new(items).highlight_symbol("▶"), area, &mut state);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_statusbar(f: &mut Frame, app: &App, area: Rect) {
    let t   = &app.theme;
    let bar = Paragraph::new(Line::from(vec![
        Span::styled(
            " j/k:move  Space:done  r:reload  T:theme  q:quit",
            Style::default().fg(t.fg_dim()),
        ),
        Span::styled(
            format!("  {}", app.status),
            Style::default().fg(t.muted()).add_modifier(Modifier::ITALIC),
        ),
    ])).style(Style::default().bg(t.header_bg()));
    f.render_widget(bar, area);
}

pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use chrono::Local;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use engine::Month;

use crate::{
    app::{AppState, DashboardMode, Screen, Tab},
    store::Scope,
};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    match state.screen {
        Screen::Login => screens::login::render(frame, area, state),
        Screen::SignUp => screens::signup::render(frame, area, state),
        Screen::Landing => screens::landing::render(frame, area, state),
        Screen::Dashboard => render_shell(frame, area, state),
    }
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    // Main layout: info bar, tabs, content, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.dashboard.tab, &theme);
    screens::dashboard::render(frame, layout[2], state);
    render_bottom_bar(frame, layout[3], state, &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let (group_name, group_code) = state
        .store
        .current()
        .map(|group| (group.name.clone(), group.key.clone()))
        .unwrap_or_else(|| ("-".to_string(), "-".to_string()));
    let user = state.session.user_id().unwrap_or("-");

    let mut spans = vec![
        Span::styled("Group", Style::default().fg(theme.dim)),
        Span::raw(format!(": {group_name}  ")),
        Span::styled("Code", Style::default().fg(theme.dim)),
        Span::raw(format!(": {group_code}  ")),
        Span::styled("User", Style::default().fg(theme.dim)),
        Span::raw(format!(": {user}  ")),
        Span::styled("Scope", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", scope_label(state.store.scope()))),
    ];
    if state.store.is_stale() {
        spans.push(Span::styled(
            "NO LONGER IN GROUP LIST",
            Style::default().fg(theme.error),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn scope_label(scope: Scope) -> String {
    match scope {
        Scope::AllTime => "All time".to_string(),
        Scope::Month(month) => {
            if month == Month::containing(Local::now().date_naive()) {
                "This month".to_string()
            } else {
                month.label()
            }
        }
    }
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = components::tabs::tab_shortcuts(theme);

    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.extend(context_hints(state, theme));

    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn context_hints(state: &AppState, theme: &Theme) -> Vec<Span<'static>> {
    match state.dashboard.mode {
        DashboardMode::List => {
            let mut hints = vec![
                Span::styled("a", Style::default().fg(theme.accent)),
                Span::raw(" add  "),
            ];
            if state.dashboard.tab == Tab::Expenses {
                hints.push(Span::styled("d", Style::default().fg(theme.accent)));
                hints.push(Span::raw(" delete  "));
            }
            hints.extend([
                Span::styled("[", Style::default().fg(theme.accent)),
                Span::raw("/"),
                Span::styled("]", Style::default().fg(theme.accent)),
                Span::raw(" month  "),
                Span::styled("t", Style::default().fg(theme.accent)),
                Span::raw(" this month  "),
                Span::styled("o", Style::default().fg(theme.accent)),
                Span::raw(" all time  "),
                Span::styled("r", Style::default().fg(theme.accent)),
                Span::raw(" refresh  "),
                Span::styled("g", Style::default().fg(theme.accent)),
                Span::raw(" groups"),
            ]);
            hints
        }
        DashboardMode::AddExpense | DashboardMode::ConfirmDelete => vec![
            Span::styled("Enter", Style::default().fg(theme.accent)),
            Span::raw(" confirm  "),
            Span::styled("Esc", Style::default().fg(theme.accent)),
            Span::raw(" cancel"),
        ],
    }
}

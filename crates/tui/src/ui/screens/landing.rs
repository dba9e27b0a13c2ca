use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::{
    app::{AppState, LandingMode},
    ui::{components::form, theme::Theme},
};

const MENU_ITEMS: [(&str, &str); 4] = [
    ("Create group", "start a new expense group and share its code"),
    ("Join group", "enter a code to join an existing group"),
    ("Enter group", "open the group you already belong to"),
    ("Log out", "clear the stored token"),
];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    match state.landing.mode {
        LandingMode::Menu => render_menu(frame, area, state, &theme),
        LandingMode::Create => render_create(frame, area, state, &theme),
        LandingMode::Join => render_join(frame, area, state, &theme),
        LandingMode::Pick => render_pick(frame, area, state, &theme),
    }
}

fn render_menu(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card_area = form::centered_box(56, 10, area);
    frame.render_widget(Clear, card_area);

    let block = Block::default()
        .title(" tally ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(1), Constraint::Length(1)])
        .margin(1)
        .split(inner);

    let items: Vec<ListItem<'_>> = MENU_ITEMS
        .iter()
        .map(|(title, hint)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{title:<14}"), Style::default().fg(theme.text)),
                Span::styled(*hint, Style::default().fg(theme.dim)),
            ]))
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(state.landing.menu_selected));
    let list = List::new(items).highlight_style(
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_stateful_widget(list, rows[0], &mut list_state);

    if state.store.is_loaded() && state.store.current().is_none() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No group found. Create or join one.",
                Style::default().fg(theme.dim),
            ))
            .alignment(Alignment::Center),
            rows[1],
        );
    }

    frame.render_widget(
        Paragraph::new(Span::styled(
            "↑/↓ move · Enter select · q quit",
            Style::default().fg(theme.dim),
        ))
        .alignment(Alignment::Center),
        rows[2],
    );

    render_message(frame, card_area, area, state.landing.message.as_deref(), theme);
}

fn render_create(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    // After creation the box switches to showing the shareable code.
    if let Some(code) = &state.landing.created_code {
        let card_area = form::centered_box(44, 7, area);
        frame.render_widget(Clear, card_area);
        let block = Block::default()
            .title(" group created ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.positive));
        let inner = block.inner(card_area);
        frame.render_widget(block, card_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .margin(1)
            .split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(
                "Share this code with your group:",
                Style::default().fg(theme.text),
            ))
            .alignment(Alignment::Center),
            rows[0],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                code.as_str(),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            rows[2],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Enter done",
                Style::default().fg(theme.dim),
            ))
            .alignment(Alignment::Center),
            rows[4],
        );
        return;
    }

    let card_area = form::centered_box(44, 5, area);
    frame.render_widget(Clear, card_area);
    let block = Block::default()
        .title(" create group ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .margin(1)
        .split(inner);

    form::render_input(
        frame,
        rows[0],
        "Name",
        &state.landing.group_name,
        false,
        true,
        theme,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            "Enter create · Esc back",
            Style::default().fg(theme.dim),
        ))
        .alignment(Alignment::Center),
        rows[2],
    );

    render_message(frame, card_area, area, state.landing.message.as_deref(), theme);
}

fn render_join(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card_area = form::centered_box(44, 5, area);
    frame.render_widget(Clear, card_area);
    let block = Block::default()
        .title(" join group ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .margin(1)
        .split(inner);

    form::render_input(
        frame,
        rows[0],
        "Code",
        &state.landing.join_code,
        false,
        true,
        theme,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            "Enter join · Esc back",
            Style::default().fg(theme.dim),
        ))
        .alignment(Alignment::Center),
        rows[2],
    );

    render_message(frame, card_area, area, state.landing.message.as_deref(), theme);
}

fn render_pick(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let height = (state.landing.groups.len() as u16 + 4).clamp(6, area.height);
    let card_area = form::centered_box(56, height, area);
    frame.render_widget(Clear, card_area);
    let block = Block::default()
        .title(" choose a group ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .margin(1)
        .split(inner);

    let items: Vec<ListItem<'_>> = state
        .landing
        .groups
        .iter()
        .map(|group| {
            ListItem::new(Line::from(vec![
                Span::styled(group.name.clone(), Style::default().fg(theme.text)),
                Span::styled(
                    format!("  ({})", group.key),
                    Style::default().fg(theme.dim),
                ),
            ]))
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(state.landing.pick_selected));
    let list = List::new(items).highlight_style(
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_stateful_widget(list, rows[0], &mut list_state);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "↑/↓ move · Enter open · Esc back",
            Style::default().fg(theme.dim),
        ))
        .alignment(Alignment::Center),
        rows[1],
    );
}

fn render_message(
    frame: &mut Frame<'_>,
    card_area: Rect,
    area: Rect,
    message: Option<&str>,
    theme: &Theme,
) {
    let Some(message) = message else { return };
    let message_area = Rect {
        x: area.x,
        y: card_area.y + card_area.height + 1,
        width: area.width,
        height: 1,
    };
    if message_area.bottom() > area.bottom() {
        return;
    }
    frame.render_widget(
        Paragraph::new(Span::styled(message, Style::default().fg(theme.error)))
            .alignment(Alignment::Center),
        message_area,
    );
}

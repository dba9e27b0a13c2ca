use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, SignUpField},
    ui::{components::form, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let box_width = 44;
    let box_height = 11;
    let card_area = form::centered_box(box_width, box_height, area);

    frame.render_widget(Clear, card_area);

    let block = Block::default()
        .title(" create account ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Name
            Constraint::Length(1),
            Constraint::Length(1), // User id
            Constraint::Length(1),
            Constraint::Length(1), // Password
            Constraint::Length(1),
            Constraint::Length(1), // Confirm
            Constraint::Length(1),
            Constraint::Length(1), // Hint
        ])
        .margin(1)
        .split(inner);

    let signup = &state.signup;

    form::render_input(
        frame,
        rows[0],
        "Name",
        &signup.name,
        false,
        signup.focus == SignUpField::Name,
        &theme,
    );
    form::render_input(
        frame,
        rows[2],
        "User id",
        &signup.user_id,
        false,
        signup.focus == SignUpField::UserId,
        &theme,
    );
    form::render_input(
        frame,
        rows[4],
        "Password",
        &signup.password,
        true,
        signup.focus == SignUpField::Password,
        &theme,
    );
    form::render_input(
        frame,
        rows[6],
        "Confirm",
        &signup.confirm,
        true,
        signup.focus == SignUpField::Confirm,
        &theme,
    );

    frame.render_widget(
        Paragraph::new(Span::styled(
            "Enter sign up · Ctrl+R back to sign in",
            Style::default().fg(theme.dim),
        ))
        .alignment(Alignment::Center),
        rows[8],
    );

    if let Some(message) = &signup.message {
        let message_area = Rect {
            x: card_area.x,
            y: card_area.y + card_area.height + 1,
            width: card_area.width,
            height: 1,
        };
        if message_area.bottom() > area.bottom() {
            return;
        }
        frame.render_widget(
            Paragraph::new(Span::styled(
                message.as_str(),
                Style::default().fg(theme.error),
            ))
            .alignment(Alignment::Center),
            message_area,
        );
    }
}

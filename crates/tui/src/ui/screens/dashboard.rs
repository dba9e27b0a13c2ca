use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use engine::{Expense, share_of_total};

use crate::{
    app::{AddField, AppState, DashboardMode, Tab},
    ui::{
        components::{card::StatCard, form},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Stat cards
            Constraint::Min(3),    // Tab content
        ])
        .split(area);

    render_stats(frame, layout[0], state, &theme);

    match state.dashboard.tab {
        Tab::Expenses => render_expenses(frame, layout[1], state, &theme),
        Tab::Members => render_members(frame, layout[1], state, &theme),
    }

    match state.dashboard.mode {
        DashboardMode::List => {}
        DashboardMode::AddExpense => render_add_expense(frame, area, state, &theme),
        DashboardMode::ConfirmDelete => render_confirm_delete(frame, area, state, &theme),
    }
}

fn render_stats(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let members = state
        .store
        .current()
        .map(|group| group.members.len())
        .unwrap_or(0);

    StatCard::new(
        "Total Spent",
        format!("₹{:.2}", state.store.total_spent()),
        theme,
    )
    .render(frame, cols[0]);
    StatCard::new("Members", members.to_string(), theme).render(frame, cols[1]);
    StatCard::new(
        "Your Spend",
        format!("₹{:.2}", state.store.current_balance()),
        theme,
    )
    .render(frame, cols[2]);
}

fn render_expenses(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let expenses = state.store.visible_expenses();

    if expenses.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No expenses yet. Press a to add one.",
                Style::default().fg(theme.dim),
            ))
            .alignment(Alignment::Center),
            area,
        );
        return;
    }

    let items: Vec<ListItem<'_>> = expenses.iter().map(|e| expense_item(e, theme)).collect();

    let mut list_state = ListState::default();
    list_state.select(Some(
        state.dashboard.selected.min(expenses.len().saturating_sub(1)),
    ));

    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn expense_item<'a>(expense: &Expense, theme: &Theme) -> ListItem<'a> {
    let date = expense
        .payment_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "          ".to_string());
    let label = expense
        .description
        .clone()
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| expense.tags.join(", "));
    let tags = if expense.tags.is_empty() {
        String::new()
    } else {
        format!(
            "  {}",
            expense
                .tags
                .iter()
                .map(|t| format!("#{t}"))
                .collect::<Vec<_>>()
                .join(" ")
        )
    };

    ListItem::new(Line::from(vec![
        Span::styled(date, Style::default().fg(theme.dim)),
        Span::styled(
            format!("  ₹{:>9.2}", expense.amount),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {label}"), Style::default().fg(theme.text)),
        Span::styled(
            format!("  paid by {}", expense.paid_by),
            Style::default().fg(theme.dim),
        ),
        Span::styled(tags, Style::default().fg(theme.accent)),
    ]))
}

fn render_members(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(group) = state.store.current() else {
        return;
    };

    if group.members.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No members found.",
                Style::default().fg(theme.dim),
            ))
            .alignment(Alignment::Center),
            area,
        );
        return;
    }

    let balances = state.store.balances();
    let group_total: f64 = balances.iter().map(|b| b.total_spent).sum();

    let items: Vec<ListItem<'_>> = group
        .members
        .iter()
        .map(|member| {
            let spent = balances
                .iter()
                .find(|b| b.user_id == member.user_id)
                .map(|b| b.total_spent)
                .unwrap_or(0.0);
            let percentage = share_of_total(spent, group_total);

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        format!("{:<20}", member.name),
                        Style::default().fg(theme.text),
                    ),
                    Span::styled(
                        format!("₹{spent:>10.2}"),
                        Style::default()
                            .fg(theme.positive)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {percentage:>5.1}% of total"),
                        Style::default().fg(theme.dim),
                    ),
                ]),
                Line::from(Span::styled(
                    progress_bar(percentage, 24),
                    Style::default().fg(theme.positive),
                )),
            ])
        })
        .collect();

    frame.render_widget(List::new(items), area);
}

/// A fixed-width inline bar; the percentage is clamped to 100.
fn progress_bar(percentage: f64, width: usize) -> String {
    let clamped = percentage.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn render_add_expense(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card_area = form::centered_box(52, 11, area);
    frame.render_widget(Clear, card_area);

    let block = Block::default()
        .title(" add expense ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_focused));
    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Amount
            Constraint::Length(1),
            Constraint::Length(1), // Date
            Constraint::Length(1),
            Constraint::Length(1), // Tags
            Constraint::Length(1),
            Constraint::Length(1), // Extra groups
            Constraint::Length(1),
            Constraint::Length(1), // Hint / message
        ])
        .margin(1)
        .split(inner);

    let add = &state.dashboard.add;
    form::render_input(
        frame,
        rows[0],
        "Amount",
        &add.amount,
        false,
        add.focus == AddField::Amount,
        theme,
    );
    form::render_input(
        frame,
        rows[2],
        "Date",
        &add.date,
        false,
        add.focus == AddField::Date,
        theme,
    );
    form::render_input(
        frame,
        rows[4],
        "Tags",
        &add.tags,
        false,
        add.focus == AddField::Tags,
        theme,
    );
    form::render_input(
        frame,
        rows[6],
        "Groups",
        &add.extra_groups,
        false,
        add.focus == AddField::Groups,
        theme,
    );

    let footer = match &add.message {
        Some(message) => Span::styled(message.as_str(), Style::default().fg(theme.error)),
        None => Span::styled(
            "Tab next · Enter save · Esc cancel",
            Style::default().fg(theme.dim),
        ),
    };
    frame.render_widget(
        Paragraph::new(footer).alignment(Alignment::Center),
        rows[8],
    );
}

fn render_confirm_delete(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(expense) = &state.dashboard.pending_delete else {
        return;
    };

    let card_area = form::centered_box(50, 6, area);
    frame.render_widget(Clear, card_area);

    let block = Block::default()
        .title(" delete expense ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.error));
    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .margin(1)
        .split(inner);

    let label = expense
        .description
        .clone()
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| expense.tags.join(", "));
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("Delete \"{label}\" of ₹{:.2}?", expense.amount),
            Style::default().fg(theme.text),
        ))
        .alignment(Alignment::Center),
        rows[1],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            "Enter delete · Esc cancel",
            Style::default().fg(theme.dim),
        ))
        .alignment(Alignment::Center),
        rows[3],
    );
}

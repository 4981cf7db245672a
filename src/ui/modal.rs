// ============================================================================
// Modale de paiement
// ============================================================================
// Dessinée par-dessus le dashboard : Clear efface la zone avant le Block.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::ui::view::{CryptoOptionView, PaymentView};

/// Rectangle centré, en pourcentage de la zone
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
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
        .split(vertical[1])[1]
}

/// Dessine la modale de paiement
pub fn render_payment_modal(frame: &mut Frame, payment: &PaymentView) {
    let area = centered_rect(70, 80, frame.size());

    let (title, lines) = match payment {
        PaymentView::Selecting {
            product,
            store,
            total,
            options,
            countdown,
        } => (
            format!(" 💰 Pay with Crypto · ⏱ {} ", countdown),
            selecting_lines(product, store, total, options),
        ),
        PaymentView::Processing { countdown } => (
            format!(" 💰 Pay with Crypto · ⏱ {} ", countdown),
            processing_lines(),
        ),
        PaymentView::Succeeded {
            amount,
            paid_with,
            paid_at,
        } => (" ✓ Payment ".to_string(), success_lines(amount, paid_with, paid_at)),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(title)
        .title_alignment(Alignment::Center);

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn selecting_lines(product: &str, store: &str, total: &str, options: &[CryptoOptionView]) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(product.to_string(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(store.to_string(), Style::default().fg(Color::Gray))),
        Line::from(Span::styled("- - - - - - - - - - - - - - - -", Style::default().fg(Color::DarkGray))),
        Line::from(vec![
            Span::raw("Total: "),
            Span::styled(total.to_string(), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(Span::styled("Select Cryptocurrency:", Style::default().add_modifier(Modifier::BOLD))),
    ];

    for option in options {
        let marker = if option.selected { "● " } else { "○ " };
        let style = if option.selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{}{:<8}", marker, option.label), style),
            Span::styled(format!("{:<10}", option.name), Style::default().fg(Color::Gray)),
            Span::styled(format!("{:>24}", option.amount), style),
            Span::styled(format!("  {}", option.asset_price), Style::default().fg(Color::DarkGray)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Enter] ✓ Confirm Payment",
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )));
    lines
}

fn processing_lines() -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            "⏳ Processing Payment...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        Line::from(Span::styled(
            "Waiting for blockchain confirmation",
            Style::default().fg(Color::Gray),
        ))
        .alignment(Alignment::Center),
    ]
}

fn success_lines(amount: &str, paid_with: &str, paid_at: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            "✓ Payment Confirmed!",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        Line::from(Span::styled(
            "Your order has been successfully placed",
            Style::default().fg(Color::Gray),
        ))
        .alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled("Amount Paid:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(
            amount.to_string(),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::raw(format!("Paid with {}", paid_with))),
        Line::from(Span::styled(paid_at.to_string(), Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] Back to Shopping",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    ]
}

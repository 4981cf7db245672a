// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine l'interface TUI à partir des view-models (ui::view)
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Widgets : composants UI (Block, Paragraph, List, etc.)
// 3. Layout : découpage de l'espace en zones
// 4. Style : couleurs et attributs de texte
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, SEARCH_PROMPT};
use crate::ui::modal;
use crate::ui::view::{self, BodyView, OfferCardView, TickerRowView};

/// Dessine l'interface complète
///
/// La modale de paiement, si elle est ouverte, est dessinée par-dessus.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);
    render_search_bar(frame, app, chunks[1]);
    render_body(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);

    if let Some(payment) = view::payment_view(app) {
        modal::render_payment_modal(frame, &payment);
    }
}

/// Crée le layout principal (header, recherche, contenu, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header + ticker
            Constraint::Length(3), // Barre de recherche
            Constraint::Min(0),    // Contenu : tout le reste
            Constraint::Length(3), // Footer
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header : titre + ticker
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match view::ticker_updated_at(app) {
        Some(at) => format!(" CryptoCompare · {} ", at),
        None => " CryptoCompare ".to_string(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title)
        .title_alignment(Alignment::Center);

    let mut spans = Vec::new();
    for (i, row) in view::ticker_rows(app).iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        }
        spans.extend(ticker_spans(row));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Spans d'une ligne du ticker
fn ticker_spans(row: &TickerRowView) -> Vec<Span<'static>> {
    let color = if row.positive { Color::Green } else { Color::Red };

    // Surlignage transitoire après un tick
    let mut price_style = Style::default().fg(Color::White);
    if row.flashing {
        price_style = price_style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
    }

    vec![
        Span::styled(format!("{} ", row.icon), Style::default().fg(Color::Yellow)),
        Span::styled(format!("{} ", row.symbol), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(row.price.clone(), price_style),
        Span::raw(" "),
        Span::styled(row.change.clone(), Style::default().fg(color)),
    ]
}

// ============================================================================
// Barre de recherche
// ============================================================================

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = if app.is_in_input_mode() {
        Line::from(vec![
            Span::styled(
                SEARCH_PROMPT,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(app.input_buffer().to_string(), Style::default().fg(Color::White)),
            Span::styled(
                "█", // Curseur
                Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
            ),
        ])
    } else if app.search_field().is_empty() {
        Line::from(Span::styled(
            "Search for products... (press / to type)",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::raw(app.search_field().to_string()))
    };

    let border_color = if app.is_in_input_mode() { Color::Green } else { Color::Cyan };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" 🔍 Search ");

    frame.render_widget(Paragraph::new(line).block(block), area);
}

// ============================================================================
// Contenu principal : accueil / chargement / résultats
// ============================================================================

fn render_body(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    match view::body_view(app) {
        BodyView::Welcome { quick_searches } => {
            let mut lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Compare prices and pay with crypto",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled("Quick searches :", Style::default().fg(Color::Gray))),
            ];
            for (key, query) in quick_searches {
                lines.push(Line::from(vec![
                    Span::styled(format!("[{}]", key), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                    Span::raw(format!(" {}", query)),
                ]));
            }

            let paragraph = Paragraph::new(lines)
                .block(block.title(" 👋 Welcome "))
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
        }

        BodyView::Loading { query } => {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("⏳ Searching best prices for \"{}\"...", query),
                    Style::default().fg(Color::Yellow),
                )),
            ];
            let paragraph = Paragraph::new(lines)
                .block(block.title(" Loading "))
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
        }

        BodyView::Results { savings_banner, cards } => {
            render_results(frame, app, area, block, savings_banner, &cards);
        }
    }
}

/// Bandeau d'économie + liste des offres
fn render_results(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    block: Block,
    savings_banner: Option<String>,
    cards: &[OfferCardView],
) {
    let block = block.title(format!(" 🛒 {} offers ", cards.len()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let banner_height = if savings_banner.is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(banner_height), Constraint::Min(0)])
        .split(inner);

    if let Some(banner) = savings_banner {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            banner,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, chunks[0]);
    }

    let items: Vec<ListItem> = cards.iter().map(offer_item).collect();
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

    // CONCEPT RATATUI : StatefulWidget
    // - ListState garde l'item sélectionné visible (scroll automatique)
    let mut state = ListState::default();
    state.select(Some(app.selected_index()));
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

/// Carte d'une offre sur plusieurs lignes
fn offer_item(card: &OfferCardView) -> ListItem<'static> {
    let mut badges = Vec::new();
    if card.best_deal {
        badges.push(Span::styled(
            "🏆 Best Deal ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(discount) = &card.discount_badge {
        badges.push(Span::styled(format!("{} ", discount), Style::default().fg(Color::Red)));
    }
    badges.push(Span::styled(
        format!("[{}]", card.store),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ));

    let mut pricing = Vec::new();
    if let Some(original) = &card.original_price {
        pricing.push(Span::styled(
            original.clone(),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT),
        ));
        pricing.push(Span::raw(" "));
    }
    pricing.push(Span::styled(
        card.current_price.clone(),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    ));
    pricing.push(Span::raw("   "));
    pricing.push(Span::styled(card.availability.clone(), Style::default().fg(Color::Gray)));

    let lines = vec![
        Line::from(badges),
        Line::from(Span::styled(card.name.clone(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::raw(card.rating.clone())),
        Line::from(pricing),
        Line::from(""),
    ];

    let border = if card.best_deal { Color::Yellow } else { Color::White };
    ListItem::new(lines).style(Style::default().fg(border))
}

// ============================================================================
// Footer : raccourcis
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Press ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " again to quit, any other key to cancel ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if app.is_in_input_mode() {
        Line::from(vec![
            Span::styled("[Enter]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Search  "),
            Span::styled("[ESC]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" Cancel"),
        ])
    } else if app.payment().is_open() {
        Line::from(vec![
            Span::styled("[↑↓ / j k]", key_style),
            Span::raw(" Crypto  "),
            Span::styled("[Enter]", key_style),
            Span::raw(" Confirm  "),
            Span::styled("[ESC]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" Close"),
        ])
    } else {
        Line::from(vec![
            Span::styled("[q]", key_style),
            Span::raw(" Quit  "),
            Span::styled("[/]", key_style),
            Span::raw(" Search  "),
            Span::styled("[1-4]", key_style),
            Span::raw(" Quick  "),
            Span::styled("[↑↓ / j k]", key_style),
            Span::raw(" Navigate  "),
            Span::styled("[Enter / b]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Buy with crypto"),
        ])
    };

    let paragraph = Paragraph::new(vec![shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{default_assets, Catalog};
    use crate::scheduler::{AppMessage, Scheduler};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::mpsc;

    fn setup() -> (tokio::runtime::Runtime, App) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (tx, _rx) = mpsc::channel();
        let scheduler = Scheduler::new(runtime.handle().clone(), tx);
        let app = App::with_parts(
            Config::default(),
            scheduler,
            default_assets(),
            Catalog::sample(),
            StdRng::seed_from_u64(9),
        );
        (runtime, app)
    }

    /// Dessine l'app sur un terminal de test et retourne le texte affiché
    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_welcome() {
        let (_runtime, app) = setup();
        let screen = draw(&app);
        assert!(screen.contains("CryptoCompare"));
        assert!(screen.contains("BTC"));
        assert!(screen.contains("headphones"));
    }

    #[test]
    fn test_render_search_input() {
        let (_runtime, mut app) = setup();
        app.start_search_input();
        app.append_char('m');
        app.append_char('a');

        let screen = draw(&app);
        assert!(screen.contains("Search: ma█"));
        assert!(screen.contains("[ESC]"));

        app.cancel_input();
        let screen = draw(&app);
        assert!(!screen.contains("Search: "));
    }

    #[test]
    fn test_render_results_and_modal() {
        let (_runtime, mut app) = setup();
        app.submit_search("airpods");
        let session = app.search_session();
        app.handle_message(AppMessage::SearchReady {
            session,
            query: "airpods".to_string(),
        });

        let screen = draw(&app);
        assert!(screen.contains("Flipkart"));
        assert!(screen.contains("$239.00"));

        app.open_payment();
        let screen = draw(&app);
        assert!(screen.contains("Confirm Payment"));
        assert!(screen.contains("15:00"));
    }
}

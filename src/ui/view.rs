// ============================================================================
// View-models
// ============================================================================
// Structures typées construites depuis App, puis dessinées par dashboard.rs
// et modal.rs. Tout le texte affiché est calculé ici : les tests vérifient
// le contenu de l'interface sans terminal.
// ============================================================================

use crate::app::{App, SearchStatus};
use crate::models::catalog::QUICK_SEARCHES;
use crate::models::{savings, Asset, Offer};
use crate::payment::{CryptoQuote, PaymentState};
use crate::ui::format::{
    format_change, format_compact_price, format_countdown, format_crypto_amount, format_usd,
};

/// Une ligne du ticker
#[derive(Debug, Clone, PartialEq)]
pub struct TickerRowView {
    pub icon: String,
    pub symbol: String,
    pub price: String,
    pub change: String,
    pub positive: bool,
    pub flashing: bool,
}

impl TickerRowView {
    pub fn new(asset: &Asset, flashing: bool) -> Self {
        Self {
            icon: asset.icon.clone(),
            symbol: asset.symbol.clone(),
            price: format!("${}", format_compact_price(asset.price_usd)),
            change: format!("{} {}", asset.arrow(), format_change(asset.change_percent)),
            positive: asset.is_positive(),
            flashing,
        }
    }
}

/// Carte d'une offre dans les résultats
#[derive(Debug, Clone, PartialEq)]
pub struct OfferCardView {
    pub best_deal: bool,
    pub discount_badge: Option<String>,
    pub store: String,
    pub name: String,
    pub rating: String,
    pub original_price: Option<String>,
    pub current_price: String,
    pub availability: String,
    pub selected: bool,
}

impl OfferCardView {
    pub fn new(offer: &Offer, selected: bool) -> Self {
        let discount = offer.discount_percent();

        Self {
            best_deal: offer.best_deal,
            discount_badge: (discount > 0).then(|| format!("{}% OFF", discount)),
            store: offer.store.clone(),
            name: offer.name.clone(),
            rating: format!("{} {:.1}", offer.stars(), offer.rating),
            original_price: offer.original_price.map(format_usd),
            current_price: format_usd(offer.price),
            availability: format!("✓ {}", offer.availability),
            selected,
        }
    }
}

/// Zone principale sous la barre de recherche
#[derive(Debug, Clone, PartialEq)]
pub enum BodyView {
    Welcome {
        /// (touche, requête)
        quick_searches: Vec<(char, &'static str)>,
    },
    Loading {
        query: String,
    },
    Results {
        savings_banner: Option<String>,
        cards: Vec<OfferCardView>,
    },
}

/// Option de paiement dans la modale
#[derive(Debug, Clone, PartialEq)]
pub struct CryptoOptionView {
    pub label: String,
    pub name: String,
    pub amount: String,
    pub asset_price: String,
    pub selected: bool,
}

impl CryptoOptionView {
    pub fn new(quote: &CryptoQuote, selected: bool) -> Self {
        Self {
            label: format!("{} {}", quote.icon, quote.symbol),
            name: quote.name.clone(),
            amount: format!("{} {}", format_crypto_amount(quote.amount), quote.symbol),
            asset_price: format!("${}", format_compact_price(quote.asset_price_usd)),
            selected,
        }
    }
}

/// Contenu de la modale de paiement
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentView {
    Selecting {
        product: String,
        store: String,
        total: String,
        options: Vec<CryptoOptionView>,
        countdown: String,
    },
    Processing {
        countdown: String,
    },
    Succeeded {
        amount: String,
        paid_with: String,
        paid_at: String,
    },
}

/// Bandeau d'économie, absent si toutes les offres ont le même prix
pub fn savings_banner(offers: &[Offer]) -> Option<String> {
    let amount = savings(offers);
    (amount > 0.0).then(|| format!("💰 Save up to ${:.2} by choosing the best deal!", amount))
}

/// Lignes du ticker dans l'ordre des assets
pub fn ticker_rows(app: &App) -> Vec<TickerRowView> {
    let flashing = app.ticker().is_flashing();
    app.ticker()
        .assets()
        .iter()
        .map(|asset| TickerRowView::new(asset, flashing))
        .collect()
}

/// Heure de la dernière mise à jour du ticker
pub fn ticker_updated_at(app: &App) -> Option<String> {
    app.ticker()
        .last_updated()
        .map(|at| at.format("%H:%M:%S").to_string())
}

/// Zone principale
pub fn body_view(app: &App) -> BodyView {
    match app.search_status() {
        SearchStatus::Welcome => BodyView::Welcome {
            quick_searches: QUICK_SEARCHES
                .iter()
                .enumerate()
                .map(|(i, query)| (char::from(b'1' + i as u8), *query))
                .collect(),
        },
        SearchStatus::Loading { query } => BodyView::Loading { query: query.clone() },
        SearchStatus::Results { .. } => BodyView::Results {
            savings_banner: savings_banner(app.results()),
            cards: app
                .results()
                .iter()
                .enumerate()
                .map(|(i, offer)| OfferCardView::new(offer, i == app.selected_index()))
                .collect(),
        },
    }
}

/// Contenu de la modale, None si elle est fermée
pub fn payment_view(app: &App) -> Option<PaymentView> {
    let payment = app.payment();
    if !payment.is_open() {
        return None;
    }

    let countdown = format_countdown(payment.remaining_secs());

    match payment.state() {
        PaymentState::ModalOpen | PaymentState::Confirming => {
            let offer = payment.offer()?;
            Some(PaymentView::Selecting {
                product: offer.name.clone(),
                store: format!("From {}", offer.store),
                total: format_usd(offer.price),
                options: payment
                    .quotes()
                    .iter()
                    .enumerate()
                    .map(|(i, quote)| CryptoOptionView::new(quote, i == payment.selected_index()))
                    .collect(),
                countdown,
            })
        }
        PaymentState::Processing => Some(PaymentView::Processing { countdown }),
        PaymentState::Succeeded => {
            let receipt = payment.receipt()?;
            Some(PaymentView::Succeeded {
                amount: format!("{} USD", format_usd(receipt.amount_usd)),
                paid_with: format!("{} {}", format_crypto_amount(receipt.crypto_amount), receipt.symbol),
                paid_at: receipt.paid_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            })
        }
        PaymentState::Idle | PaymentState::Closed => None,
    }
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
            StdRng::seed_from_u64(5),
        );
        (runtime, app)
    }

    fn show_results(app: &mut App, query: &str) {
        app.submit_search(query);
        let session = app.search_session();
        app.handle_message(AppMessage::SearchReady {
            session,
            query: query.to_string(),
        });
    }

    #[test]
    fn test_ticker_rows() {
        let (_runtime, app) = setup();
        let rows = ticker_rows(&app);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].price, "$43,250");
        assert_eq!(rows[0].change, "▲ 2.40%");
        assert_eq!(rows[1].change, "▼ 1.20%");
        assert!(!rows[1].positive);
        assert_eq!(rows[3].price, "$72.5");
        assert!(ticker_updated_at(&app).is_none());
    }

    #[test]
    fn test_savings_banner() {
        let catalog = Catalog::sample();
        let banner = savings_banner(catalog.category("iphone 15").unwrap()).unwrap();
        assert!(banner.contains("$50.00"));

        let single = &catalog.category("airpods").unwrap()[..1];
        assert_eq!(savings_banner(single), None);
    }

    #[test]
    fn test_welcome_lists_quick_searches() {
        let (_runtime, app) = setup();
        match body_view(&app) {
            BodyView::Welcome { quick_searches } => {
                assert_eq!(quick_searches[0], ('1', "iphone 15"));
                assert_eq!(quick_searches[3], ('4', "headphones"));
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_results_cards() {
        let (_runtime, mut app) = setup();
        show_results(&mut app, "iphone 15");

        let BodyView::Results { savings_banner, cards } = body_view(&app) else {
            panic!("expected results");
        };
        assert!(savings_banner.is_some());
        assert_eq!(cards.len(), 3);
        assert!(cards[0].selected);
        assert_eq!(cards[0].discount_badge.as_deref(), Some("8% OFF"));
        assert_eq!(cards[0].rating, "⭐⭐⭐⭐ 4.6");
        assert_eq!(cards[0].original_price.as_deref(), Some("$1299.00"));
        assert_eq!(cards[1].current_price, "$1149.00");
        assert_eq!(cards[1].availability, "✓ Limited Stock");

        let best: Vec<&OfferCardView> = cards.iter().filter(|c| c.best_deal).collect();
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].store, "Flipkart");
    }

    #[test]
    fn test_payment_view_states() {
        let (_runtime, mut app) = setup();
        assert_eq!(payment_view(&app), None);

        show_results(&mut app, "airpods");
        app.open_payment();

        match payment_view(&app) {
            Some(PaymentView::Selecting { total, options, countdown, store, .. }) => {
                assert_eq!(total, "$249.00");
                assert_eq!(store, "From Amazon");
                assert_eq!(countdown, "15:00");
                assert_eq!(options[0].amount, "0.00575723 BTC");
                assert_eq!(options[0].asset_price, "$43,250");
                assert!(options[0].selected);
                assert_eq!(options[2].amount, "249.00000000 USDT");
            }
            other => panic!("unexpected view {other:?}"),
        }

        app.confirm_payment();
        assert!(matches!(payment_view(&app), Some(PaymentView::Processing { .. })));

        let session = app.payment().session();
        app.handle_message(AppMessage::ProcessingComplete { session });
        match payment_view(&app) {
            Some(PaymentView::Succeeded { amount, paid_with, .. }) => {
                assert_eq!(amount, "$249.00 USD");
                assert_eq!(paid_with, "0.00575723 BTC");
            }
            other => panic!("unexpected view {other:?}"),
        }

        app.close_payment();
        assert_eq!(payment_view(&app), None);
    }
}

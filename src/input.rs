// ============================================================================
// Gestion des entrées clavier
// ============================================================================
// Traduit un événement clavier en transition d'état sur App.
//
// Ordre de priorité :
// 1. Mode input : toutes les touches construisent la requête
// 2. Modale de paiement ouverte : sélection / confirmation / fermeture
// 3. Dashboard : recherche, navigation, achat
//
// CONCEPT RUST : Pattern matching avec guards
// - Les guards (if) filtrent selon l'événement ET le contexte
// - Le premier bras qui matche gagne
// ============================================================================

use tracing::{debug, info};

use crate::app::App;
use crate::payment::PaymentState;
use crate::ui::events::{
    get_char_from_event, is_backspace_event, is_buy_event, is_down_event, is_enter_event,
    is_escape_event, is_query_char_event, is_quit_event, is_search_event, is_up_event,
    quick_search_slot, Event,
};

/// Traite un événement et met à jour l'état de l'application
pub fn handle_event(app: &mut App, event: Event) {
    if matches!(event, Event::Tick) {
        return;
    }

    if app.is_in_input_mode() {
        handle_input_mode(app, &event);
        return;
    }

    // Two-step quit, valable partout hors saisie
    if is_quit_event(&event) {
        if app.is_awaiting_quit_confirmation() {
            info!("User confirmed quit");
            app.quit();
        } else {
            info!("User requested quit (awaiting confirmation)");
            app.request_quit();
        }
        return;
    }

    // Toute autre touche annule la demande de quit
    app.cancel_quit();

    if app.payment().is_open() {
        handle_payment_modal(app, &event);
    } else {
        handle_dashboard(app, &event);
    }
}

/// Saisie de la requête de recherche
fn handle_input_mode(app: &mut App, event: &Event) {
    match event {
        _ if is_escape_event(event) => {
            info!("User cancelled search input");
            app.cancel_input();
        }
        _ if is_enter_event(event) => {
            let query = app.submit_input();
            if !app.submit_search(&query) {
                debug!("Empty search query, ignoring");
            }
        }
        _ if is_backspace_event(event) => app.backspace(),
        _ if is_query_char_event(event) => {
            if let Some(c) = get_char_from_event(event) {
                app.append_char(c);
            }
        }
        _ => {}
    }
}

/// Modale de paiement
fn handle_payment_modal(app: &mut App, event: &Event) {
    match event {
        _ if is_escape_event(event) => app.close_payment(),
        _ if is_up_event(event) => {
            app.select_previous_asset();
        }
        _ if is_down_event(event) => {
            app.select_next_asset();
        }
        _ if is_enter_event(event) => {
            if app.payment().state() == PaymentState::Succeeded {
                // "Back to Shopping"
                app.close_payment();
            } else {
                app.confirm_payment();
            }
        }
        _ => {}
    }
}

/// Dashboard : recherche, navigation et achat
fn handle_dashboard(app: &mut App, event: &Event) {
    match event {
        _ if is_search_event(event) => {
            debug!("User opened search input");
            app.start_search_input();
        }
        _ if quick_search_slot(event).is_some() => {
            if let Some(slot) = quick_search_slot(event) {
                app.quick_search(slot);
            }
        }
        _ if is_up_event(event) => app.navigate_up(),
        _ if is_down_event(event) => app.navigate_down(),
        _ if is_enter_event(event) || is_buy_event(event) => {
            if !app.open_payment() {
                debug!("No offer selected, nothing to buy");
            }
        }
        _ => {}
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SearchStatus;
    use crate::config::Config;
    use crate::models::{default_assets, Catalog};
    use crate::scheduler::{AppMessage, Scheduler, TimerKind};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::mpsc;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    fn setup() -> (tokio::runtime::Runtime, App, mpsc::Receiver<AppMessage>) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (tx, rx) = mpsc::channel();
        let scheduler = Scheduler::new(runtime.handle().clone(), tx);
        let app = App::with_parts(
            Config::default(),
            scheduler,
            default_assets(),
            Catalog::sample(),
            StdRng::seed_from_u64(11),
        );
        (runtime, app, rx)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_event(app, key(KeyCode::Char(c)));
        }
    }

    /// Applique directement le résultat de la recherche en attente
    ///
    /// Le délai simulé n'est pas attendu : on rejoue le message du timer.
    fn finish_search(app: &mut App) {
        if let SearchStatus::Loading { query } = app.search_status().clone() {
            let session = app.search_session();
            app.handle_message(AppMessage::SearchReady { session, query });
        }
    }

    #[test]
    fn test_two_step_quit() {
        let (_runtime, mut app, _rx) = setup();
        handle_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.is_running());
        assert!(app.is_awaiting_quit_confirmation());

        // Une autre touche annule
        handle_event(&mut app, key(KeyCode::Down));
        assert!(!app.is_awaiting_quit_confirmation());

        handle_event(&mut app, key(KeyCode::Char('q')));
        handle_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.is_running());
    }

    #[test]
    fn test_typed_search() {
        let (_runtime, mut app, _rx) = setup();
        handle_event(&mut app, key(KeyCode::Char('/')));
        assert!(app.is_in_input_mode());

        // 'q' et 'j' sont du texte en mode input
        type_text(&mut app, "macbookqj");
        handle_event(&mut app, key(KeyCode::Backspace));
        handle_event(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.input_buffer(), "macbook");
        assert!(app.is_running());

        handle_event(&mut app, key(KeyCode::Enter));
        assert!(app.is_on_dashboard());
        assert_eq!(
            app.search_status(),
            &SearchStatus::Loading { query: "macbook".to_string() }
        );

        finish_search(&mut app);
        assert_eq!(app.results()[0].name, "MacBook Pro 14\" M3");
    }

    #[test]
    fn test_empty_submit_is_noop() {
        let (_runtime, mut app, _rx) = setup();
        handle_event(&mut app, key(KeyCode::Char('s')));
        type_text(&mut app, "   ");
        handle_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.search_status(), &SearchStatus::Welcome);
    }

    #[test]
    fn test_escape_cancels_input() {
        let (_runtime, mut app, _rx) = setup();
        handle_event(&mut app, key(KeyCode::Char('/')));
        type_text(&mut app, "air");
        handle_event(&mut app, key(KeyCode::Esc));
        assert!(app.is_on_dashboard());
        assert_eq!(app.input_buffer(), "");
        assert_eq!(app.search_status(), &SearchStatus::Welcome);
    }

    #[test]
    fn test_buy_flow_from_keyboard() {
        let (_runtime, mut app, _rx) = setup();

        handle_event(&mut app, key(KeyCode::Char('2')));
        finish_search(&mut app);
        assert_eq!(app.results().len(), 2);

        handle_event(&mut app, key(KeyCode::Down));
        handle_event(&mut app, key(KeyCode::Char('b')));
        assert!(app.payment().is_open());
        assert_eq!(app.payment().offer().unwrap().store, "Flipkart");

        // Dans la modale, ↓ sélectionne un asset (pas une offre)
        handle_event(&mut app, key(KeyCode::Down));
        assert_eq!(app.payment().state(), PaymentState::Confirming);
        assert_eq!(app.selected_index(), 1);

        handle_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.payment().state(), PaymentState::Processing);

        let session = app.payment().session();
        app.handle_message(AppMessage::ProcessingComplete { session });
        assert_eq!(app.payment().state(), PaymentState::Succeeded);

        // Enter : retour aux achats
        handle_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.payment().state(), PaymentState::Closed);
        assert_eq!(app.scheduler().active_timers(TimerKind::PaymentCountdown), 0);
    }

    #[test]
    fn test_escape_closes_modal() {
        let (_runtime, mut app, _rx) = setup();
        handle_event(&mut app, key(KeyCode::Char('1')));
        finish_search(&mut app);
        handle_event(&mut app, key(KeyCode::Enter));
        assert!(app.payment().is_open());

        handle_event(&mut app, key(KeyCode::Esc));
        assert!(!app.payment().is_open());
        assert_eq!(app.scheduler().active_timers(TimerKind::PaymentCountdown), 0);
    }
}

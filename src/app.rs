// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Encapsulation : les champs sont privés, accès via méthodes publiques
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - Les timers ne touchent jamais App directement : ils postent des
//   AppMessage que la boucle principale applique via handle_message()
// ============================================================================

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::models::{catalog, default_assets, normalize_query, savings, Asset, Catalog, Offer, PriceTicker};
use crate::payment::PaymentFlow;
use crate::scheduler::{AppMessage, Scheduler, TimerHandle, TimerKind};

// ============================================================================
// Enum : Screen
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Dashboard : navigation normale
// - InputMode : les touches construisent la requête de recherche
// La modale de paiement se superpose au Dashboard (voir PaymentFlow)
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : ticker + résultats
    Dashboard,

    /// Mode saisie de la recherche
    /// - Enter valide, ESC annule
    InputMode,
}

/// État de la zone de résultats
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    /// Aucune recherche lancée
    Welcome,

    /// Chargement simulé en cours
    Loading { query: String },

    /// Résultats affichés
    Results { query: String },
}

/// Prompt affiché en mode saisie
pub const SEARCH_PROMPT: &str = "Search: ";

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    running: bool,

    /// Écran actuellement affiché
    current_screen: Screen,

    /// Two-step quit : première pression de 'q' -> confirmation
    confirm_quit: bool,

    /// Buffer de saisie pour le mode Input
    input_buffer: String,

    /// Dernière requête soumise (affichée dans la barre de recherche)
    search_field: String,

    config: Config,
    scheduler: Scheduler,
    rng: StdRng,

    ticker: PriceTicker,
    catalog: Catalog,

    search: SearchStatus,
    search_session: u64,
    results: Vec<Offer>,

    /// Index de l'offre sélectionnée dans les résultats
    selected_index: usize,

    payment: PaymentFlow,

    ticker_timer: Option<TimerHandle>,
    flash_timer: Option<TimerHandle>,
    search_timer: Option<TimerHandle>,
}

impl App {
    /// Crée l'application avec les données d'exemple
    pub fn new(config: Config, scheduler: Scheduler) -> Self {
        Self::with_parts(config, scheduler, default_assets(), Catalog::sample(), StdRng::from_os_rng())
    }

    /// Crée l'application avec des données et un générateur explicites
    pub fn with_parts(
        config: Config,
        scheduler: Scheduler,
        assets: Vec<Asset>,
        catalog: Catalog,
        rng: StdRng,
    ) -> Self {
        let ticker = PriceTicker::new(assets, config.jitter());
        let payment = PaymentFlow::new(config.payment_timings());

        Self {
            running: true,
            current_screen: Screen::Dashboard,
            confirm_quit: false,
            input_buffer: String::new(),
            search_field: String::new(),
            config,
            scheduler,
            rng,
            ticker,
            catalog,
            search: SearchStatus::Welcome,
            search_session: 0,
            results: Vec::new(),
            selected_index: 0,
            payment,
            ticker_timer: None,
            flash_timer: None,
            search_timer: None,
        }
    }

    /// Démarre la mise à jour périodique des prix
    ///
    /// Le timer vit aussi longtemps que App (annulé au drop).
    pub fn start(&mut self) {
        let interval = self.config.ticker_interval();
        self.ticker_timer = Some(self.scheduler.every(TimerKind::PriceTicker, interval, AppMessage::PriceTick));
        info!(interval_ms = interval.as_millis() as u64, "Price ticker started");
    }

    // ========================================================================
    // Lecture de l'état
    // ========================================================================

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn current_screen(&self) -> &Screen {
        &self.current_screen
    }

    pub fn is_on_dashboard(&self) -> bool {
        self.current_screen == Screen::Dashboard
    }

    pub fn is_in_input_mode(&self) -> bool {
        self.current_screen == Screen::InputMode
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn search_field(&self) -> &str {
        &self.search_field
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn ticker(&self) -> &PriceTicker {
        &self.ticker
    }

    pub fn search_status(&self) -> &SearchStatus {
        &self.search
    }

    /// Identifiant de la dernière recherche lancée
    pub fn search_session(&self) -> u64 {
        self.search_session
    }

    pub fn results(&self) -> &[Offer] {
        &self.results
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Offre sélectionnée dans les résultats
    pub fn selected_offer(&self) -> Option<&Offer> {
        self.results.get(self.selected_index)
    }

    /// Économie maximale sur les résultats affichés
    pub fn savings(&self) -> f64 {
        savings(&self.results)
    }

    pub fn payment(&self) -> &PaymentFlow {
        &self.payment
    }

    // ========================================================================
    // Quit
    // ========================================================================

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Two-step quit : première pression
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    // ========================================================================
    // Input Mode Management
    // ========================================================================

    /// Entre en mode saisie de la recherche
    pub fn start_search_input(&mut self) {
        self.current_screen = Screen::InputMode;
        self.input_buffer.clear();
    }

    /// Annule le mode input et retourne au dashboard
    pub fn cancel_input(&mut self) {
        self.current_screen = Screen::Dashboard;
        self.input_buffer.clear();
    }

    /// Récupère la valeur saisie et retourne au dashboard
    pub fn submit_input(&mut self) -> String {
        let value = std::mem::take(&mut self.input_buffer);
        self.current_screen = Screen::Dashboard;
        value
    }

    pub fn append_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.input_buffer.pop();
    }

    // ========================================================================
    // Navigation dans les résultats
    // ========================================================================

    /// CONCEPT RUST : Saturating arithmetic
    /// - saturating_sub() ne descend pas en dessous de 0
    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn navigate_down(&mut self) {
        let max_index = self.results.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    // ========================================================================
    // Recherche
    // ========================================================================

    /// Lance une recherche (chargement simulé puis résultats)
    ///
    /// Une requête vide ne fait rien et retourne false. Une recherche en
    /// attente est remplacée.
    #[instrument(skip(self))]
    pub fn submit_search(&mut self, raw_query: &str) -> bool {
        let Some(query) = normalize_query(raw_query) else {
            debug!("Empty query, ignoring");
            return false;
        };

        if let Some(timer) = self.search_timer.take() {
            timer.cancel();
        }

        self.search_session += 1;
        self.search_field = raw_query.trim().to_string();
        self.search = SearchStatus::Loading { query: query.clone() };

        self.search_timer = Some(self.scheduler.after(
            TimerKind::SearchDelay,
            self.config.search_delay(),
            AppMessage::SearchReady {
                session: self.search_session,
                query: query.clone(),
            },
        ));

        info!(query = %query, session = self.search_session, "Searching");
        true
    }

    /// Recherche rapide (touches 1 à 4)
    pub fn quick_search(&mut self, slot: usize) -> bool {
        match catalog::quick_search(slot) {
            Some(query) => self.submit_search(query),
            None => false,
        }
    }

    /// Fin du chargement simulé : affiche les résultats
    fn search_ready(&mut self, session: u64, query: String) {
        if session != self.search_session {
            debug!(session, current = self.search_session, "Ignoring stale search result");
            return;
        }

        self.results = self.catalog.search(&query).to_vec();
        self.selected_index = 0;
        self.search_timer = None;

        info!(query = %query, offers = self.results.len(), savings = self.savings(), "Search results ready");
        self.search = SearchStatus::Results { query };
    }

    // ========================================================================
    // Paiement
    // ========================================================================

    /// Ouvre la modale de paiement pour l'offre sélectionnée
    pub fn open_payment(&mut self) -> bool {
        let Some(offer) = self.selected_offer().cloned() else {
            return false;
        };
        self.payment.open(offer, self.ticker.assets(), &self.scheduler);
        true
    }

    pub fn select_next_asset(&mut self) -> bool {
        self.payment.select_next()
    }

    pub fn select_previous_asset(&mut self) -> bool {
        self.payment.select_previous()
    }

    pub fn confirm_payment(&mut self) -> bool {
        self.payment.confirm(&self.scheduler)
    }

    pub fn close_payment(&mut self) {
        self.payment.close();
    }

    // ========================================================================
    // Messages des timers
    // ========================================================================

    /// Applique un message posté par un timer
    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::PriceTick => {
                self.ticker.tick(&mut self.rng);

                // Le surlignage précédent est remplacé
                self.flash_timer = Some(self.scheduler.after(
                    TimerKind::TickerFlash,
                    self.config.flash_duration(),
                    AppMessage::FlashEnd,
                ));
            }
            AppMessage::FlashEnd => {
                self.ticker.end_flash();
                self.flash_timer = None;
            }
            AppMessage::SearchReady { session, query } => {
                self.search_ready(session, query);
            }
            AppMessage::CountdownTick { session } => {
                self.payment.countdown_tick(session);
            }
            AppMessage::ProcessingComplete { session } => {
                self.payment.processing_complete(session);
            }
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::PaymentState;
    use std::sync::mpsc;
    use std::time::Duration;

    fn setup() -> (tokio::runtime::Runtime, App, mpsc::Receiver<AppMessage>) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (tx, rx) = mpsc::channel();
        let scheduler = Scheduler::new(runtime.handle().clone(), tx);
        let config = Config {
            search_delay_ms: 10,
            processing_delay_ms: 10,
            ..Config::default()
        };
        let app = App::with_parts(
            config,
            scheduler,
            default_assets(),
            Catalog::sample(),
            StdRng::seed_from_u64(3),
        );
        (runtime, app, rx)
    }

    /// Attend un message d'un type donné et l'applique
    fn pump_until(app: &mut App, rx: &mpsc::Receiver<AppMessage>, wanted: fn(&AppMessage) -> bool) {
        loop {
            let message = rx.recv_timeout(Duration::from_secs(2)).unwrap();
            let done = wanted(&message);
            app.handle_message(message);
            if done {
                return;
            }
        }
    }

    #[test]
    fn test_app_creation() {
        let (_runtime, app, _rx) = setup();
        assert!(app.is_running());
        assert!(app.is_on_dashboard());
        assert_eq!(app.search_status(), &SearchStatus::Welcome);
        assert!(app.results().is_empty());
        assert_eq!(app.payment().state(), PaymentState::Idle);
    }

    #[test]
    fn test_app_quit() {
        let (_runtime, mut app, _rx) = setup();
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());
        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_empty_search_is_noop() {
        let (_runtime, mut app, _rx) = setup();
        assert!(!app.submit_search("   "));
        assert_eq!(app.search_status(), &SearchStatus::Welcome);
        assert_eq!(app.scheduler().active_timers(TimerKind::SearchDelay), 0);
    }

    #[test]
    fn test_search_loading_then_results() {
        let (_runtime, mut app, rx) = setup();

        assert!(app.submit_search("  AirPods "));
        assert_eq!(
            app.search_status(),
            &SearchStatus::Loading { query: "airpods".to_string() }
        );
        assert_eq!(app.search_field(), "AirPods");

        pump_until(&mut app, &rx, |m| matches!(m, AppMessage::SearchReady { .. }));

        assert_eq!(
            app.search_status(),
            &SearchStatus::Results { query: "airpods".to_string() }
        );
        assert_eq!(app.results().len(), 2);
        assert_eq!(app.selected_offer().unwrap().store, "Amazon");
        assert!((app.savings() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_newer_search_replaces_pending_one() {
        let (_runtime, mut app, _rx) = setup();
        app.submit_search("macbook");
        let stale_session = app.search_session;
        app.submit_search("headphones");
        assert_eq!(app.scheduler().active_timers(TimerKind::SearchDelay), 1);

        app.handle_message(AppMessage::SearchReady {
            session: stale_session,
            query: "macbook".to_string(),
        });
        assert!(matches!(app.search_status(), SearchStatus::Loading { .. }));

        app.handle_message(AppMessage::SearchReady {
            session: app.search_session,
            query: "headphones".to_string(),
        });
        assert_eq!(app.results()[0].name, "Sony WH-1000XM5");
    }

    #[test]
    fn test_quick_search() {
        let (_runtime, mut app, _rx) = setup();
        assert!(app.quick_search(3));
        assert_eq!(app.search_field(), "macbook");
        assert!(!app.quick_search(9));
    }

    #[test]
    fn test_navigation() {
        let (_runtime, mut app, _rx) = setup();
        app.submit_search("iphone 15");
        app.handle_message(AppMessage::SearchReady {
            session: app.search_session,
            query: "iphone 15".to_string(),
        });

        assert_eq!(app.selected_index(), 0);
        app.navigate_down();
        app.navigate_down();
        app.navigate_down();
        assert_eq!(app.selected_index(), 2);
        app.navigate_up();
        assert_eq!(app.selected_offer().unwrap().store, "Flipkart");
    }

    #[test]
    fn test_price_tick_flashes_and_schedules_flash_end() {
        let (_runtime, mut app, _rx) = setup();
        app.handle_message(AppMessage::PriceTick);
        assert!(app.ticker().is_flashing());
        assert_eq!(app.ticker().ticks(), 1);
        assert_eq!(app.scheduler().active_timers(TimerKind::TickerFlash), 1);

        app.handle_message(AppMessage::FlashEnd);
        assert!(!app.ticker().is_flashing());
    }

    #[test]
    fn test_start_runs_single_ticker() {
        let (_runtime, mut app, _rx) = setup();
        app.start();
        assert_eq!(app.scheduler().active_timers(TimerKind::PriceTicker), 1);
        drop(app);
    }

    #[test]
    fn test_open_payment_requires_selection() {
        let (_runtime, mut app, rx) = setup();
        assert!(!app.open_payment());

        app.submit_search("airpods");
        pump_until(&mut app, &rx, |m| matches!(m, AppMessage::SearchReady { .. }));

        assert!(app.open_payment());
        assert!(app.payment().is_open());
        assert!(app.confirm_payment());

        pump_until(&mut app, &rx, |m| matches!(m, AppMessage::ProcessingComplete { .. }));
        assert_eq!(app.payment().state(), PaymentState::Succeeded);
        assert_eq!(app.payment().receipt().unwrap().amount_usd, 249.0);

        app.close_payment();
        assert_eq!(app.scheduler().active_timers(TimerKind::PaymentCountdown), 0);
    }
}

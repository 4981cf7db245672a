// ============================================================================
// Flux de paiement (state machine)
// ============================================================================
// Idle -> ModalOpen -> Confirming -> Processing -> Succeeded
// Closed est atteignable depuis n'importe quel état via close()
//
// PaymentFlow possède ses timers (compte à rebours, traitement simulé) :
// c'est le composant qui les démarre qui les annule.
//
// CONCEPTS RUST :
// 1. Enum pour state machine : un seul état actif à la fois
// 2. Option<TimerHandle> : take() + drop annule le timer
// 3. Identifiant de session : un message d'une modale précédente est ignoré
// ============================================================================

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::models::{Asset, Offer};
use crate::scheduler::{AppMessage, Scheduler, TimerHandle, TimerKind};

/// Période du compte à rebours
const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// États du flux de paiement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentState {
    /// Aucune modale ouverte depuis le démarrage
    Idle,

    /// Modale ouverte, premier asset présélectionné
    ModalOpen,

    /// L'utilisateur a choisi un asset
    Confirming,

    /// Attente simulée de confirmation
    Processing,

    /// Paiement confirmé, reçu disponible
    Succeeded,

    /// Modale fermée explicitement
    Closed,
}

/// Montant crypto équivalent pour un asset
#[derive(Debug, Clone, PartialEq)]
pub struct CryptoQuote {
    pub asset_id: String,
    pub symbol: String,
    pub name: String,
    pub icon: String,

    /// Prix de l'asset au moment de l'ouverture
    pub asset_price_usd: f64,

    /// Prix de l'offre / prix de l'asset
    pub amount: f64,
}

impl CryptoQuote {
    /// Calcule la cotation d'un montant USD dans un asset
    pub fn new(asset: &Asset, usd_amount: f64) -> Self {
        Self {
            asset_id: asset.id.clone(),
            symbol: asset.symbol.clone(),
            name: asset.name.clone(),
            icon: asset.icon.clone(),
            asset_price_usd: asset.price_usd,
            amount: asset.crypto_amount(usd_amount),
        }
    }
}

/// Reçu affiché après un paiement confirmé
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub product: String,
    pub store: String,
    pub amount_usd: f64,
    pub symbol: String,
    pub crypto_amount: f64,
    pub paid_at: DateTime<Utc>,
}

/// Durées du flux de paiement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentTimings {
    /// Délai simulé entre la confirmation et le succès
    pub processing_delay: Duration,

    /// Durée du compte à rebours affiché
    pub countdown_secs: u32,
}

impl Default for PaymentTimings {
    fn default() -> Self {
        Self {
            processing_delay: Duration::from_millis(3000),
            countdown_secs: 900,
        }
    }
}

/// Flux de paiement d'une offre en crypto simulée
#[derive(Debug)]
pub struct PaymentFlow {
    state: PaymentState,
    timings: PaymentTimings,

    /// Incrémenté à chaque ouverture
    session: u64,

    offer: Option<Offer>,
    quotes: Vec<CryptoQuote>,
    selected: usize,
    remaining_secs: u32,
    receipt: Option<Receipt>,

    countdown: Option<TimerHandle>,
    processing: Option<TimerHandle>,
}

impl PaymentFlow {
    pub fn new(timings: PaymentTimings) -> Self {
        Self {
            state: PaymentState::Idle,
            timings,
            session: 0,
            offer: None,
            quotes: Vec::new(),
            selected: 0,
            remaining_secs: timings.countdown_secs,
            receipt: None,
            countdown: None,
            processing: None,
        }
    }

    pub fn state(&self) -> PaymentState {
        self.state
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn offer(&self) -> Option<&Offer> {
        self.offer.as_ref()
    }

    pub fn quotes(&self) -> &[CryptoQuote] {
        &self.quotes
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_quote(&self) -> Option<&CryptoQuote> {
        self.quotes.get(self.selected)
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }

    /// Vrai si la modale doit être affichée
    pub fn is_open(&self) -> bool {
        matches!(
            self.state,
            PaymentState::ModalOpen
                | PaymentState::Confirming
                | PaymentState::Processing
                | PaymentState::Succeeded
        )
    }

    /// Vrai si le compte à rebours tourne encore
    pub fn is_countdown_running(&self) -> bool {
        self.countdown.as_ref().is_some_and(TimerHandle::is_active)
    }

    /// Ouvre la modale pour une offre
    ///
    /// Depuis n'importe quel état : un compte à rebours encore actif est
    /// annulé avant d'en démarrer un nouveau.
    #[instrument(skip_all, fields(product = %offer.name, store = %offer.store))]
    pub fn open(&mut self, offer: Offer, assets: &[Asset], scheduler: &Scheduler) {
        self.cancel_timers();

        self.session += 1;
        self.quotes = assets.iter().map(|a| CryptoQuote::new(a, offer.price)).collect();
        self.selected = 0;
        self.remaining_secs = self.timings.countdown_secs;
        self.receipt = None;
        self.offer = Some(offer);
        self.state = PaymentState::ModalOpen;

        self.countdown = Some(scheduler.every(
            TimerKind::PaymentCountdown,
            COUNTDOWN_PERIOD,
            AppMessage::CountdownTick { session: self.session },
        ));

        info!(session = self.session, quotes = self.quotes.len(), "Payment modal opened");
    }

    /// Sélectionne un asset par index
    pub fn select_asset(&mut self, index: usize) -> bool {
        if !matches!(self.state, PaymentState::ModalOpen | PaymentState::Confirming) {
            return false;
        }
        if index >= self.quotes.len() {
            return false;
        }

        self.selected = index;
        self.state = PaymentState::Confirming;
        debug!(symbol = %self.quotes[index].symbol, "Crypto option selected");
        true
    }

    /// Sélectionne l'asset suivant (reste sur le dernier)
    pub fn select_next(&mut self) -> bool {
        let max_index = self.quotes.len().saturating_sub(1);
        self.select_asset((self.selected + 1).min(max_index))
    }

    /// Sélectionne l'asset précédent (reste sur le premier)
    pub fn select_previous(&mut self) -> bool {
        self.select_asset(self.selected.saturating_sub(1))
    }

    /// Confirme le paiement avec l'asset sélectionné
    ///
    /// La présélection par défaut suffit : confirm() est accepté depuis
    /// ModalOpen comme depuis Confirming.
    pub fn confirm(&mut self, scheduler: &Scheduler) -> bool {
        if !matches!(self.state, PaymentState::ModalOpen | PaymentState::Confirming) {
            return false;
        }
        let Some(quote) = self.selected_quote() else {
            return false;
        };

        info!(session = self.session, symbol = %quote.symbol, "Payment confirmed, processing");

        self.state = PaymentState::Processing;
        self.processing = Some(scheduler.after(
            TimerKind::PaymentProcessing,
            self.timings.processing_delay,
            AppMessage::ProcessingComplete { session: self.session },
        ));
        true
    }

    /// Fin du traitement simulé
    pub fn processing_complete(&mut self, session: u64) -> bool {
        if session != self.session || self.state != PaymentState::Processing {
            debug!(session, current = self.session, "Ignoring stale processing completion");
            return false;
        }

        let (Some(offer), Some(quote)) = (self.offer.as_ref(), self.quotes.get(self.selected)) else {
            return false;
        };

        let receipt = Receipt {
            product: offer.name.clone(),
            store: offer.store.clone(),
            amount_usd: offer.price,
            symbol: quote.symbol.clone(),
            crypto_amount: quote.amount,
            paid_at: Utc::now(),
        };

        info!(
            session = self.session,
            amount_usd = receipt.amount_usd,
            symbol = %receipt.symbol,
            "Payment succeeded"
        );

        self.receipt = Some(receipt);
        self.processing = None;
        self.state = PaymentState::Succeeded;
        true
    }

    /// Une seconde de compte à rebours
    ///
    /// À zéro le timer est arrêté, sans autre transition.
    pub fn countdown_tick(&mut self, session: u64) -> bool {
        if session != self.session || !self.is_countdown_running() {
            return false;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);

        if self.remaining_secs == 0 {
            if let Some(timer) = self.countdown.take() {
                timer.cancel();
            }
            info!(session = self.session, "Payment countdown reached zero");
        }
        true
    }

    /// Ferme la modale et annule ses timers
    pub fn close(&mut self) {
        self.cancel_timers();
        if self.state != PaymentState::Closed {
            info!(session = self.session, from = ?self.state, "Payment modal closed");
        }
        self.state = PaymentState::Closed;
    }

    fn cancel_timers(&mut self) {
        if let Some(timer) = self.countdown.take() {
            timer.cancel();
        }
        if let Some(timer) = self.processing.take() {
            timer.cancel();
        }
    }
}

impl Default for PaymentFlow {
    fn default() -> Self {
        Self::new(PaymentTimings::default())
    }
}

// ============================================================================
// Tests
// ============================================================================

// ============================================================================
// Scheduler : timers avec poignée d'annulation
// ============================================================================
// Remplace setInterval / setTimeout : chaque timer est une tâche tokio qui
// poste un AppMessage dans un channel mpsc. La boucle principale (thread UI)
// draine le channel et applique les messages à App, toutes les mutations
// restent donc sur un seul thread.
//
// CONCEPTS RUST :
// 1. RAII : TimerHandle annule sa tâche dans Drop
//    - Une poignée perdue ne peut pas laisser un timer tourner
// 2. Atomics : AtomicBool / AtomicUsize partagés via Arc
//    - Compteurs de timers actifs lisibles sans lock
// 3. tokio::runtime::Handle : spawn depuis un thread hors runtime
// ============================================================================

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

// ============================================================================
// Messages postés par les timers
// ============================================================================

/// Messages envoyés à la boucle principale par les timers
///
/// Les messages liés à une session (recherche, paiement) portent son
/// identifiant : un message d'une session remplacée est ignoré.
#[derive(Debug, Clone, PartialEq)]
pub enum AppMessage {
    /// Mise à jour périodique des prix
    PriceTick,

    /// Fin du surlignage du ticker
    FlashEnd,

    /// Fin du chargement simulé d'une recherche
    SearchReady { session: u64, query: String },

    /// Une seconde de compte à rebours écoulée
    CountdownTick { session: u64 },

    /// Fin du traitement simulé d'un paiement
    ProcessingComplete { session: u64 },
}

/// Type de timer (un compteur d'actifs par type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    PriceTicker,
    TickerFlash,
    SearchDelay,
    PaymentCountdown,
    PaymentProcessing,
}

impl TimerKind {
    const COUNT: usize = 5;

    fn index(self) -> usize {
        match self {
            TimerKind::PriceTicker => 0,
            TimerKind::TickerFlash => 1,
            TimerKind::SearchDelay => 2,
            TimerKind::PaymentCountdown => 3,
            TimerKind::PaymentProcessing => 4,
        }
    }
}

/// Compteurs de timers vivants, par type
#[derive(Debug, Default)]
struct ActiveTimers {
    counts: [AtomicUsize; TimerKind::COUNT],
}

impl ActiveTimers {
    fn increment(&self, kind: TimerKind) {
        self.counts[kind.index()].fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self, kind: TimerKind) {
        self.counts[kind.index()].fetch_sub(1, Ordering::SeqCst);
    }

    fn get(&self, kind: TimerKind) -> usize {
        self.counts[kind.index()].load(Ordering::SeqCst)
    }
}

/// Marque un timer comme terminé
///
/// Retourne true pour l'appelant qui a effectivement fait la transition
/// vivant -> terminé : le compteur n'est décrémenté qu'une seule fois.
fn retire(alive: &AtomicBool, active: &ActiveTimers, kind: TimerKind) -> bool {
    if alive.swap(false, Ordering::SeqCst) {
        active.decrement(kind);
        true
    } else {
        false
    }
}

// ============================================================================
// TimerHandle
// ============================================================================

/// Poignée d'annulation d'un timer
///
/// L'annulation est idempotente et automatique au drop.
#[derive(Debug)]
pub struct TimerHandle {
    kind: TimerKind,
    alive: Arc<AtomicBool>,
    active: Arc<ActiveTimers>,
    task: JoinHandle<()>,
}

impl TimerHandle {
    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    /// Vrai tant que le timer n'a été ni annulé ni terminé
    pub fn is_active(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Annule le timer
    pub fn cancel(&self) {
        if retire(&self.alive, &self.active, self.kind) {
            debug!(kind = ?self.kind, "Timer cancelled");
        }
        self.task.abort();
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ============================================================================
// Scheduler
// ============================================================================

/// Lance des timers sur un runtime tokio
///
/// CONCEPT RUST : Clone bon marché
/// - Handle, Sender et Arc sont tous des poignées partagées
/// - Cloner le Scheduler ne duplique aucun timer
#[derive(Debug, Clone)]
pub struct Scheduler {
    runtime: Handle,
    sender: mpsc::Sender<AppMessage>,
    active: Arc<ActiveTimers>,
}

impl Scheduler {
    /// Crée un scheduler qui poste ses messages dans `sender`
    pub fn new(runtime: Handle, sender: mpsc::Sender<AppMessage>) -> Self {
        Self {
            runtime,
            sender,
            active: Arc::new(ActiveTimers::default()),
        }
    }

    /// Nombre de timers vivants d'un type donné
    pub fn active_timers(&self, kind: TimerKind) -> usize {
        self.active.get(kind)
    }

    /// Timer répétitif : poste `message` toutes les `period`
    ///
    /// Le premier message part après une période complète.
    pub fn every(&self, kind: TimerKind, period: Duration, message: AppMessage) -> TimerHandle {
        let alive = Arc::new(AtomicBool::new(true));
        self.active.increment(kind);

        let task_alive = alive.clone();
        let task_active = self.active.clone();
        let sender = self.sender.clone();

        let task = self.runtime.spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);

            loop {
                interval.tick().await;

                if !task_alive.load(Ordering::SeqCst) {
                    break;
                }

                trace!(kind = ?kind, "Timer fired");
                if sender.send(message.clone()).is_err() {
                    // Boucle principale terminée : plus personne n'écoute
                    retire(&task_alive, &task_active, kind);
                    break;
                }
            }
        });

        debug!(kind = ?kind, period_ms = period.as_millis() as u64, "Interval timer started");

        TimerHandle {
            kind,
            alive,
            active: self.active.clone(),
            task,
        }
    }

    /// Timer unique : poste `message` après `delay`
    pub fn after(&self, kind: TimerKind, delay: Duration, message: AppMessage) -> TimerHandle {
        let alive = Arc::new(AtomicBool::new(true));
        self.active.increment(kind);

        let task_alive = alive.clone();
        let task_active = self.active.clone();
        let sender = self.sender.clone();

        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            // Annulé pendant l'attente : rien à envoyer
            if !retire(&task_alive, &task_active, kind) {
                return;
            }

            trace!(kind = ?kind, "One-shot timer fired");
            let _ = sender.send(message);
        });

        debug!(kind = ?kind, delay_ms = delay.as_millis() as u64, "One-shot timer started");

        TimerHandle {
            kind,
            alive,
            active: self.active.clone(),
            task,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

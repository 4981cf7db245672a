// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Non-blocking I/O : poll avec timeout pour ne pas bloquer la boucle
// 3. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Aucun événement pendant le timeout : on redessine
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    /// Attente maximale d'un événement clavier
    poll_timeout: Duration,
}

impl EventHandler {
    /// Crée un gestionnaire avec un timeout de 250ms
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_millis(250))
    }

    pub fn with_timeout(poll_timeout: Duration) -> Self {
        Self { poll_timeout }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// - Si pas d'événement avant le timeout, retourne Ok(Event::Tick)
    /// - Seules les pressions de touche sont gardées (pas les Release)
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.poll_timeout)? {
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                // Release, resize, souris : ignorés
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers : Convertir KeyEvent en action
// ============================================================================

/// Code de touche d'un événement clavier
fn key_code(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(key) => Some(key.code),
        Event::Tick => None,
    }
}

/// Vérifie si l'événement est la touche 'q' (quitter)
pub fn is_quit_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('q') | KeyCode::Char('Q')))
}

/// Vérifie si l'événement est Échap
pub fn is_escape_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Esc))
}

/// Vérifie si l'événement est Entrée
pub fn is_enter_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Enter))
}

/// Flèche vers le haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K')))
}

/// Flèche vers le bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J')))
}

/// '/' ou 's' : ouvre la saisie de recherche
pub fn is_search_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('/') | KeyCode::Char('s') | KeyCode::Char('S')))
}

/// 'b' : acheter l'offre sélectionnée
pub fn is_buy_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('b') | KeyCode::Char('B')))
}

/// Vérifie si l'événement est Backspace
pub fn is_backspace_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Backspace))
}

/// Caractère imprimable accepté dans la requête de recherche
pub fn is_query_char_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char(c)) if !c.is_control())
}

/// Extrait le caractère d'un événement clavier si c'est un caractère
pub fn get_char_from_event(event: &Event) -> Option<char> {
    match key_code(event) {
        Some(KeyCode::Char(c)) => Some(c),
        _ => None,
    }
}

/// Touche de recherche rapide : '1' à '9' -> Some(1..=9)
pub fn quick_search_slot(event: &Event) -> Option<usize> {
    get_char_from_event(event)
        .and_then(|c| c.to_digit(10))
        .filter(|d| *d > 0)
        .map(|d| d as usize)
}

// ============================================================================
// Tests
// ============================================================================

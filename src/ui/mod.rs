// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;    // Gestion des événements clavier
pub mod format;    // Formatage des prix, montants et durées
pub mod view;      // View-models construits depuis App
pub mod dashboard; // Rendu de l'interface principale
pub mod modal;     // Modale de paiement

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use dashboard::render;

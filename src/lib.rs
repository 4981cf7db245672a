// ============================================================================
// CryptoCompare - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod config;    // Configuration (fichier JSON + valeurs par défaut)
pub mod models;    // Structures de données
pub mod scheduler; // Timers et messages vers l'event loop
pub mod payment;   // Machine à états du paiement crypto
pub mod app;       // État de l'application
pub mod input;     // Clavier -> transitions d'état
pub mod ui;        // Interface utilisateur

// ============================================================================
// Module : models
// ============================================================================
// Ce module contient les structures de données de l'application :
// cryptomonnaies simulées, offres produits, catalogue et ticker
// ============================================================================

pub mod asset;   // Cryptomonnaie simulée (fichier asset.rs)
pub mod offer;   // Offre produit (fichier offer.rs)
pub mod catalog; // Catalogue fixe + recherche (fichier catalog.rs)
pub mod ticker;  // Ticker de prix simulés (fichier ticker.rs)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use cryptocompare::models::asset::Asset;
// On peut faire : use cryptocompare::models::Asset;
pub use asset::{default_assets, Asset};
pub use catalog::{normalize_query, savings, Catalog};
pub use offer::Offer;
pub use ticker::{Jitter, PriceTicker};

// ============================================================================
// Structure : Asset
// ============================================================================
// Représente une cryptomonnaie simulée (prix en USD + variation)
//
// CONCEPTS RUST :
// 1. #[derive(...)] : Debug, Clone, PartialEq, Serialize, Deserialize
// 2. &'static str vs String : les assets par défaut sont des constantes,
//    mais l'Asset possède ses données (String) pour rester indépendant
// ============================================================================

use serde::{Deserialize, Serialize};

/// Prix plancher appliqué après une variation aléatoire
///
/// Le prix sert de diviseur pour le calcul des montants crypto,
/// il doit rester strictement positif.
pub const MIN_PRICE_USD: f64 = 0.01;

/// Cryptomonnaie simulée affichée dans le ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Identifiant stable (ex: "bitcoin")
    pub id: String,

    /// Symbole (ex: "BTC")
    pub symbol: String,

    /// Nom complet (ex: "Bitcoin")
    pub name: String,

    /// Prix actuel en USD
    pub price_usd: f64,

    /// Variation en pourcentage (remplacée à chaque tick)
    pub change_percent: f64,

    /// Glyphe affiché devant le symbole (ex: "₿")
    pub icon: String,
}

impl Asset {
    /// Crée un nouvel asset
    pub fn new(id: &str, symbol: &str, name: &str, price_usd: f64, change_percent: f64, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            price_usd,
            change_percent,
            icon: icon.to_string(),
        }
    }

    /// Retourne true si la variation est positive ou nulle
    pub fn is_positive(&self) -> bool {
        self.change_percent >= 0.0
    }

    /// Flèche de tendance : ▲ en hausse (ou stable), ▼ en baisse
    pub fn arrow(&self) -> &'static str {
        if self.is_positive() {
            "▲"
        } else {
            "▼"
        }
    }

    /// Montant en crypto équivalent à un montant en USD
    ///
    /// Le prix est toujours > 0 (validé au démarrage puis borné par
    /// MIN_PRICE_USD à chaque tick).
    pub fn crypto_amount(&self, usd_amount: f64) -> f64 {
        usd_amount / self.price_usd
    }

    /// Applique une variation de prix et une nouvelle variation en %
    ///
    /// CONCEPT RUST : f64::max pour borner une valeur
    /// - Le prix ne descend jamais sous MIN_PRICE_USD
    /// - Le plancher rapproche le prix de sa valeur d'origine, il ne dépasse
    ///   donc jamais l'amplitude de la variation demandée
    pub fn apply_variation(&mut self, price_delta: f64, new_change_percent: f64) {
        self.price_usd = (self.price_usd + price_delta).max(MIN_PRICE_USD);
        self.change_percent = new_change_percent;
    }
}

/// Table des assets par défaut, dans l'ordre d'affichage
pub fn default_assets() -> Vec<Asset> {
    vec![
        Asset::new("bitcoin", "BTC", "Bitcoin", 43250.0, 2.4, "₿"),
        Asset::new("ethereum", "ETH", "Ethereum", 2280.0, -1.2, "Ξ"),
        Asset::new("tether", "USDT", "Tether", 1.00, 0.0, "₮"),
        Asset::new("litecoin", "LTC", "Litecoin", 72.50, 3.8, "Ł"),
    ]
}

// ============================================================================
// Tests unitaires
// ============================================================================

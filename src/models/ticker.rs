// ============================================================================
// Structure : PriceTicker
// ============================================================================
// Table ordonnée des assets, mise à jour périodiquement avec des variations
// aléatoires.
//
// CONCEPTS RUST :
// 1. Génériques : tick() accepte n'importe quel générateur (impl Rng)
//    - En production : StdRng initialisé depuis l'OS
//    - En test : StdRng::seed_from_u64 (déterministe)
// 2. DateTime<Utc> : horodatage de la dernière mise à jour
// ============================================================================

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, instrument};

use crate::models::Asset;

/// Amplitudes des variations appliquées à chaque tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jitter {
    /// Variation maximale du prix, en USD, dans les deux sens
    pub price_usd: f64,

    /// Variation en % maximale, dans les deux sens
    pub change_percent: f64,
}

impl Default for Jitter {
    fn default() -> Self {
        Self {
            price_usd: 50.0,
            change_percent: 2.5,
        }
    }
}

/// Ticker de prix simulés
#[derive(Debug, Clone)]
pub struct PriceTicker {
    /// Assets dans l'ordre d'affichage
    assets: Vec<Asset>,

    /// Amplitudes des variations
    jitter: Jitter,

    /// Surlignage transitoire après un tick
    flashing: bool,

    /// Nombre de ticks appliqués
    ticks: u64,

    /// Date de la dernière mise à jour (None avant le premier tick)
    last_updated: Option<DateTime<Utc>>,
}

impl PriceTicker {
    /// Crée un ticker à partir d'une table d'assets
    pub fn new(assets: Vec<Asset>, jitter: Jitter) -> Self {
        Self {
            assets,
            jitter,
            flashing: false,
            ticks: 0,
            last_updated: None,
        }
    }

    /// Assets dans l'ordre d'affichage
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Recherche un asset par identifiant
    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn jitter(&self) -> Jitter {
        self.jitter
    }

    pub fn is_flashing(&self) -> bool {
        self.flashing
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Applique une variation aléatoire à chaque asset
    ///
    /// - prix : + U(-price_usd, +price_usd), borné par MIN_PRICE_USD
    /// - variation : remplacée par U(-change_percent, +change_percent)
    ///
    /// Active le surlignage, qui sera éteint par end_flash().
    #[instrument(skip_all)]
    pub fn tick<R: Rng>(&mut self, rng: &mut R) {
        let Jitter { price_usd, change_percent } = self.jitter;

        for asset in &mut self.assets {
            let delta = rng.random_range(-price_usd..=price_usd);
            let change = rng.random_range(-change_percent..=change_percent);
            asset.apply_variation(delta, change);
        }

        self.ticks += 1;
        self.flashing = true;
        self.last_updated = Some(Utc::now());

        debug!(tick = self.ticks, assets = self.assets.len(), "Ticker prices updated");
    }

    /// Éteint le surlignage transitoire
    pub fn end_flash(&mut self) {
        self.flashing = false;
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::asset::{default_assets, MIN_PRICE_USD};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_tick_stays_within_bounds() {
        let mut ticker = PriceTicker::new(default_assets(), Jitter::default());
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let before: Vec<f64> = ticker.assets().iter().map(|a| a.price_usd).collect();
            ticker.tick(&mut rng);

            for (asset, old_price) in ticker.assets().iter().zip(before) {
                assert!((asset.price_usd - old_price).abs() <= 50.0 + 1e-9);
                assert!(asset.change_percent.abs() <= 2.5);
                assert!(asset.price_usd >= MIN_PRICE_USD);
            }
        }

        assert_eq!(ticker.ticks(), 200);
    }

    #[test]
    fn test_tick_flash_cycle() {
        let mut ticker = PriceTicker::new(default_assets(), Jitter::default());
        assert!(!ticker.is_flashing());
        assert!(ticker.last_updated().is_none());

        ticker.tick(&mut StdRng::seed_from_u64(7));
        assert!(ticker.is_flashing());
        assert!(ticker.last_updated().is_some());

        ticker.end_flash();
        assert!(!ticker.is_flashing());
    }

    #[test]
    fn test_tick_keeps_order() {
        let mut ticker = PriceTicker::new(default_assets(), Jitter::default());
        ticker.tick(&mut StdRng::seed_from_u64(1));
        let ids: Vec<&str> = ticker.assets().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["bitcoin", "ethereum", "tether", "litecoin"]);
        assert!(ticker.asset("tether").is_some());
    }
}

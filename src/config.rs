// ============================================================================
// Configuration
// ============================================================================
// Valeurs par défaut + fichier JSON optionnel :
// - Linux : ~/.config/cryptocompare/config.json
// - macOS : ~/Library/Application Support/cryptocompare/config.json
//
// Chaque champ a une valeur par défaut : un fichier partiel est valide.
// La validation est faite au démarrage, avant de passer le terminal en raw
// mode, pour que l'erreur reste lisible.
// ============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::models::{Asset, Jitter};
use crate::payment::PaymentTimings;

/// Nom du fichier de configuration
const CONFIG_FILE: &str = "config.json";

/// Configuration de l'application
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base d'API (conservée pour compatibilité, aucune requête n'est faite)
    pub api_base: String,

    /// Période de mise à jour du ticker
    pub ticker_interval_ms: u64,

    /// Variation maximale du prix à chaque tick, en USD
    pub price_jitter_usd: f64,

    /// Variation maximale en % à chaque tick
    pub change_jitter_percent: f64,

    /// Durée du surlignage après un tick
    pub flash_ms: u64,

    /// Chargement simulé d'une recherche
    pub search_delay_ms: u64,

    /// Traitement simulé d'un paiement
    pub processing_delay_ms: u64,

    /// Durée du compte à rebours de paiement
    pub countdown_secs: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".to_string(),
            ticker_interval_ms: 5000,
            price_jitter_usd: 50.0,
            change_jitter_percent: 2.5,
            flash_ms: 500,
            search_delay_ms: 1500,
            processing_delay_ms: 3000,
            countdown_secs: 900,
        }
    }
}

impl Config {
    /// Chemin du fichier de configuration utilisateur
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cryptocompare").join(CONFIG_FILE))
    }

    /// Charge la configuration utilisateur, ou les valeurs par défaut
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Charge un fichier de configuration JSON
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Échec de la lecture de {}", path.display()))?;

        let config = Self::from_json_str(&content)
            .with_context(|| format!("Configuration invalide dans {}", path.display()))?;

        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Parse une configuration JSON (champs absents = valeurs par défaut)
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Échec du parsing JSON de la configuration")
    }

    /// Vérifie la cohérence de la configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(self.ticker_interval_ms > 0, "ticker_interval_ms doit être > 0");
        ensure!(self.flash_ms > 0, "flash_ms doit être > 0");
        ensure!(self.countdown_secs > 0, "countdown_secs doit être > 0");
        ensure!(
            is_valid_jitter(self.price_jitter_usd),
            "price_jitter_usd invalide : {}",
            self.price_jitter_usd
        );
        ensure!(
            is_valid_jitter(self.change_jitter_percent),
            "change_jitter_percent invalide : {}",
            self.change_jitter_percent
        );
        Ok(())
    }

    pub fn ticker_interval(&self) -> Duration {
        Duration::from_millis(self.ticker_interval_ms)
    }

    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_ms)
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    pub fn jitter(&self) -> Jitter {
        Jitter {
            price_usd: self.price_jitter_usd,
            change_percent: self.change_jitter_percent,
        }
    }

    pub fn payment_timings(&self) -> PaymentTimings {
        PaymentTimings {
            processing_delay: Duration::from_millis(self.processing_delay_ms),
            countdown_secs: self.countdown_secs,
        }
    }
}

/// Une borne de variation tirée dans [-x, x]
///
/// 0 fige les prix. L'étendue 2x doit rester finie, sinon le tirage aléatoire
/// panique.
fn is_valid_jitter(bound: f64) -> bool {
    bound >= 0.0 && (2.0 * bound).is_finite()
}

/// Vérifie la table d'assets au démarrage
///
/// Le prix sert de diviseur pour les montants crypto : il doit être > 0.
pub fn validate_assets(assets: &[Asset]) -> Result<()> {
    ensure!(!assets.is_empty(), "la table des cryptomonnaies est vide");

    for asset in assets {
        ensure!(
            asset.price_usd.is_finite() && asset.price_usd > 0.0,
            "prix invalide pour {} : {}",
            asset.symbol,
            asset.price_usd
        );
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

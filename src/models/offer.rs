// ============================================================================
// Structure : Offer
// ============================================================================
// Représente une offre produit (un produit chez un marchand donné)
//
// Les offres sont des données d'exemple immuables : elles ne sont jamais
// créées ni détruites pendant l'exécution, seulement clonées dans la liste
// de résultats.
// ============================================================================

use serde::{Deserialize, Serialize};

/// Offre produit chez un marchand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Nom du produit (ex: "AirPods Pro (2nd Gen)")
    pub name: String,

    /// Prix actuel en USD
    pub price: f64,

    /// Prix barré (optionnel)
    pub original_price: Option<f64>,

    /// Marchand (ex: "Amazon")
    pub store: String,

    /// Note de 0 à 5
    pub rating: f64,

    /// Remise affichée en % (optionnelle, calculée sinon)
    pub discount: Option<u32>,

    /// Disponibilité (ex: "In Stock")
    pub availability: String,

    /// Meilleure offre de sa catégorie
    #[serde(default)]
    pub best_deal: bool,
}

impl Offer {
    /// Crée une offre sans remise ni prix barré
    pub fn new(name: &str, price: f64, store: &str, rating: f64, availability: &str) -> Self {
        Self {
            name: name.to_string(),
            price,
            original_price: None,
            store: store.to_string(),
            rating,
            discount: None,
            availability: availability.to_string(),
            best_deal: false,
        }
    }

    /// Ajoute un prix barré
    ///
    /// CONCEPT RUST : Builder pattern par valeur
    /// - Prend self (ownership) et le retourne modifié
    /// - Permet de chaîner : Offer::new(..).with_original_price(..).best_deal()
    pub fn with_original_price(mut self, original_price: f64) -> Self {
        self.original_price = Some(original_price);
        self
    }

    /// Fixe la remise affichée
    pub fn with_discount(mut self, discount: u32) -> Self {
        self.discount = Some(discount);
        self
    }

    /// Marque l'offre comme meilleure offre
    pub fn best_deal(mut self) -> Self {
        self.best_deal = true;
        self
    }

    /// Remise en pourcentage
    ///
    /// - La remise stockée si elle existe et n'est pas nulle
    /// - Sinon calculée à partir du prix barré, arrondie
    /// - 0 si aucune information
    pub fn discount_percent(&self) -> u32 {
        if let Some(discount) = self.discount.filter(|d| *d > 0) {
            return discount;
        }

        match self.original_price {
            Some(original) if original > 0.0 => {
                let computed = ((original - self.price) / original * 100.0).round();
                if computed > 0.0 {
                    computed as u32
                } else {
                    0
                }
            }
            _ => 0,
        }
    }

    /// Étoiles de notation : une par point entier
    pub fn stars(&self) -> String {
        let count = self.rating.clamp(0.0, 5.0).floor() as usize;
        "⭐".repeat(count)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_discount_wins() {
        let offer = Offer::new("Sony WH-1000XM5", 379.0, "Flipkart", 4.7, "In Stock")
            .with_original_price(449.0)
            .with_discount(16);
        assert_eq!(offer.discount_percent(), 16);
    }

    #[test]
    fn test_discount_computed_from_original_price() {
        let offer = Offer::new("AirPods Pro (2nd Gen)", 249.0, "Amazon", 4.8, "In Stock")
            .with_original_price(279.0);
        // (279 - 249) / 279 = 10.75% -> 11
        assert_eq!(offer.discount_percent(), 11);
    }

    #[test]
    fn test_no_discount_information() {
        let offer = Offer::new("Widget", 10.0, "Shop", 3.0, "In Stock");
        assert_eq!(offer.discount_percent(), 0);
    }

    #[test]
    fn test_stars() {
        let offer = Offer::new("Widget", 10.0, "Shop", 4.7, "In Stock");
        assert_eq!(offer.stars(), "⭐⭐⭐⭐");
    }
}

// ============================================================================
// Catalogue produits et recherche
// ============================================================================
// Catalogue fixe de catégories (clé -> liste d'offres) et recherche par
// sous-chaîne.
//
// CONCEPTS RUST :
// 1. Vec<(String, Vec<Offer>)> : ordre d'itération garanti (contrairement
//    à HashMap), la recherche dépend de cet ordre (first-match-wins)
// 2. Slices &[Offer] : la recherche retourne une vue sans copie
// ============================================================================

use tracing::debug;

use crate::models::Offer;

/// Catégorie utilisée quand aucune clé ne correspond
pub const DEFAULT_CATEGORY: &str = "iphone 15";

/// Recherches rapides, dans l'ordre des touches 1 à 4
pub const QUICK_SEARCHES: [&str; 4] = ["iphone 15", "airpods", "macbook", "headphones"];

/// Normalise une requête : trim + minuscules
///
/// Retourne None si la requête est vide, l'appelant ne doit alors pas
/// lancer de recherche.
pub fn normalize_query(raw: &str) -> Option<String> {
    let query = raw.trim().to_lowercase();
    if query.is_empty() {
        None
    } else {
        Some(query)
    }
}

/// Retourne la recherche rapide associée à une touche (1-based)
pub fn quick_search(slot: usize) -> Option<&'static str> {
    slot.checked_sub(1).and_then(|i| QUICK_SEARCHES.get(i).copied())
}

/// Économie maximale possible : prix max - prix min
///
/// Retourne 0.0 pour une liste vide.
pub fn savings(offers: &[Offer]) -> f64 {
    let prices = offers.iter().map(|o| o.price);
    let max = prices.clone().fold(f64::NEG_INFINITY, f64::max);
    let min = prices.fold(f64::INFINITY, f64::min);

    if offers.is_empty() {
        0.0
    } else {
        max - min
    }
}

/// Catalogue de catégories d'offres
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<(String, Vec<Offer>)>,
}

impl Catalog {
    /// Crée un catalogue à partir de catégories ordonnées
    pub fn new(categories: Vec<(String, Vec<Offer>)>) -> Self {
        Self { categories }
    }

    /// Catalogue d'exemple
    pub fn sample() -> Self {
        let iphone = "iPhone 15 Pro Max 256GB";
        let airpods = "AirPods Pro (2nd Gen)";
        let macbook = "MacBook Pro 14\" M3";
        let sony = "Sony WH-1000XM5";

        Self::new(vec![
            (
                "iphone 15".to_string(),
                vec![
                    Offer::new(iphone, 1199.0, "Amazon", 4.6, "In Stock")
                        .with_original_price(1299.0)
                        .with_discount(8),
                    Offer::new(iphone, 1149.0, "Flipkart", 4.7, "Limited Stock")
                        .with_original_price(1299.0)
                        .with_discount(12)
                        .best_deal(),
                    Offer::new(iphone, 1189.0, "BestBuy", 4.5, "In Stock")
                        .with_original_price(1299.0)
                        .with_discount(9),
                ],
            ),
            (
                "airpods".to_string(),
                vec![
                    Offer::new(airpods, 249.0, "Amazon", 4.8, "In Stock")
                        .with_original_price(279.0)
                        .with_discount(11),
                    Offer::new(airpods, 239.0, "Flipkart", 4.7, "In Stock")
                        .with_original_price(279.0)
                        .with_discount(14)
                        .best_deal(),
                ],
            ),
            (
                "macbook".to_string(),
                vec![
                    Offer::new(macbook, 1999.0, "Amazon", 4.9, "In Stock")
                        .with_original_price(2199.0)
                        .with_discount(9)
                        .best_deal(),
                    Offer::new(macbook, 2049.0, "Flipkart", 4.8, "In Stock")
                        .with_original_price(2199.0)
                        .with_discount(7),
                ],
            ),
            (
                "headphones".to_string(),
                vec![
                    Offer::new(sony, 399.0, "Amazon", 4.8, "In Stock")
                        .with_original_price(449.0)
                        .with_discount(11),
                    Offer::new(sony, 379.0, "Flipkart", 4.7, "In Stock")
                        .with_original_price(449.0)
                        .with_discount(16)
                        .best_deal(),
                ],
            ),
        ])
    }

    /// Clés des catégories, dans l'ordre de recherche
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(key, _)| key.as_str())
    }

    /// Offres d'une catégorie
    pub fn category(&self, key: &str) -> Option<&[Offer]> {
        self.categories
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, offers)| offers.as_slice())
    }

    /// Recherche les offres correspondant à une requête normalisée
    ///
    /// Première catégorie dont la clé est contenue dans la requête ou qui
    /// contient la requête. Sinon, la catégorie par défaut (puis la première
    /// catégorie si la catégorie par défaut n'existe pas).
    ///
    /// CONCEPT RUST : Iterator::find + Option::or_else
    /// - find() s'arrête au premier match (first-match-wins)
    /// - or_else() fournit le fallback paresseusement
    pub fn search(&self, query: &str) -> &[Offer] {
        let matched = self
            .categories
            .iter()
            .find(|(key, _)| query.contains(key.as_str()) || key.contains(query));

        match matched {
            Some((key, offers)) => {
                debug!(query = %query, category = %key, "Search matched category");
                offers
            }
            None => {
                debug!(query = %query, fallback = DEFAULT_CATEGORY, "No category matched, using default");
                self.category(DEFAULT_CATEGORY)
                    .or_else(|| self.categories.first().map(|(_, offers)| offers.as_slice()))
                    .unwrap_or(&[])
            }
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::sample()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_both_directions() {
        let catalog = Catalog::sample();

        // La requête contient la clé
        let offers = catalog.search("iphone 15");
        assert_eq!(offers[0].name, "iPhone 15 Pro Max 256GB");

        // La clé contient la requête
        let offers = catalog.search("15");
        assert_eq!(offers[0].name, "iPhone 15 Pro Max 256GB");

        let offers = catalog.search("apple airpods pro");
        assert_eq!(offers[0].name, "AirPods Pro (2nd Gen)");

        let offers = catalog.search("mac");
        assert_eq!(offers[0].name, "MacBook Pro 14\" M3");
    }

    #[test]
    fn test_search_never_empty() {
        let catalog = Catalog::sample();
        for query in ["xyz", "television", "sony", "phone", "a", "headphones sony"] {
            assert!(!catalog.search(query).is_empty(), "query {query:?}");
        }

        // Aucun match : catégorie par défaut
        assert_eq!(catalog.search("television"), catalog.category(DEFAULT_CATEGORY).unwrap());
    }

    #[test]
    fn test_search_first_match_wins() {
        let catalog = Catalog::sample();
        // "phone" est contenu dans "iphone 15" et dans "headphones" :
        // iphone 15 vient en premier
        assert_eq!(catalog.search("phone")[0].store, "Amazon");
        assert_eq!(catalog.search("phone").len(), 3);
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  iPhone 15 "), Some("iphone 15".to_string()));
        assert_eq!(normalize_query("   "), None);
        assert_eq!(normalize_query(""), None);
    }

    #[test]
    fn test_quick_search_slots() {
        assert_eq!(quick_search(1), Some("iphone 15"));
        assert_eq!(quick_search(4), Some("headphones"));
        assert_eq!(quick_search(0), None);
        assert_eq!(quick_search(5), None);
    }

    #[test]
    fn test_savings() {
        let catalog = Catalog::sample();
        let iphones = catalog.category("iphone 15").unwrap();
        assert!((savings(iphones) - 50.0).abs() < f64::EPSILON);
        assert_eq!(savings(&[]), 0.0);
    }

    #[test]
    fn test_at_most_one_best_deal_per_category() {
        let catalog = Catalog::sample();
        for key in catalog.keys() {
            let offers = catalog.category(key).unwrap();
            let best = offers.iter().filter(|o| o.best_deal).count();
            assert!(best <= 1, "category {key} has {best} best deals");

            // La meilleure offre est la moins chère
            if let Some(best_offer) = offers.iter().find(|o| o.best_deal) {
                assert!(offers.iter().all(|o| o.price >= best_offer.price));
            }
        }
    }
}

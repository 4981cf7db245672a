// ============================================================================
// Formatage des montants et durées
// ============================================================================
// Fonctions pures utilisées par les view-models : prix compacts du ticker,
// montants USD, montants crypto, compte à rebours.
// ============================================================================

/// Groupe les milliers d'un entier : 43250 -> "43,250"
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}

/// Prix compact pour le ticker et les options de paiement
///
/// - prix >= 1000 : arrondi à l'unité, milliers groupés ("43,250")
/// - sinon : au plus 2 décimales, zéros de fin retirés ("72.5", "1")
pub fn format_compact_price(price: f64) -> String {
    let price = price.max(0.0);

    if price >= 1000.0 {
        return group_thousands(price.round() as u64);
    }

    let fixed = format!("{:.2}", price);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');

    // L'arrondi peut franchir 1000 (999.999 -> "1000")
    match trimmed.split_once('.') {
        Some((int_part, frac)) => {
            let int_value: u64 = int_part.parse().unwrap_or(0);
            format!("{}.{}", group_thousands(int_value), frac)
        }
        None => group_thousands(trimmed.parse().unwrap_or(0)),
    }
}

/// Montant USD avec 2 décimales : "$1149.00"
pub fn format_usd(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Montant crypto avec 8 décimales
pub fn format_crypto_amount(amount: f64) -> String {
    format!("{:.8}", amount)
}

/// Variation absolue avec 2 décimales : "2.40%"
pub fn format_change(change_percent: f64) -> String {
    format!("{:.2}%", change_percent.abs())
}

/// Compte à rebours m:ss
pub fn format_countdown(remaining_secs: u32) -> String {
    format!("{}:{:02}", remaining_secs / 60, remaining_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_price() {
        assert_eq!(format_compact_price(43250.0), "43,250");
        assert_eq!(format_compact_price(43249.6), "43,250");
        assert_eq!(format_compact_price(2280.0), "2,280");
        assert_eq!(format_compact_price(1234567.0), "1,234,567");
        assert_eq!(format_compact_price(72.5), "72.5");
        assert_eq!(format_compact_price(1.0), "1");
        assert_eq!(format_compact_price(0.456), "0.46");
        assert_eq!(format_compact_price(999.999), "1,000");
    }

    #[test]
    fn test_usd_and_crypto() {
        assert_eq!(format_usd(1149.0), "$1149.00");
        assert_eq!(format_crypto_amount(249.0 / 43250.0), "0.00575723");
        assert_eq!(format_change(-1.234), "1.23%");
    }

    #[test]
    fn test_countdown() {
        assert_eq!(format_countdown(900), "15:00");
        assert_eq!(format_countdown(899), "14:59");
        assert_eq!(format_countdown(65), "1:05");
        assert_eq!(format_countdown(0), "0:00");
    }
}

//! Service menu (施術メニュー)
//!
//! Fixed price list used to price the sales record created with a booking.

/// Service name and price in yen
pub const SERVICE_MENU: &[(&str, i64)] = &[
    ("ジェルネイル", 8000),
    ("ネイルケア", 5000),
    ("ネイルアート", 10000),
    ("ハンドケア", 3000),
];

/// Price of a service; unknown services are priced at 0 and fixed up at checkout
pub fn service_price(service_type: &str) -> i64 {
    SERVICE_MENU
        .iter()
        .find(|(name, _)| *name == service_type.trim())
        .map(|(_, price)| *price)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_services() {
        assert_eq!(service_price("ジェルネイル"), 8000);
        assert_eq!(service_price(" ハンドケア "), 3000);
        assert_eq!(service_price("ヘッドスパ"), 0);
    }
}

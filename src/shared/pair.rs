//! Trading-pair syntax.
//!
//! A pair is `BASE-QUOTE` (spot, e.g. `ETH-USDT`) or `BASE:VARIANT-QUOTE`
//! (e.g. the perpetual future `ETH:PERP-USDT`).

use regex::Regex;

lazy_static::lazy_static! {
    /// Anchored pattern for `BASE[:VARIANT]-QUOTE`.
    static ref PAIR_RE: Regex = Regex::new(r"^([A-Za-z0-9]+)(?::(\w+))?-([A-Za-z0-9]+)$").unwrap();
}

/// Human-readable description of the accepted forms, used in validation messages.
pub const PAIR_FORMAT_HINT: &str =
    "{BASE}-{QUOTE} or {BASE}:{VARIANT}-{QUOTE} ex. ETH-USDT or ETH:PERP-USDT";

/// Components of a parsed pair, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairParts<'a> {
    pub base: &'a str,
    pub variant: Option<&'a str>,
    pub quote: &'a str,
}

/// Split a pair into base, optional variant and quote.
///
/// Returns `None` when the string does not match either accepted form.
pub fn parse_pair(pair: &str) -> Option<PairParts<'_>> {
    let caps = PAIR_RE.captures(pair)?;
    Some(PairParts {
        base: caps.get(1)?.as_str(),
        variant: caps.get(2).map(|m| m.as_str()),
        quote: caps.get(3)?.as_str(),
    })
}

/// Check pair syntax without extracting components.
pub fn is_valid_pair(pair: &str) -> bool {
    PAIR_RE.is_match(pair)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_spot_and_variant() {
        assert!(is_valid_pair("ETH-USDT"));
        assert!(is_valid_pair("ETH:PERP-USDT"));
        assert!(is_valid_pair("1000PEPE-USDT"));
        assert!(is_valid_pair("BTC:PERP_USD-USD"));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(!is_valid_pair("ETHUSDT"));
        assert!(!is_valid_pair(""));
        assert!(!is_valid_pair("ETH-"));
        assert!(!is_valid_pair("-USDT"));
        assert!(!is_valid_pair("ETH:-USDT"));
        assert!(!is_valid_pair("ETH-USDT-PERP"));
        assert!(!is_valid_pair(" ETH-USDT"));
    }

    #[test]
    fn test_parse_components() {
        let parts = parse_pair("ETH:PERP-USDT").unwrap();
        assert_eq!(parts.base, "ETH");
        assert_eq!(parts.variant, Some("PERP"));
        assert_eq!(parts.quote, "USDT");

        let parts = parse_pair("BTC-USD").unwrap();
        assert_eq!(parts.variant, None);

        assert!(parse_pair("BTCUSD").is_none());
    }
}

//! Product Status Value Object
//!
//! Listing lifecycle state. Any status is reachable from any other; the
//! only gate on transitions is that the caller owns the listing. The
//! legacy alias `SOLD` is normalized to `SOLD_OUT` at parse time, before
//! validation or persistence, so stored state never contains the alias.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum ProductStatus {
    /// Listed and available - the initial status of every listing
    #[default]
    ForSale = 0,
    /// Reserved for a buyer
    Reserved = 1,
    /// Sold
    SoldOut = 2,
}

impl ProductStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    /// Wire vocabulary
    #[inline]
    pub const fn code(&self) -> &'static str {
        use ProductStatus::*;
        match self {
            ForSale => "FOR_SALE",
            Reserved => "RESERVED",
            SoldOut => "SOLD_OUT",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        use ProductStatus::*;
        match id {
            0 => Some(ForSale),
            1 => Some(Reserved),
            2 => Some(SoldOut),
            _ => None,
        }
    }

    /// Parse the wire vocabulary, normalizing the `SOLD` alias
    #[inline]
    pub fn parse(s: &str) -> Option<Self> {
        use ProductStatus::*;
        match s.trim() {
            "FOR_SALE" => Some(ForSale),
            "RESERVED" => Some(Reserved),
            // Backward-compatibility shim for older clients
            "SOLD_OUT" | "SOLD" => Some(SoldOut),
            _ => None,
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vocabulary() {
        assert_eq!(ProductStatus::parse("FOR_SALE"), Some(ProductStatus::ForSale));
        assert_eq!(ProductStatus::parse("RESERVED"), Some(ProductStatus::Reserved));
        assert_eq!(ProductStatus::parse("SOLD_OUT"), Some(ProductStatus::SoldOut));
    }

    #[test]
    fn test_sold_alias_normalized() {
        let status = ProductStatus::parse("SOLD").unwrap();
        assert_eq!(status, ProductStatus::SoldOut);
        assert_eq!(status.code(), "SOLD_OUT");
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(ProductStatus::parse("DELETED"), None);
        assert_eq!(ProductStatus::parse("for_sale"), None);
        assert_eq!(ProductStatus::parse(""), None);
    }

    #[test]
    fn test_default_is_for_sale() {
        assert_eq!(ProductStatus::default(), ProductStatus::ForSale);
    }

    #[test]
    fn test_id_roundtrip() {
        for status in [
            ProductStatus::ForSale,
            ProductStatus::Reserved,
            ProductStatus::SoldOut,
        ] {
            assert_eq!(ProductStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(ProductStatus::from_id(3), None);
    }
}

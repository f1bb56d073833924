//! Category Value Object
//!
//! Listings belong to one of a fixed display vocabulary of categories.
//! Clients submit the display label; storage uses the numeric id.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i16)]
pub enum Category {
    Electronics = 0,
    Books = 1,
    Furniture = 2,
    DormEssentials = 3,
    Clothing = 4,
}

impl Category {
    /// All categories, in display order
    pub const ALL: [Category; 5] = [
        Category::Electronics,
        Category::Books,
        Category::Furniture,
        Category::DormEssentials,
        Category::Clothing,
    ];

    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    /// Stable code for serialization/API
    #[inline]
    pub const fn code(&self) -> &'static str {
        use Category::*;
        match self {
            Electronics => "electronics",
            Books => "books",
            Furniture => "furniture",
            DormEssentials => "dorm_essentials",
            Clothing => "clothing",
        }
    }

    /// The label the client-facing vocabulary uses
    #[inline]
    pub const fn display_name(&self) -> &'static str {
        use Category::*;
        match self {
            Electronics => "Electronics",
            Books => "Books",
            Furniture => "Furniture",
            DormEssentials => "Dorm Essentials",
            Clothing => "Clothing",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        use Category::*;
        match id {
            0 => Some(Electronics),
            1 => Some(Books),
            2 => Some(Furniture),
            3 => Some(DormEssentials),
            4 => Some(Clothing),
            _ => None,
        }
    }

    /// Parse either the display label or the stable code
    #[inline]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.display_name() == s || c.code() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_names() {
        assert_eq!(Category::parse("Electronics"), Some(Category::Electronics));
        assert_eq!(Category::parse("Books"), Some(Category::Books));
        assert_eq!(Category::parse("Furniture"), Some(Category::Furniture));
        assert_eq!(
            Category::parse("Dorm Essentials"),
            Some(Category::DormEssentials)
        );
        assert_eq!(Category::parse("Clothing"), Some(Category::Clothing));
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!(
            Category::parse("dorm_essentials"),
            Some(Category::DormEssentials)
        );
        assert_eq!(Category::parse("electronics"), Some(Category::Electronics));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Category::parse("Vehicles"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn test_id_roundtrip() {
        for category in Category::ALL {
            assert_eq!(Category::from_id(category.id()), Some(category));
        }
        assert_eq!(Category::from_id(99), None);
    }
}

//! Label vocabularies for segmentation and zero-shot classification
//!
//! The segmentation tables follow the 18-label ATR convention used by
//! clothing segmentation models: label 0 is background, body parts (skin,
//! hair, face, limbs) are excluded from the garment subset, and left/right
//! shoe labels fold into a single canonical `Shoes` item.

/// All semantic labels the segmentation capability may emit, by pixel ID
pub const SEGMENTATION_LABELS: &[(u32, &str)] = &[
    (0, "Background"),
    (1, "Hat"),
    (2, "Hair"),
    (3, "Sunglasses"),
    (4, "Upper-clothes"),
    (5, "Skirt"),
    (6, "Pants"),
    (7, "Dress"),
    (8, "Belt"),
    (9, "Left-shoe"),
    (10, "Right-shoe"),
    (11, "Face"),
    (12, "Left-leg"),
    (13, "Right-leg"),
    (14, "Left-arm"),
    (15, "Right-arm"),
    (16, "Bag"),
    (17, "Scarf"),
];

/// Labels that are actual garments or accessories, in detection order.
/// Background and body-part labels are excluded.
pub const GARMENT_LABELS: &[(u32, &str)] = &[
    (1, "Hat"),
    (3, "Sunglasses"),
    (4, "Upper-clothes"),
    (5, "Skirt"),
    (6, "Pants"),
    (7, "Dress"),
    (8, "Belt"),
    (9, "Left-shoe"),
    (10, "Right-shoe"),
    (16, "Bag"),
    (17, "Scarf"),
];

/// Raw-to-canonical relabeling table. Any number of raw labels may fold into
/// one canonical name; their masks are unioned before cropping.
pub const CANONICAL_RELABELING: &[(&str, &str)] =
    &[("Left-shoe", "Shoes"), ("Right-shoe", "Shoes")];

/// Resolve a raw segmentation label to its canonical garment name
#[must_use]
pub fn canonical_label(raw: &str) -> &str {
    CANONICAL_RELABELING
        .iter()
        .find(|(from, _)| *from == raw)
        .map_or(raw, |(_, to)| *to)
}

/// Look up the display name of a segmentation label ID
#[must_use]
pub fn segmentation_label_name(id: u32) -> Option<&'static str> {
    SEGMENTATION_LABELS
        .iter()
        .find(|(label_id, _)| *label_id == id)
        .map(|(_, name)| *name)
}

const CATEGORIES: &[&str] = &[
    "T-Shirt", "Shirt", "Blouse", "Tank Top", "Crop Top",
    "Sweater", "Hoodie", "Cardigan",
    "Jacket", "Coat", "Blazer", "Vest",
    "Jeans", "Trousers", "Shorts", "Skirt", "Leggings", "Joggers",
    "Dress", "Jumpsuit", "Romper",
    "Sneakers", "Boots", "Sandals", "Heels", "Loafers", "Flats",
    "Bag", "Backpack", "Clutch", "Tote",
    "Hat", "Cap", "Beanie",
    "Scarf", "Belt", "Watch", "Sunglasses", "Jewelry", "Tie",
];

const STYLES: &[&str] = &[
    "casual", "formal", "streetwear", "bohemian", "minimalist",
    "sporty", "vintage", "elegant", "preppy", "grunge",
    "smart casual", "athleisure", "romantic", "edgy", "classic",
];

const COLORS: &[&str] = &[
    "black", "white", "cream", "grey", "charcoal",
    "red", "burgundy", "maroon", "pink", "coral",
    "blue", "navy", "light blue", "royal blue", "teal",
    "green", "olive", "sage", "mint", "emerald",
    "yellow", "mustard", "gold",
    "orange", "rust", "terracotta",
    "purple", "lavender", "plum",
    "brown", "tan", "beige", "camel", "khaki",
    "multicolor",
];

const PATTERNS: &[&str] = &[
    "solid", "striped", "floral", "plaid", "checkered",
    "polka dot", "geometric", "animal print", "abstract",
    "tie-dye", "camouflage", "paisley", "herringbone",
    "color block", "graphic print",
];

const MATERIALS: &[&str] = &[
    "cotton", "denim", "leather", "faux leather", "silk", "satin",
    "wool", "cashmere", "polyester", "nylon", "linen",
    "suede", "velvet", "lace", "chiffon", "tweed",
    "fleece", "knit", "mesh", "canvas", "corduroy",
];

const SEASONS: &[&str] = &["spring", "summer", "autumn", "winter", "all-season"];

/// Closed candidate vocabularies for the six classification axes
///
/// Each query is mutually exclusive over its bank; the capability returns a
/// probability per candidate summing to 1. Banks are replaceable for callers
/// with a different taxonomy.
#[derive(Debug, Clone)]
pub struct AttributeBanks {
    /// Garment category candidates
    pub categories: Vec<String>,

    /// Style candidates
    pub styles: Vec<String>,

    /// Color candidates
    pub colors: Vec<String>,

    /// Pattern candidates
    pub patterns: Vec<String>,

    /// Material candidates
    pub materials: Vec<String>,

    /// Season candidates
    pub seasons: Vec<String>,
}

impl Default for AttributeBanks {
    fn default() -> Self {
        let to_owned = |bank: &[&str]| bank.iter().map(|s| (*s).to_string()).collect();
        Self {
            categories: to_owned(CATEGORIES),
            styles: to_owned(STYLES),
            colors: to_owned(COLORS),
            patterns: to_owned(PATTERNS),
            materials: to_owned(MATERIALS),
            seasons: to_owned(SEASONS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_relabeling() {
        assert_eq!(canonical_label("Left-shoe"), "Shoes");
        assert_eq!(canonical_label("Right-shoe"), "Shoes");
        assert_eq!(canonical_label("Pants"), "Pants");
    }

    #[test]
    fn test_garment_subset_excludes_body_parts() {
        for &(id, _) in GARMENT_LABELS {
            assert!(segmentation_label_name(id).is_some());
        }
        let garment_ids: Vec<u32> = GARMENT_LABELS.iter().map(|(id, _)| *id).collect();
        // Background, hair, face and limbs must not be detectable garments.
        for excluded in [0, 2, 11, 12, 13, 14, 15] {
            assert!(!garment_ids.contains(&excluded));
        }
    }

    #[test]
    fn test_default_bank_sizes() {
        let banks = AttributeBanks::default();
        assert_eq!(banks.categories.len(), 40);
        assert_eq!(banks.styles.len(), 15);
        assert_eq!(banks.colors.len(), 35);
        assert_eq!(banks.patterns.len(), 15);
        assert_eq!(banks.materials.len(), 21);
        assert_eq!(banks.seasons.len(), 5);
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

/// Icon shown for a category whose slug has no dedicated entry
pub const DEFAULT_CATEGORY_ICON: &str = "category";

/// Material icon names for the well-known category slugs of the site
pub const CATEGORY_ICONS: &[(&str, &str)] = &[
    ("gioi-thieu", "info"),
    ("du-an-thiet-ke", "architecture"),
    ("cong-trinh-thuc-te", "business"),
    ("dich-vu", "handyman"),
    ("tin-tuc", "newspaper"),
    ("tuyen-dung", "work"),
    ("lien-he", "contact_page"),
    ("biet-thu-hien-dai", "home"),
    ("nha-pho-hien-dai", "apartment"),
    ("van-phong", "business_center"),
    ("biet-thu", "villa"),
    ("nha-pho", "home_work"),
    ("thiet-ke", "draw"),
    ("thi-cong", "construction"),
    ("tu-van", "support_agent"),
];

/// Icon name for a category slug
pub fn category_icon(slug: &str) -> &'static str {
    CATEGORY_ICONS
        .iter()
        .find(|(known, _)| *known == slug)
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_CATEGORY_ICON)
}

// =============================================================================
// SITEMAP
// =============================================================================

pub const SITEMAP_HOME_PRIORITY: &str = "1.0";
pub const SITEMAP_CATEGORY_PRIORITY: &str = "0.8";
pub const SITEMAP_CHANGEFREQ: &str = "weekly";

// =============================================================================
// CATEGORY FIELDS
// =============================================================================

/// Wire value of the leaf-only category type
pub const CATEGORY_TYPE_LEAF: &str = "regular";

/// Wire value of the parent-capable category type
pub const CATEGORY_TYPE_PARENT: &str = "parent";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_icon_lookup() {
        assert_eq!(category_icon("tin-tuc"), "newspaper");
        assert_eq!(category_icon("biet-thu"), "villa");
        assert_eq!(category_icon("khong-ton-tai"), DEFAULT_CATEGORY_ICON);
    }
}

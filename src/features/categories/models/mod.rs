mod category;

pub use category::{Category, CategoryKind, CategoryType, SeoMeta};

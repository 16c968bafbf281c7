mod category;

pub use category::{Category, CategorySeo, VisualType};

pub mod category_dto;

pub use category_dto::{
    CategoryListing, CategoryResponseDto, CategorySort, CategoryTreeDto, CreateCategoryDto,
    ListCategoriesQuery, SortDirection, UpdateCategoryDto,
};

//! DTOs for books_sea adapter.

#[derive(Debug, Clone)]
pub struct BookCreate {
    pub title: String,
    pub caption: String,
    pub image: String,
    pub rating: i16,
    pub user_id: i64,
}

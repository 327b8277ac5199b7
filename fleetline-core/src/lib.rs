pub mod search;
pub mod favorites;
pub mod repository;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Favorites store error: {0}")]
    StoreError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

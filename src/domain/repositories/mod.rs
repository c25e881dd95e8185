// Repository ports implemented by the infrastructure layer

pub mod analysis_repository;

pub use analysis_repository::{AnalysisRepository, RepositoryError, DEFAULT_PAGE_SIZE};

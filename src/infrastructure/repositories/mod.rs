// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory_analysis_repository;
pub mod postgres_analysis_repository;

pub use in_memory_analysis_repository::InMemoryAnalysisRepository;
pub use postgres_analysis_repository::PostgresAnalysisRepository;

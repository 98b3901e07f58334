pub mod country_repository;
pub mod exchange_rate_history_repository;
pub mod reference_country_repository;

// Re-export all repositories for convenient access
pub use country_repository::{CountryRepository, NewCountry};
pub use exchange_rate_history_repository::ExchangeRateHistoryRepository;
pub use reference_country_repository::ReferenceCountryRepository;

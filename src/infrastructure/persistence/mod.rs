//! Repository implementations.

pub mod postgres;

pub use postgres::PgScanRepository;

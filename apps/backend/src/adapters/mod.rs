//! SeaORM adapters. Functions here return `DbErr`; the repos layer maps it
//! to `DomainError`.

pub mod books_sea;
pub mod users_sea;

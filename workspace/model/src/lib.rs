//! SeaORM entities for accounts, sessions, items and the university registry.

pub mod entities;

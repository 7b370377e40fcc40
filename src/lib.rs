//! Terminal map of Spain's provinces showing who lives where.
//!
//! Archipelago provinces are split per island, every province is measured
//! for label and marker placement, and users are drawn as markers in a ring
//! around their province.

pub mod braille;
pub mod config;
pub mod data;
pub mod error;
pub mod map;
pub mod region;

//! Pure city-economy logic for Ecopolis.
//!
//! This crate contains the formulas and static catalogs behind the city
//! simulation. Functions take plain data and return results, so every
//! rule can be unit-tested without an engine, a clock or a random source.
//! The stateful engine lives in `ecopolis-core`.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`buildings`] | Building types, names, level multiplier, upgrade cost |
//! | [`calendar`] | Week numbering, weekday labels, tax countdown |
//! | [`config`] | Session tunables, starting conditions and validation |
//! | [`economy`] | Capacities, energy, tax, migration, effects, growth |
//! | [`events`] | Event template catalog and requirement matching |
//! | [`missions`] | The seven mission goals and their progress text |
//! | [`scoring`] | End-of-term score, rating tiers, employment rate |

pub mod buildings;
pub mod calendar;
pub mod config;
pub mod economy;
pub mod events;
pub mod missions;
pub mod scoring;

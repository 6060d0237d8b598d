// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod affirmations;
pub mod aggregator;
pub mod assistant;
pub mod oidc;

pub use aggregator::ActivityAggregator;
pub use assistant::ZenAssistant;
pub use oidc::{IdClaims, OidcClient};

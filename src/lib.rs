// SPDX-License-Identifier: MIT

//! ZenGym: workout tracking with streak stats and an AI fitness assistant.
//!
//! This crate provides the backend API for logging workout sessions,
//! managing routines, computing activity stats, and answering fitness
//! questions through a quota-gated AI assistant.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use services::{ActivityAggregator, OidcClient, ZenAssistant};
use storage::Storage;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub aggregator: ActivityAggregator,
    pub assistant: ZenAssistant,
    pub oidc: OidcClient,
}

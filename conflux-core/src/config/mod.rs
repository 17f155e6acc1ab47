//! Engine configuration.

mod reconcile_config;
mod strategy;

pub use reconcile_config::ReconcileConfig;
pub use strategy::StrategyKind;

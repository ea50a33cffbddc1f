//! Configuration validation
//!
//! Rules:
//! - server.host non-empty
//! - policy.ratio_threshold >= 1
//! - policy.actor_capacity >= 1
//! - observability.metrics_port differs from server.port
//! - observability.default_log_level non-empty

use contracts::{ContractError, SchedulerBlueprint};

/// Validate a SchedulerBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &SchedulerBlueprint) -> Result<(), ContractError> {
    validate_server(blueprint)?;
    validate_policy(blueprint)?;
    validate_observability(blueprint)?;
    Ok(())
}

fn validate_server(blueprint: &SchedulerBlueprint) -> Result<(), ContractError> {
    if blueprint.server.host.trim().is_empty() {
        return Err(ContractError::config_validation(
            "server.host",
            "host cannot be empty",
        ));
    }
    Ok(())
}

fn validate_policy(blueprint: &SchedulerBlueprint) -> Result<(), ContractError> {
    let policy = &blueprint.policy;

    // 0 would never serve HIGH while NORMAL waits, inverting the priorities
    if policy.ratio_threshold == 0 {
        return Err(ContractError::config_validation(
            "policy.ratio_threshold",
            "ratio_threshold must be >= 1, got 0",
        ));
    }

    if policy.actor_capacity == 0 {
        return Err(ContractError::config_validation(
            "policy.actor_capacity",
            "actor_capacity must be >= 1, got 0",
        ));
    }

    Ok(())
}

fn validate_observability(blueprint: &SchedulerBlueprint) -> Result<(), ContractError> {
    let obs = &blueprint.observability;

    if obs.metrics_port == Some(blueprint.server.port) {
        return Err(ContractError::config_validation(
            "observability.metrics_port",
            format!(
                "metrics_port ({}) must differ from server.port",
                blueprint.server.port
            ),
        ));
    }

    if obs.default_log_level.trim().is_empty() {
        return Err(ContractError::config_validation(
            "observability.default_log_level",
            "default_log_level cannot be empty",
        ));
    }

    Ok(())
}

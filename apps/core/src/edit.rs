//! User edits applied to an existing result.

use serde_json::Value;
use tracing::debug;

use crate::catalog::ModuleId;
use crate::error::AppError;
use crate::models::AnalysisResult;
use crate::payloads::{ModuleData, PlYear};

/// Replaces the project title.
pub fn set_refined_goal(result: &mut AnalysisResult, goal: &str) -> Result<(), AppError> {
    let goal = goal.trim();
    if goal.is_empty() {
        return Err(AppError::Validation("refined goal must not be empty".to_string()));
    }
    result.refined_goal = goal.to_string();
    Ok(())
}

/// Replaces one field or list entry of a module payload.
///
/// `pointer` is an RFC 6901 JSON pointer into the payload body using the
/// camelCase wire names, e.g. `/problems/1` or `/competitors/0/share`. The
/// edited body must still decode as the module's schema; otherwise the
/// result is left as it was.
pub fn edit_payload(
    result: &mut AnalysisResult,
    module: ModuleId,
    pointer: &str,
    value: Value,
) -> Result<(), AppError> {
    let current = result
        .module_data
        .get(&module)
        .ok_or_else(|| AppError::Validation(format!("{module} has no content to edit")))?;
    let kind = current.kind();

    let mut body = current.body_to_value()?;
    let slot = body
        .pointer_mut(pointer)
        .ok_or_else(|| AppError::Validation(format!("{pointer} does not exist in {module}")))?;
    if !same_shape(slot, &value) {
        return Err(AppError::Validation(format!(
            "{pointer} in {module} expects a {}",
            shape_name(slot)
        )));
    }
    *slot = value;

    let updated = ModuleData::body_from_value(kind, body)?;
    debug!(%module, pointer, "Edited module payload");
    result.module_data.insert(module, updated);
    Ok(())
}

fn same_shape(old: &Value, new: &Value) -> bool {
    matches!(
        (old, new),
        (Value::String(_), Value::String(_))
            | (Value::Number(_), Value::Number(_))
            | (Value::Bool(_), Value::Bool(_))
            | (Value::Array(_), Value::Array(_))
            | (Value::Object(_), Value::Object(_))
    )
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Re-projects a business-plan payload under revenue and cost multipliers
/// without modifying it.
pub fn what_if(
    result: &AnalysisResult,
    module: ModuleId,
    revenue_multiplier: f64,
    cost_multiplier: f64,
) -> Result<Vec<PlYear>, AppError> {
    for multiplier in [revenue_multiplier, cost_multiplier] {
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(AppError::Validation(format!(
                "multiplier must be a non-negative number, got {multiplier}"
            )));
        }
    }
    let plan = result
        .business_plan(module)
        .ok_or_else(|| AppError::Validation(format!("{module} has no P/L projection")))?;
    Ok(plan.what_if(revenue_multiplier, cost_multiplier))
}

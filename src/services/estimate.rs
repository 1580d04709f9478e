// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Estimation adapter: free-text activity to a sanitized emissions estimate.
//!
//! The result is advisory. Nothing here writes to the ledger.

use crate::error::{AdapterError, ValidationError};
use crate::models::EstimateResult;
use crate::services::CompletionClient;

/// System directive for estimation requests.
pub const ESTIMATE_DIRECTIVE: &str = r#"You are a carbon footprint estimator for a personal "carbon calorie" tracker.
The user will describe ONE activity in natural language (e.g. "Took an Uber 4km to campus" or "ate a beef burger").

You MUST return a single JSON object with this exact shape:

{
  "category": "transport" | "food" | "home" | "shopping" | "other",
  "carbon_grams": number,
  "carbon_calories": number,
  "assumptions": string,
  "explanation": string
}

Definitions:
- `carbon_grams` is your best estimate of the lifecycle CO2e emissions, in grams, for this single activity.
- `carbon_calories` is a user-facing scoring unit. For now, set it equal to carbon_grams (1 cc = 1 g CO2e).
- `assumptions` summarize any assumed distance, duration, or emission factors.
- `explanation` is a short, human-friendly explanation of how you got the estimate.

Be conservative and choose simple default assumptions if the user is vague.
If the activity is clearly low-impact (e.g. walking, biking), use a small positive number (e.g. 10-50 g) and explain why.
Never ask the user questions. Just estimate from what you have."#;

/// Estimates one activity through the completion service.
#[derive(Clone)]
pub struct EstimationAdapter {
    client: CompletionClient,
}

impl EstimationAdapter {
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    /// Estimate the footprint of `description`.
    ///
    /// Blank descriptions are rejected without calling the service.
    pub async fn estimate(&self, description: &str) -> Result<EstimateResult, AdapterError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription.into());
        }

        let payload = self
            .client
            .complete_json(ESTIMATE_DIRECTIVE, description)
            .await?;
        let estimate = EstimateResult::from_payload(payload)?;

        tracing::info!(
            category = %estimate.category,
            carbon_calories = estimate.carbon_calories,
            "Activity estimated"
        );
        Ok(estimate)
    }
}

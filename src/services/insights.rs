// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Insights adapter: a short narrative about one activity or one day.
//!
//! Output validation is deliberately loose. Fields the model gets wrong are
//! dropped rather than failing the whole request.

use crate::error::AdapterError;
use crate::models::{InsightsRequest, InsightsResult};
use crate::services::{aggregate, CompletionClient};
use serde_json::json;

/// System directive for insights requests.
pub const INSIGHTS_DIRECTIVE: &str = r#"You are a friendly sustainability coach for a personal "carbon calorie" tracker.
1 carbon calorie (cc) equals 1 gram of CO2e.

You will receive either ONE activity description, or a JSON object describing one day:
its date, the user's daily goal in cc, the day's total, and the logged entries.

Return a single JSON object with this shape:

{
  "headline": string,
  "summary": string,
  "top_insights": string[],
  "suggested_actions": string[]
}

Keep the headline under 80 characters. Give at most 3 insights and at most 3 actions.
Actions must be concrete and realistic for tomorrow. Be encouraging, never preachy.
Never ask the user questions."#;

/// Produces narrative insights through the completion service.
#[derive(Clone)]
pub struct InsightsAdapter {
    client: CompletionClient,
}

impl InsightsAdapter {
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    /// Analyze one activity or one day.
    ///
    /// Requests with nothing to analyze are rejected without calling the
    /// service.
    pub async fn analyze(&self, request: &InsightsRequest) -> Result<InsightsResult, AdapterError> {
        request.validate()?;

        let user_message = user_message(request);
        let payload = self
            .client
            .complete_json(INSIGHTS_DIRECTIVE, &user_message)
            .await?;
        let result = InsightsResult::from_payload(&payload);

        if result.is_empty() {
            tracing::warn!("Completion service returned no usable insight fields");
        }
        Ok(result)
    }
}

fn user_message(request: &InsightsRequest) -> String {
    match request {
        InsightsRequest::Single(single) => single.description.trim().to_string(),
        InsightsRequest::Day {
            date,
            goal,
            entries,
        } => {
            let total: f64 = entries.iter().map(|e| e.amount).sum();
            json!({
                "date": date,
                "goal_cc": goal,
                "total_cc": total,
                "remaining_cc": aggregate::remaining(*goal, total),
                "entries": entries,
            })
            .to_string()
        }
    }
}

use axum::extract::State;

use super::write_status;
use crate::envelope::ResultEnvelope;
use crate::error::OperationError;
use crate::fallback::Placeholder;
use crate::response::{self, EnvelopeResponse};
use crate::state::AppState;

/// GET /api/avatar/get-terms - Terms & conditions for creating an avatar
pub async fn get_terms(State(app_state): State<AppState>) -> EnvelopeResponse<String> {
    let policy = app_state
        .executor
        .policy("retrieving terms")
        .with_placeholder(Placeholder::new("Terms retrieved successfully", || {
            "Test Terms and Conditions".to_string()
        }));

    let terms = app_state.terms.clone();
    let envelope = app_state
        .executor
        .run(policy, || async move {
            Ok::<_, OperationError>(match terms {
                Some(terms) => {
                    ResultEnvelope::success(terms.to_string(), "Terms retrieved successfully")
                }
                None => ResultEnvelope::empty("No terms have been configured."),
            })
        })
        .await;

    let status = write_status(&envelope);
    response::map(envelope, status)
}

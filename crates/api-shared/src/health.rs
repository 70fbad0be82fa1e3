use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Liveness response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Simple health service shared by every front end.
///
/// The store is in memory, so being able to answer at all means the service is healthy.
#[derive(Clone, Debug, Default)]
pub struct HealthService;

impl HealthService {
    /// Check health without creating an instance.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Patientor is alive".into(),
        }
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Liveness response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Simple health service backing the `/health` endpoint.
///
/// The stub has no external dependencies, so being able to answer is the whole check.
#[derive(Clone, Copy, Debug, Default)]
pub struct HealthService;

impl HealthService {
    /// Static method to check health without creating an instance.
    ///
    /// `patients` is the number of seeded patients, echoed in the message.
    pub fn check_health(patients: usize) -> HealthRes {
        HealthRes {
            ok: true,
            message: format!("SMART-on-FHIR stub is alive ({patients} patients)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_alive_with_patient_count() {
        let res = HealthService::check_health(2);
        assert!(res.ok);
        assert!(res.message.contains("2 patients"));

        let json = serde_json::to_value(&res).expect("serialise");
        assert_eq!(json["ok"], true);
    }
}

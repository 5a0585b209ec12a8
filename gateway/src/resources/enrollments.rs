use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use session::model::UserProfile;

use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::resources::grades::GradeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Active,
    Dropped,
    Pending,
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Dropped => "dropped",
            EnrollmentStatus::Pending => "pending",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub id: i64,
    pub status: EnrollmentStatus,
    pub class_id: i64,
    #[serde(default)]
    pub student: Option<UserProfile>,
    /// Present only on endpoints that include grades.
    #[serde(default)]
    pub grades: Option<Vec<GradeRecord>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewEnrollment {
    pub student_id: i64,
    pub class_id: i64,
}

#[derive(Debug, Deserialize)]
struct EnrollmentEnvelope {
    enrollment: EnrollmentRecord,
}

#[derive(Debug, Deserialize)]
struct EnrollmentListEnvelope {
    enrollments: Vec<EnrollmentRecord>,
}

/// Enrollment management. Creating and re-statusing require admin or the
/// class teacher; the server answers 403 otherwise.
pub struct EnrollmentsApi {
    gateway: Arc<GatewayClient>,
}

impl EnrollmentsApi {
    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self { gateway }
    }

    /// Enroll a student. Enrolling an already-enrolled student is not an
    /// error; the server returns the existing enrollment.
    pub async fn enroll(
        &self,
        enrollment: &NewEnrollment,
    ) -> Result<EnrollmentRecord, GatewayError> {
        let env: EnrollmentEnvelope = self.gateway.post("/enrollments/", enrollment).await?;
        Ok(env.enrollment)
    }

    pub async fn set_status(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<EnrollmentRecord, GatewayError> {
        #[derive(Serialize)]
        struct Payload {
            status: EnrollmentStatus,
        }

        let env: EnrollmentEnvelope = self
            .gateway
            .put(&format!("/enrollments/{id}/status"), &Payload { status })
            .await?;
        Ok(env.enrollment)
    }

    /// All enrollments in a class, grades included.
    pub async fn list_for_class(
        &self,
        class_id: i64,
    ) -> Result<Vec<EnrollmentRecord>, GatewayError> {
        let env: EnrollmentListEnvelope = self
            .gateway
            .get(&format!("/enrollments/class/{class_id}"))
            .await?;
        Ok(env.enrollments)
    }
}

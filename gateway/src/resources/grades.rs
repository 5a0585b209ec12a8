use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::resources::Ack;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub id: i64,
    pub enrollment_id: i64,
    pub score: f64,
    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewGrade {
    pub enrollment_id: i64,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GradeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GradeEnvelope {
    grade: GradeRecord,
}

#[derive(Debug, Deserialize)]
struct GradeListEnvelope {
    grades: Vec<GradeRecord>,
}

/// Grade submission and lookup. Only the class teacher may submit or
/// update; the server enforces this with 403.
pub struct GradesApi {
    gateway: Arc<GatewayClient>,
}

impl GradesApi {
    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self { gateway }
    }

    pub async fn submit(&self, grade: &NewGrade) -> Result<GradeRecord, GatewayError> {
        let env: GradeEnvelope = self.gateway.post("/grades/", grade).await?;
        Ok(env.grade)
    }

    pub async fn update(&self, id: i64, update: &GradeUpdate) -> Result<GradeRecord, GatewayError> {
        let env: GradeEnvelope = self
            .gateway
            .put(&format!("/grades/{id}"), update)
            .await?;
        Ok(env.grade)
    }

    pub async fn list_for_enrollment(
        &self,
        enrollment_id: i64,
    ) -> Result<Vec<GradeRecord>, GatewayError> {
        let env: GradeListEnvelope = self
            .gateway
            .get(&format!("/grades/enrollment/{enrollment_id}"))
            .await?;
        Ok(env.grades)
    }

    pub async fn delete(&self, id: i64) -> Result<(), GatewayError> {
        let _: Ack = self.gateway.delete(&format!("/grades/{id}")).await?;
        Ok(())
    }
}

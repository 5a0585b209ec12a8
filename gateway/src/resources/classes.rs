use std::sync::Arc;

use serde::{Deserialize, Serialize};

use session::model::UserProfile;

use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::resources::Ack;
use crate::resources::enrollments::EnrollmentRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub teacher: Option<UserProfile>,
    /// Present only on the detail endpoint.
    #[serde(default)]
    pub enrollments: Option<Vec<EnrollmentRecord>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewClass {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClassListEnvelope {
    classes: Vec<ClassRecord>,
}

#[derive(Debug, Deserialize)]
struct ClassEnvelope {
    #[serde(rename = "class")]
    record: ClassRecord,
}

/// Class CRUD. Mutations are admin-only; the server answers 403 for
/// everyone else.
pub struct ClassesApi {
    gateway: Arc<GatewayClient>,
}

impl ClassesApi {
    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<ClassRecord>, GatewayError> {
        let env: ClassListEnvelope = self.gateway.get("/classes/").await?;
        Ok(env.classes)
    }

    /// Class detail, enrollments and grades included.
    pub async fn get(&self, id: i64) -> Result<ClassRecord, GatewayError> {
        self.gateway.get(&format!("/classes/{id}")).await
    }

    pub async fn create(&self, class: &NewClass) -> Result<ClassRecord, GatewayError> {
        let env: ClassEnvelope = self.gateway.post("/classes/", class).await?;
        Ok(env.record)
    }

    pub async fn update(&self, id: i64, update: &ClassUpdate) -> Result<ClassRecord, GatewayError> {
        let env: ClassEnvelope = self
            .gateway
            .put(&format!("/classes/{id}"), update)
            .await?;
        Ok(env.record)
    }

    pub async fn delete(&self, id: i64) -> Result<(), GatewayError> {
        let _: Ack = self.gateway.delete(&format!("/classes/{id}")).await?;
        Ok(())
    }

    pub async fn assign_teacher(
        &self,
        id: i64,
        teacher_id: i64,
    ) -> Result<ClassRecord, GatewayError> {
        #[derive(Serialize)]
        struct Payload {
            teacher_id: i64,
        }

        let env: ClassEnvelope = self
            .gateway
            .post(&format!("/classes/{id}/assign-teacher"), &Payload { teacher_id })
            .await?;
        Ok(env.record)
    }
}

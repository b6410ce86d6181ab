//! Request/response bodies and field validation
use dropstat_core::{checked_total, DropError, DropType, Server, TypedDrop};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleReportRequest {
    pub stage_id: String,
    pub server: Server,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub drops: Vec<DropLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropLine {
    pub item_id: String,
    /// Signed on the wire so negative values get a field error instead of a parse error
    pub quantity: i64,
    pub drop_type: DropType,
}

impl SingleReportRequest {
    /// Check every field and convert the drop lines. All field errors are
    /// reported together in one message.
    pub fn typed_drops(&self) -> Result<Vec<TypedDrop>, DropError> {
        let mut errors = Vec::new();
        if self.stage_id.trim().is_empty() {
            errors.push("stageId: must not be blank".to_string());
        }

        let mut drops = Vec::with_capacity(self.drops.len());
        for (i, line) in self.drops.iter().enumerate() {
            if line.item_id.trim().is_empty() {
                errors.push(format!("drops[{}].itemId: must not be blank", i));
            }
            match u32::try_from(line.quantity) {
                Ok(quantity) => drops.push(TypedDrop::new(line.item_id.clone(), quantity, line.drop_type)),
                Err(_) => errors.push(format!(
                    "drops[{}].quantity: must be between 0 and {}",
                    i,
                    u32::MAX
                )),
            }
        }
        if drops.len() == self.drops.len() && checked_total(&drops).is_none() {
            errors.push("drops: total quantity out of range".to_string());
        }

        if errors.is_empty() {
            Ok(drops)
        } else {
            Err(DropError::Validation(errors.join("; ")))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleReportResponse {
    pub report_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallLastReportRequest {
    pub report_hash: String,
}

impl RecallLastReportRequest {
    pub fn validate(&self) -> Result<(), DropError> {
        if self.report_hash.trim().is_empty() {
            return Err(DropError::Validation(
                "reportHash: must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "userID")]
    pub user_id: String,
}

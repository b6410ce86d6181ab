//! Data Model: Report, Drop, TypedDrop, StageInfo, User
use crate::context::ValidatorContext;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Game server a report was collected on
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Server {
    CN,
    US,
    JP,
    KR,
}

impl Server {
    pub fn as_str(&self) -> &'static str {
        match self {
            Server::CN => "CN",
            Server::US => "US",
            Server::JP => "JP",
            Server::KR => "KR",
        }
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a submitted line item. Aggregation ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DropType {
    NormalDrop,
    SpecialDrop,
    ExtraDrop,
    Furniture,
}

/// Client-submitted line item. Several entries may share an item id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDrop {
    pub item_id: String,
    pub quantity: u32,
    pub drop_type: DropType,
}

impl TypedDrop {
    pub fn new(item_id: impl Into<String>, quantity: u32, drop_type: DropType) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
            drop_type,
        }
    }
}

/// Canonical drop entry: at most one per item id within a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drop {
    pub item_id: String,
    pub quantity: u32,
}

impl Drop {
    pub fn new(item_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

/// Internal report identifier. Never handed to clients; they get the
/// recall token derived from it instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(String);

impl ReportId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ReportId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ReportId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The persisted aggregate of one accepted submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    pub stage_id: String,
    pub server: Server,
    /// Attempts this report covers. Equals the drop total on gacha stages.
    pub times: u32,
    /// Unique item ids
    pub drops: Vec<Drop>,
    /// Creation time (Unix ms)
    pub timestamp: i64,
    pub ip: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    /// Decided once at creation
    pub is_reliable: bool,
    /// Only ever flips false → true, through recall
    pub is_deleted: bool,
    pub source: String,
    pub version: String,
}

impl Report {
    /// Build the stored aggregate of an accepted submission in one step
    pub fn from_context(
        id: ReportId,
        context: ValidatorContext,
        drops: Vec<Drop>,
        times: u32,
        is_reliable: bool,
        source: String,
        version: String,
    ) -> Self {
        Report {
            id,
            stage_id: context.stage_id,
            server: context.server,
            times,
            drops,
            timestamp: context.timestamp,
            ip: context.ip,
            user_id: context.user_id,
            is_reliable,
            is_deleted: false,
            source,
            version,
        }
    }
}

/// Per-server availability of a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageExistence {
    pub exist: bool,
    /// Unix ms; absent means open since forever
    #[serde(default)]
    pub open_time: Option<i64>,
    /// Unix ms; absent means never closes
    #[serde(default)]
    pub close_time: Option<i64>,
}

impl StageExistence {
    pub fn always() -> Self {
        Self {
            exist: true,
            open_time: None,
            close_time: None,
        }
    }
}

/// Inclusive quantity range an item may legitimately drop in, plus
/// isolated values allowed outside of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: u32,
    pub upper: u32,
    #[serde(default)]
    pub exceptions: Vec<u32>,
}

impl Bounds {
    pub fn new(lower: u32, upper: u32) -> Self {
        Self {
            lower,
            upper,
            exceptions: Vec::new(),
        }
    }

    pub fn contains(&self, quantity: u32) -> bool {
        (self.lower..=self.upper).contains(&quantity) || self.exceptions.contains(&quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropInfo {
    pub item_id: String,
    pub bounds: Bounds,
}

/// Stage metadata as served by the stage catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageInfo {
    pub stage_id: String,
    #[serde(default)]
    pub is_gacha: bool,
    #[serde(default)]
    pub existence: HashMap<Server, StageExistence>,
    #[serde(default)]
    pub drop_infos: Vec<DropInfo>,
}

impl StageInfo {
    /// A regular stage open on every server with no drop table
    pub fn new(stage_id: impl Into<String>) -> Self {
        let existence = [Server::CN, Server::US, Server::JP, Server::KR]
            .into_iter()
            .map(|server| (server, StageExistence::always()))
            .collect();
        Self {
            stage_id: stage_id.into(),
            is_gacha: false,
            existence,
            drop_infos: Vec::new(),
        }
    }

    pub fn gacha(mut self) -> Self {
        self.is_gacha = true;
        self
    }

    pub fn with_existence(mut self, server: Server, existence: StageExistence) -> Self {
        self.existence.insert(server, existence);
        self
    }

    pub fn with_drop(mut self, item_id: impl Into<String>, bounds: Bounds) -> Self {
        self.drop_infos.push(DropInfo {
            item_id: item_id.into(),
            bounds,
        });
        self
    }

    pub fn drop_info(&self, item_id: &str) -> Option<&DropInfo> {
        self.drop_infos.iter().find(|info| info.item_id == item_id)
    }
}

/// A pseudonymous submitter account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub ip: String,
    /// Unix ms
    pub created_at: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

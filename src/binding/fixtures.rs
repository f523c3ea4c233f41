//! Record types shared by the binding unit tests.

use chrono::{DateTime, Utc};

use crate::binding::Record;

/// Plain record without soft deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: u64,
    pub tier: String,
}

impl Account {
    pub fn new(id: u64, tier: &str) -> Self {
        Self {
            id,
            tier: tier.to_string(),
        }
    }
}

impl Record for Account {
    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.to_string()),
            "tier" => Some(self.tier.clone()),
            _ => None,
        }
    }
}

/// Soft-deletable record grouped by team.
#[derive(Debug, Clone, PartialEq)]
pub struct Membership {
    pub team_id: u64,
    pub user: String,
    pub role: String,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Membership {
    pub fn new(team_id: u64, user: &str, role: &str) -> Self {
        Self {
            team_id,
            user: user.to_string(),
            role: role.to_string(),
            deleted_at: None,
        }
    }
}

impl Record for Membership {
    const SOFT_DELETE: bool = true;

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "team_id" => Some(self.team_id.to_string()),
            "user" => Some(self.user.clone()),
            "role" => Some(self.role.clone()),
            _ => None,
        }
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

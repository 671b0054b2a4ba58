use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MemberStatus {
    Active,
    #[default]
    Inactive,
    Other(String),
}

impl From<String> for MemberStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "active" => MemberStatus::Active,
            "inactive" => MemberStatus::Inactive,
            _ => MemberStatus::Other(value),
        }
    }
}

impl From<MemberStatus> for String {
    fn from(value: MemberStatus) -> Self {
        match value {
            MemberStatus::Active => "active".to_string(),
            MemberStatus::Inactive => "inactive".to_string(),
            MemberStatus::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub role: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub status: MemberStatus,
}

/// The multi-agent analyst team.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamStatus {
    #[serde(default)]
    pub team_size: u32,
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

impl TeamStatus {
    pub fn active_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| m.status == MemberStatus::Active)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemStatus {
    #[serde(default)]
    pub system: String,
    #[serde(default)]
    pub trading_enabled: bool,
    #[serde(default)]
    pub refactoring_mode: bool,
    #[serde(default)]
    pub agent_team: Option<TeamStatus>,
}

impl SystemStatus {
    pub fn is_online(&self) -> bool {
        self.system == "online"
    }
}

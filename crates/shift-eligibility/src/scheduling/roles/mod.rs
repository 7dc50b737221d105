//! Role vocabulary: canonical role names and the coarse capability keys
//! that workplace requirements are written against.

mod mapping;
mod normalizer;

pub(crate) use normalizer::fold_label;

use mapping::{canonical_for_folded, CAPABILITY_RULES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Known role vocabulary. Labels outside the table pass through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CanonicalRole {
    Primararzt,
    ErsterOberarzt,
    Oberarzt,
    Funktionsoberarzt,
    Ausbildungsoberarzt,
    Facharzt,
    Assistenzarzt,
    Turnusarzt,
    Student,
    OpAssistenz,
    Sekretariat,
    Other(String),
}

impl CanonicalRole {
    pub fn label(&self) -> &str {
        match self {
            Self::Primararzt => "Primararzt",
            Self::ErsterOberarzt => "1. Oberarzt",
            Self::Oberarzt => "Oberarzt",
            Self::Funktionsoberarzt => "Funktionsoberarzt",
            Self::Ausbildungsoberarzt => "Ausbildungsoberarzt",
            Self::Facharzt => "Facharzt",
            Self::Assistenzarzt => "Assistenzarzt",
            Self::Turnusarzt => "Turnusarzt",
            Self::Student => "Student (KPJ)",
            Self::OpAssistenz => "OP-Assistenz",
            Self::Sekretariat => "Sekretariat",
            Self::Other(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for CanonicalRole {
    fn from(value: String) -> Self {
        canonical_for_folded(&fold_label(&value)).unwrap_or(Self::Other(value))
    }
}

impl From<CanonicalRole> for String {
    fn from(value: CanonicalRole) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for CanonicalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse capability derived from a free-text role label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKey {
    Primararzt,
    Facharzt,
    Assistenzarzt,
    OpAssistenz,
    Sekretaerin,
}

impl CapabilityKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primararzt => "primararzt",
            Self::Facharzt => "facharzt",
            Self::Assistenzarzt => "assistenzarzt",
            Self::OpAssistenz => "op_assistenz",
            Self::Sekretaerin => "sekretaerin",
        }
    }

    pub const fn is_clinical(self) -> bool {
        !matches!(self, Self::Sekretaerin)
    }

    pub const fn role_group(self) -> RoleGroup {
        match self {
            Self::Primararzt | Self::Facharzt => RoleGroup::Physicians,
            Self::Assistenzarzt => RoleGroup::Residents,
            Self::OpAssistenz => RoleGroup::TheatreAssistants,
            Self::Sekretaerin => RoleGroup::Secretariat,
        }
    }
}

/// Staffing pool a service line is normally drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleGroup {
    Physicians,
    Residents,
    TheatreAssistants,
    Secretariat,
}

impl RoleGroup {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Physicians => "Fachärzte",
            Self::Residents => "Assistenzärzte",
            Self::TheatreAssistants => "OP-Assistenz",
            Self::Secretariat => "Sekretariat",
        }
    }
}

/// Map a role label onto its canonical form. Unknown labels pass through unchanged.
pub fn normalize_role(role: &str) -> CanonicalRole {
    CanonicalRole::from(role.to_string())
}

/// Derive capability keys from a role label using the ordered marker table.
pub fn role_capability_keys(role: &str) -> BTreeSet<CapabilityKey> {
    let folded = fold_label(role);
    let mut keys = BTreeSet::new();
    if folded.is_empty() {
        return keys;
    }

    for rule in CAPABILITY_RULES {
        if !rule.matches(&folded) {
            continue;
        }
        if rule.exclusive {
            return BTreeSet::from([rule.key]);
        }
        keys.insert(rule.key);
    }
    keys
}

pub fn role_groups(role: &str) -> BTreeSet<RoleGroup> {
    role_capability_keys(role)
        .into_iter()
        .map(CapabilityKey::role_group)
        .collect()
}

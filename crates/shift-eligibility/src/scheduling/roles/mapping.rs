use super::normalizer::fold_label;
use super::{CanonicalRole, CapabilityKey};
use std::collections::HashMap;
use std::sync::OnceLock;

static ROLE_ALIAS_MAP: OnceLock<HashMap<String, CanonicalRole>> = OnceLock::new();

pub(crate) fn canonical_for_folded(folded_label: &str) -> Option<CanonicalRole> {
    role_alias_map().get(folded_label).cloned()
}

fn role_alias_map() -> &'static HashMap<String, CanonicalRole> {
    ROLE_ALIAS_MAP.get_or_init(|| {
        const ALIASES: &[(&str, CanonicalRole)] = &[
            // Department heads
            ("Primararzt", CanonicalRole::Primararzt),
            ("Primarärztin", CanonicalRole::Primararzt),
            ("Primar", CanonicalRole::Primararzt),
            ("Primaria", CanonicalRole::Primararzt),
            ("Chefarzt", CanonicalRole::Primararzt),
            ("Chefärztin", CanonicalRole::Primararzt),
            // Attendings
            ("1. Oberarzt", CanonicalRole::ErsterOberarzt),
            ("1. Oberärztin", CanonicalRole::ErsterOberarzt),
            ("1.Oberarzt", CanonicalRole::ErsterOberarzt),
            ("1.Oberärztin", CanonicalRole::ErsterOberarzt),
            ("Erster Oberarzt", CanonicalRole::ErsterOberarzt),
            ("Erste Oberärztin", CanonicalRole::ErsterOberarzt),
            ("Oberarzt", CanonicalRole::Oberarzt),
            ("Oberärztin", CanonicalRole::Oberarzt),
            ("Funktionsoberarzt", CanonicalRole::Funktionsoberarzt),
            ("Funktionsoberärztin", CanonicalRole::Funktionsoberarzt),
            ("Ausbildungsoberarzt", CanonicalRole::Ausbildungsoberarzt),
            ("Ausbildungsoberärztin", CanonicalRole::Ausbildungsoberarzt),
            ("Facharzt", CanonicalRole::Facharzt),
            ("Fachärztin", CanonicalRole::Facharzt),
            // Residents and students
            ("Assistenzarzt", CanonicalRole::Assistenzarzt),
            ("Assistenzärztin", CanonicalRole::Assistenzarzt),
            ("Turnusarzt", CanonicalRole::Turnusarzt),
            ("Turnusärztin", CanonicalRole::Turnusarzt),
            ("Student", CanonicalRole::Student),
            ("Studentin", CanonicalRole::Student),
            ("Student (KPJ)", CanonicalRole::Student),
            ("Studentin (KPJ)", CanonicalRole::Student),
            ("KPJ", CanonicalRole::Student),
            // Theatre staff
            ("OP-Assistenz", CanonicalRole::OpAssistenz),
            ("OP Assistenz", CanonicalRole::OpAssistenz),
            ("OP-Assistent", CanonicalRole::OpAssistenz),
            ("OP-Assistentin", CanonicalRole::OpAssistenz),
            // Administration
            ("Sekretariat", CanonicalRole::Sekretariat),
            ("Sekretärin", CanonicalRole::Sekretariat),
            ("Sekretär", CanonicalRole::Sekretariat),
        ];

        let mut map = HashMap::with_capacity(ALIASES.len());
        for (label, role) in ALIASES {
            map.insert(fold_label(label), role.clone());
        }
        map
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkerMode {
    Any,
    All,
    /// As `All`, but the first marker must stand as a word of its own.
    WordThenAll,
}

/// One row of the capability table. Markers are matched against folded labels.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CapabilityRule {
    pub key: CapabilityKey,
    pub markers: &'static [&'static str],
    pub mode: MarkerMode,
    /// An exclusive match discards every other key derived for the label.
    pub exclusive: bool,
}

impl CapabilityRule {
    pub(crate) fn matches(&self, folded_label: &str) -> bool {
        match self.mode {
            MarkerMode::Any => self
                .markers
                .iter()
                .any(|marker| folded_label.contains(marker)),
            MarkerMode::All => self
                .markers
                .iter()
                .all(|marker| folded_label.contains(marker)),
            MarkerMode::WordThenAll => match self.markers.split_first() {
                Some((word, rest)) => {
                    has_word(folded_label, word)
                        && rest.iter().all(|marker| folded_label.contains(marker))
                }
                None => false,
            },
        }
    }
}

fn has_word(folded_label: &str, word: &str) -> bool {
    folded_label
        .split(|ch: char| !ch.is_alphanumeric())
        .any(|token| token == word)
}

/// Capability table in priority order.
pub(crate) const CAPABILITY_RULES: &[CapabilityRule] = &[
    CapabilityRule {
        key: CapabilityKey::Primararzt,
        markers: &["primar", "chefarzt"],
        mode: MarkerMode::Any,
        exclusive: false,
    },
    CapabilityRule {
        key: CapabilityKey::Facharzt,
        markers: &["oberarzt", "facharzt", "funktionsoberarzt", "ausbildungsoberarzt"],
        mode: MarkerMode::Any,
        exclusive: false,
    },
    CapabilityRule {
        key: CapabilityKey::Assistenzarzt,
        markers: &["assistenzarzt", "turnus", "student", "kpj"],
        mode: MarkerMode::Any,
        exclusive: false,
    },
    CapabilityRule {
        key: CapabilityKey::OpAssistenz,
        markers: &["op", "assist"],
        mode: MarkerMode::WordThenAll,
        exclusive: false,
    },
    CapabilityRule {
        key: CapabilityKey::Sekretaerin,
        markers: &["sekret"],
        mode: MarkerMode::Any,
        exclusive: true,
    },
];

#[cfg(test)]
pub(crate) fn lookup_for_tests(label: &str) -> Option<CanonicalRole> {
    canonical_for_folded(&fold_label(label))
}

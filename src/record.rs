use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Confidence label attached to a species' taxonomic resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Credibility {
    High,
    Moderate,
    Low,
}

impl Credibility {
    /// Legend color for this credibility level.
    pub fn color(self) -> &'static str {
        match self {
            Credibility::High => "#4CAF50",
            Credibility::Moderate => "#FFC107",
            Credibility::Low => "#F44336",
        }
    }
}

impl Default for Credibility {
    /// Records arriving without a score are treated as moderate.
    fn default() -> Self {
        Credibility::Moderate
    }
}

impl fmt::Display for Credibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credibility::High => write!(f, "HIGH"),
            Credibility::Moderate => write!(f, "MODERATE"),
            Credibility::Low => write!(f, "LOW"),
        }
    }
}

impl FromStr for Credibility {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Ok(Credibility::High),
            "MODERATE" => Ok(Credibility::Moderate),
            "LOW" => Ok(Credibility::Low),
            other => Err(format!("unrecognised credibility level: {other}")),
        }
    }
}

/// Full taxonomic lineage as resolved by the ingestion layer.
///
/// Every field is optional; an absent rank simply does not appear in the
/// built hierarchy. The sentinel values `NA` and empty strings count as
/// absent too, matching the source tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    pub kingdom: Option<String>,
    pub phylum: Option<String>,
    pub class: Option<String>,
    pub order: Option<String>,
    pub family: Option<String>,
    pub genus: Option<String>,
    pub species: Option<String>,
}

impl Lineage {
    /// Fields in canonical rank order, kingdom first.
    pub fn fields(&self) -> [Option<&str>; 7] {
        [
            self.kingdom.as_deref(),
            self.phylum.as_deref(),
            self.class.as_deref(),
            self.order.as_deref(),
            self.family.as_deref(),
            self.genus.as_deref(),
            self.species.as_deref(),
        ]
    }
}

/// Metadata the ingestion layer attaches to each observation before it
/// reaches the tree builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    #[serde(default)]
    pub credibility: Credibility,
    #[serde(default)]
    pub lineage: Option<Lineage>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub confidence: String,
}

/// One flat observation row: a species detected at a site with a haplotype
/// count. Multiple records may share a species and differ by site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub species: String,
    pub site: String,
    pub count: u32,
    pub metadata: RecordMetadata,
}

impl ObservationRecord {
    pub fn new(
        species: impl Into<String>,
        site: impl Into<String>,
        count: u32,
        metadata: RecordMetadata,
    ) -> Self {
        Self {
            species: species.into(),
            site: site.into(),
            count,
            metadata,
        }
    }
}

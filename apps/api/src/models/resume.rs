//! Resume document model: Resume → Section → Entry → Variation.
//!
//! A Resume owns its Sections and Entries; Variations are owned by their Entry.
//! An Entry selects at most one of its own Variations; every mutation below
//! keeps `selected` pointing at an existing Variation or `None`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Achievements,
    Other,
}

impl SectionKind {
    /// Rendering order used when a parser discovers sections out of order.
    pub const CANONICAL_ORDER: [SectionKind; 8] = [
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Projects,
        SectionKind::Skills,
        SectionKind::Education,
        SectionKind::Certifications,
        SectionKind::Achievements,
        SectionKind::Other,
    ];

    pub fn default_title(&self) -> &'static str {
        match self {
            SectionKind::Summary => "Summary",
            SectionKind::Experience => "Professional Experience",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Technical Skills",
            SectionKind::Projects => "Projects",
            SectionKind::Certifications => "Certifications",
            SectionKind::Achievements => "Achievements",
            SectionKind::Other => "Additional Information",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// One sentence of the professional summary.
    Summary,
    /// Short description of a role or project, rendered as a paragraph.
    Overview,
    /// Accomplishment bullet.
    Bullet,
    /// A group of skills, e.g. "Rust, Go, Python".
    Skill,
    /// Supporting line such as GPA or a certification.
    Detail,
}

/// The role, project or school an entry belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryContext {
    pub title: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub technologies: Vec<String>,
}

impl EntryContext {
    pub fn headline(&self) -> String {
        [&self.title, &self.organization, &self.period]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VariationSource {
    Original,
    User,
    Enhanced {
        model: String,
        company: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    pub id: Uuid,
    pub text: String,
    pub source: VariationSource,
    pub created_at: DateTime<Utc>,
}

impl Variation {
    pub fn new(text: impl Into<String>, source: VariationSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            source,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub kind: EntryKind,
    pub context: Option<EntryContext>,
    pub variations: Vec<Variation>,
    pub selected: Option<Uuid>,
}

/// Errors raised when an edit would break the selection invariant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("variation {0} does not belong to entry {1}")]
    UnknownVariation(Uuid, Uuid),
    #[error("variation text cannot be empty")]
    EmptyText,
}

impl Entry {
    /// Creates an entry with one original variation, selected.
    pub fn from_text(kind: EntryKind, context: Option<EntryContext>, text: &str) -> Self {
        let original = Variation::new(text.trim(), VariationSource::Original);
        Self {
            id: Uuid::new_v4(),
            kind,
            context,
            selected: Some(original.id),
            variations: vec![original],
        }
    }

    pub fn variation(&self, variation_id: Uuid) -> Option<&Variation> {
        self.variations.iter().find(|v| v.id == variation_id)
    }

    pub fn selected_variation(&self) -> Option<&Variation> {
        self.selected.and_then(|id| self.variation(id))
    }

    /// Text used as input for enhancement: the selected variation, else the first one.
    pub fn working_text(&self) -> Option<&str> {
        self.selected_variation()
            .or_else(|| self.variations.first())
            .map(|v| v.text.as_str())
    }

    pub fn add_variation(&mut self, variation: Variation) -> Result<Uuid, ModelError> {
        if variation.text.trim().is_empty() {
            return Err(ModelError::EmptyText);
        }
        let id = variation.id;
        self.variations.push(variation);
        Ok(id)
    }

    pub fn edit_variation(&mut self, variation_id: Uuid, text: &str) -> Result<(), ModelError> {
        if text.trim().is_empty() {
            return Err(ModelError::EmptyText);
        }
        let entry_id = self.id;
        let variation = self
            .variations
            .iter_mut()
            .find(|v| v.id == variation_id)
            .ok_or(ModelError::UnknownVariation(variation_id, entry_id))?;
        variation.text = text.trim().to_string();
        Ok(())
    }

    /// Removes a variation. Removing the selected variation clears the selection.
    pub fn remove_variation(&mut self, variation_id: Uuid) -> Result<Variation, ModelError> {
        let idx = self
            .variations
            .iter()
            .position(|v| v.id == variation_id)
            .ok_or(ModelError::UnknownVariation(variation_id, self.id))?;
        if self.selected == Some(variation_id) {
            self.selected = None;
        }
        Ok(self.variations.remove(idx))
    }

    pub fn select(&mut self, variation_id: Uuid) -> Result<(), ModelError> {
        if self.variation(variation_id).is_none() {
            return Err(ModelError::UnknownVariation(variation_id, self.id));
        }
        self.selected = Some(variation_id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: Uuid,
    pub kind: SectionKind,
    pub title: String,
    pub entries: Vec<Entry>,
}

impl Section {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: kind.default_title().to_string(),
            entries: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub website: String,
}

impl ContactInfo {
    /// Non-empty contact fields in display order (name and title excluded).
    pub fn display_fields(&self) -> Vec<&str> {
        [
            &self.email,
            &self.phone,
            &self.location,
            &self.linkedin,
            &self.github,
            &self.website,
        ]
        .into_iter()
        .map(|s| s.as_str())
        .filter(|s| !s.is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub id: Uuid,
    pub name: String,
    pub contact: ContactInfo,
    pub sections: Vec<Section>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resume {
    pub fn new(contact: ContactInfo, sections: Vec<Section>) -> Self {
        let now = Utc::now();
        let name = if contact.name.trim().is_empty() {
            "Unknown".to_string()
        } else {
            contact.name.trim().to_string()
        };
        Self {
            id: Uuid::new_v4(),
            name,
            contact,
            sections,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.sections.iter().flat_map(|s| s.entries.iter())
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut Entry> {
        self.sections.iter_mut().flat_map(|s| s.entries.iter_mut())
    }

    pub fn entry(&self, entry_id: Uuid) -> Option<&Entry> {
        self.entries().find(|e| e.id == entry_id)
    }

    pub fn entry_mut(&mut self, entry_id: Uuid) -> Option<&mut Entry> {
        self.entries_mut().find(|e| e.id == entry_id)
    }

    pub fn section_mut(&mut self, section_id: Uuid) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == section_id)
    }

    pub fn remove_entry(&mut self, entry_id: Uuid) -> Option<Entry> {
        for section in &mut self.sections {
            if let Some(idx) = section.entries.iter().position(|e| e.id == entry_id) {
                return Some(section.entries.remove(idx));
            }
        }
        None
    }

    /// Entries without exactly one existing selected variation.
    pub fn unselected_entries(&self) -> Vec<Uuid> {
        self.entries()
            .filter(|e| e.selected_variation().is_none())
            .map(|e| e.id)
            .collect()
    }

    pub fn is_export_ready(&self) -> bool {
        self.unselected_entries().is_empty()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

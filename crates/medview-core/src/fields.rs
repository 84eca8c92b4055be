//! The fixed catalogue of patient profile fields, grouped the way they are
//! displayed.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Personal,
    Contact,
    Medical,
    Emergency,
}

/// How a field's value is formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Short,
    /// Free text that gets truncated when long.
    LongText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn short(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Short,
    }
}

const fn long_text(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::LongText,
    }
}

const PERSONAL: &[FieldSpec] = &[
    short("full_name", "Full Name"),
    short("patientid", "Patient ID"),
    short("dateofbirth", "Date of Birth"),
    short("age", "Age"),
    short("gender", "Gender"),
    short("maritalstatus", "Marital Status"),
];

const CONTACT: &[FieldSpec] = &[
    short("email", "Email"),
    short("phone_primary", "Phone"),
    short("address", "Address"),
    short("personalnumberid", "Personal Number ID"),
];

const MEDICAL: &[FieldSpec] = &[
    short("bloodtype", "Blood Type"),
    long_text("allergies", "Allergies"),
    long_text("chronicdiseases", "Chronic Diseases"),
    long_text("currentmedications", "Current Medications"),
    long_text("medicalhistory", "Medical History"),
    long_text("previoussurgeries", "Previous Surgeries"),
];

const EMERGENCY: &[FieldSpec] = &[
    short("emergencycontactname", "Contact Name"),
    short("emergencycontactphone", "Contact Phone"),
];

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 4] = [
        Category::Personal,
        Category::Contact,
        Category::Medical,
        Category::Emergency,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Personal => "Personal Information",
            Self::Contact => "Contact Information",
            Self::Medical => "Medical Information",
            Self::Emergency => "Emergency Contact",
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Personal => PERSONAL,
            Self::Contact => CONTACT,
            Self::Medical => MEDICAL,
            Self::Emergency => EMERGENCY,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Personal => write!(f, "personal"),
            Self::Contact => write!(f, "contact"),
            Self::Medical => write!(f, "medical"),
            Self::Emergency => write!(f, "emergency"),
        }
    }
}

/// Looks up the catalogue entry for a record key.
pub fn lookup(key: &str) -> Option<(Category, &'static FieldSpec)> {
    Category::ALL
        .iter()
        .find_map(|&c| c.fields().iter().find(|f| f.key == key).map(|f| (c, f)))
}

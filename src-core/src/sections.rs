//! Form Catalog
//!
//! The tabs, sections and fields of the project form. Declared once at
//! build time; nothing here changes at runtime.

use std::collections::BTreeSet;

use crate::domain::{FieldDescriptor, SectionId};

/// A named, independently editable group of fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpec {
    pub id: SectionId,
    pub title: &'static str,
    pub fields: &'static [FieldDescriptor],
}

/// A tab of the project page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabSpec {
    pub title: &'static str,
    pub sections: &'static [SectionSpec],
    /// Shows the record's geometry instead of a form
    pub shows_geometry: bool,
}

pub const IDENTIFICATION: SectionId = SectionId("identification");
pub const TIMELINE: SectionId = SectionId("timeline");
pub const FUNDING_PRACTICE: SectionId = SectionId("funding_practice");
pub const DESCRIPTIONS: SectionId = SectionId("descriptions");
pub const WEB_LINKS: SectionId = SectionId("web_links");
pub const AASHTOWARE: SectionId = SectionId("aashtoware");

pub const CONSTRUCTION_YEARS: &[&str] = &["CY2025", "CY2026", "CY2027", "CY2028", "CY2029", "CY2030"];
pub const FISCAL_YEARS: &[&str] = &["FY2025", "FY2026", "FY2027", "FY2028", "FY2029", "FY2030"];
pub const PHASES: &[&str] = &["Planning", "Construction"];
pub const FUND_TYPES: &[&str] = &["FHWY", "FHWA", "FAA", "STATE", "OTHER"];
pub const PRACTICES: &[&str] = &["Highways", "Aviation", "Facilities", "Marine Highway", "Other"];

static TABS: &[TabSpec] = &[
    TabSpec {
        title: "Information",
        shows_geometry: false,
        sections: &[
            SectionSpec {
                id: IDENTIFICATION,
                title: "Identification",
                fields: &[
                    FieldDescriptor::text("proj_name", "Project Name"),
                    FieldDescriptor::select("construction_year", "Construction Year", CONSTRUCTION_YEARS),
                    FieldDescriptor::select("phase", "Phase", PHASES),
                    FieldDescriptor::text("iris", "IRIS"),
                    FieldDescriptor::text("stip", "STIP"),
                    FieldDescriptor::text("fed_proj_num", "Federal #"),
                ],
            },
            SectionSpec {
                id: TIMELINE,
                title: "Timeline",
                fields: &[
                    FieldDescriptor::text("anticipated_start", "Anticipated Start"),
                    FieldDescriptor::text("anticipated_end", "Anticipated End"),
                ],
            },
            SectionSpec {
                id: FUNDING_PRACTICE,
                title: "Funding & Practice",
                fields: &[
                    FieldDescriptor::select("fund_type", "Funding Type", FUND_TYPES),
                    FieldDescriptor::select("proj_prac", "Practice", PRACTICES),
                ],
            },
            SectionSpec {
                id: DESCRIPTIONS,
                title: "Descriptions",
                fields: &[
                    FieldDescriptor::long_text("proj_desc", "Project Description"),
                    FieldDescriptor::long_text("proj_purp", "Project Purpose"),
                    FieldDescriptor::long_text("proj_impact", "Current Traffic Impact"),
                ],
            },
            SectionSpec {
                id: WEB_LINKS,
                title: "Web Links",
                fields: &[
                    FieldDescriptor::text("proj_web", "Project Website"),
                    FieldDescriptor::text("apex_mapper_link", "APEX Mapper Link"),
                ],
            },
        ],
    },
    TabSpec {
        title: "AASHTOWare",
        shows_geometry: false,
        sections: &[SectionSpec {
            id: AASHTOWARE,
            title: "AASHTOWare Connected Data",
            fields: &[
                FieldDescriptor::text("iris", "IRIS"),
                FieldDescriptor::text("awp_proj_name", "AASHTOWare Project Name"),
                FieldDescriptor::select("fund_type", "Funding Type", FUND_TYPES),
                FieldDescriptor::select("proj_prac", "Practice", PRACTICES),
                FieldDescriptor::date("award_date", "Award Date"),
                FieldDescriptor::select("award_fiscal_year", "Awarded Fiscal Year", FISCAL_YEARS),
                FieldDescriptor::text("contractor", "Awarded Contractor"),
                FieldDescriptor::number("awarded_amount", "Awarded Amount"),
                FieldDescriptor::number("current_contract_amount", "Current Contract Amount"),
                FieldDescriptor::number("amount_paid_to_date", "Amount Paid to Date"),
                FieldDescriptor::date("tenadd", "Tentative Advertised Date"),
            ],
        }],
    },
    TabSpec {
        title: "Geometry",
        shows_geometry: true,
        sections: &[],
    },
];

/// All tabs in display order
pub fn catalog() -> &'static [TabSpec] {
    TABS
}

pub fn find_section(id: SectionId) -> Option<&'static SectionSpec> {
    TABS.iter().flat_map(|tab| tab.sections.iter()).find(|s| s.id == id)
}

/// Every field declared by any section
pub fn declared_fields() -> BTreeSet<String> {
    TABS.iter()
        .flat_map(|tab| tab.sections.iter())
        .flat_map(|s| s.fields.iter())
        .map(|f| f.name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_ids_are_unique() {
        let ids: Vec<SectionId> = TABS.iter().flat_map(|t| t.sections.iter()).map(|s| s.id).collect();
        let unique: BTreeSet<SectionId> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn test_field_names_are_lowercase_and_unique_per_section() {
        for section in TABS.iter().flat_map(|t| t.sections.iter()) {
            let names: BTreeSet<&str> = section.fields.iter().map(|f| f.name).collect();
            assert_eq!(names.len(), section.fields.len(), "{} repeats a field", section.id);
            assert!(names.iter().all(|n| *n == n.to_lowercase()));
        }
    }

    #[test]
    fn test_shared_fields_agree_on_kind() {
        let sections: Vec<&SectionSpec> = TABS.iter().flat_map(|t| t.sections.iter()).collect();
        for a in &sections {
            for b in &sections {
                for fa in a.fields {
                    if let Some(fb) = b.fields.iter().find(|f| f.name == fa.name) {
                        assert_eq!(fa.kind, fb.kind, "{} differs between {} and {}", fa.name, a.id, b.id);
                        assert_eq!(fa.options, fb.options);
                    }
                }
            }
        }
    }

    #[test]
    fn test_geometry_tab_has_no_form() {
        let geometry: Vec<&TabSpec> = TABS.iter().filter(|t| t.shows_geometry).collect();
        assert_eq!(geometry.len(), 1);
        assert!(geometry[0].sections.is_empty());
        assert!(declared_fields().contains("apex_mapper_link"));
        assert!(!declared_fields().contains("geometry"));
    }

    #[test]
    fn test_selects_have_options() {
        for section in TABS.iter().flat_map(|t| t.sections.iter()) {
            for field in section.fields {
                if field.kind == crate::domain::WidgetKind::Select {
                    assert!(!field.options.is_empty(), "{} has no options", field.name);
                }
            }
        }
        assert_eq!(find_section(IDENTIFICATION).map(|s| s.title), Some("Identification"));
    }
}

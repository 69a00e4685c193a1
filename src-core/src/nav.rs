//! Navigation Parameters
//!
//! Optional `guid` (alias `project`) and `version` read once from the URL
//! query string.

use percent_encoding::percent_decode_str;

use crate::domain::{DisplayMode, ProjectId};

/// Parameters the page was opened with
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavParams {
    pub project: Option<ProjectId>,
    pub mode: DisplayMode,
}

impl NavParams {
    /// Parse `?guid=...&version=...`. Unknown keys are ignored, blank values
    /// count as absent.
    pub fn from_query_string(query: &str) -> Self {
        let mut params = Self::default();
        let query = query.trim_start_matches('?');

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode(value);
            match decode(key).as_str() {
                "project" | "guid" if !value.trim().is_empty() => {
                    params.project = Some(ProjectId::new(value));
                }
                "version" => params.mode = DisplayMode::parse(&value),
                _ => {}
            }
        }
        params
    }
}

fn decode(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    percent_decode_str(&raw).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_parameters_use_defaults() {
        assert_eq!(NavParams::from_query_string(""), NavParams::default());
        assert_eq!(NavParams::from_query_string("?guid=&version="), NavParams::default());
        assert_eq!(NavParams::default().mode, DisplayMode::Edit);
    }

    #[test]
    fn test_guid_is_percent_decoded() {
        let params = NavParams::from_query_string("?guid=%7B1B2C3D4E-0000-4000-8000-ABCDEF012345%7D&version=review");
        assert_eq!(
            params.project,
            Some(ProjectId::new("{1B2C3D4E-0000-4000-8000-ABCDEF012345}"))
        );
        assert_eq!(params.mode, DisplayMode::Review);
    }

    #[test]
    fn test_project_alias_and_edit_version() {
        let params = NavParams::from_query_string("project={G}&version=edit");
        assert_eq!(params.project, Some(ProjectId::new("{G}")));
        assert_eq!(params.mode, DisplayMode::Edit);
    }

    #[test]
    fn test_unknown_version_falls_back() {
        let params = NavParams::from_query_string("version=kiosk&mode=review&other=1");
        assert_eq!(params.mode, DisplayMode::Edit);
        assert!(params.project.is_none());
    }
}

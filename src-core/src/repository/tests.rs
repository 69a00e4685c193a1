//! Repository Integration Tests
//!
//! Full page flows against the in-memory feature service.

#[cfg(test)]
mod tests {
    use crate::binder;
    use crate::config::AppConfig;
    use crate::controller::{PageController, Phase, ProjectChoice};
    use crate::domain::{AttrValue, DisplayMode, GeometryKind, ProjectId, SessionContext, StatusKind};
    use crate::loader::{list_projects, RecordLoader};
    use crate::nav::NavParams;
    use crate::repository::memory::InMemoryFeatureService;
    use crate::repository::{FeatureService, Query};
    use crate::sections::{self, AASHTOWARE, DESCRIPTIONS, FUNDING_PRACTICE, IDENTIFICATION, TIMELINE};
    use serde_json::json;

    const LAYER: &str = "https://services.example.com/arcgis/rest/services/Projects/FeatureServer/0";

    fn setup_config() -> AppConfig {
        AppConfig::from_toml_str(&format!(
            r#"
            projects_layer = "{}"

            [credentials]
            username = "editor"
            password = "secret"
            "#,
            LAYER
        ))
        .expect("Failed to parse config")
    }

    fn setup_service() -> InMemoryFeatureService {
        InMemoryFeatureService::with_features(vec![
            json!({
                "OBJECTID": 101,
                "GlobalID": "{6C1E-SEWARD}",
                "PROJ_NAME": "Seward Hwy MP 5-10",
                "IRIS": "Z531030000",
                "CONSTRUCTION_YEAR": "CY2026",
                "ANTICIPATED_START": "Spring 2026",
                "FUND_TYPE": "FHWA",
                "TENADD": 1715904000000i64,
                "AWARDED_AMOUNT": "TBD",
                "PHASE": "Planning",
                "SHAPE__Length": 8123.4
            }),
            json!({ "OBJECTID": 102, "GlobalID": "{9A2F-GLENN}", "PROJ_NAME": "glenn Hwy Bridge" }),
            json!({ "OBJECTID": 103, "GlobalID": "{0B7D-UNNAMED}", "PROJ_NAME": null }),
        ])
    }

    async fn open_page(service: &InMemoryFeatureService, query_string: &str) -> PageController {
        let config = setup_config();
        let mut page = PageController::new(NavParams::from_query_string(query_string), &config.fields);
        page.load_pending(service, &RecordLoader::for_projects(&config)).await;
        page
    }

    fn stored_text(page: &PageController, field: &str) -> Option<AttrValue> {
        page.session().record(page.namespace()).and_then(|r| r.get(field)).cloned()
    }

    #[tokio::test]
    async fn test_every_call_authenticates() {
        let service = setup_service();
        service.query(LAYER, &Query::all()).await.expect("Query failed");
        service.query(LAYER, &Query::all()).await.expect("Query failed");
        assert_eq!(service.auth_calls.get(), 2);
    }

    #[tokio::test]
    async fn test_project_list_sorted_by_name() {
        let service = setup_service();
        let projects = list_projects(&service, &setup_config()).await.expect("List failed");

        let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["glenn Hwy Bridge", "Seward Hwy MP 5-10", "{0B7D-UNNAMED}"]);
    }

    #[tokio::test]
    async fn test_loader_lowercases_and_keeps_remainder() {
        let service = setup_service();
        let loader = RecordLoader::for_projects(&setup_config());
        let mut session = SessionContext::new(DisplayMode::Edit);
        let ns = crate::domain::Namespace::project();

        let record = loader
            .load(&service, &ProjectId::new("{6C1E-SEWARD}"), &mut session, ns.clone())
            .await
            .expect("Load failed");

        assert_eq!(record.object_id, 101);
        let values = session.record(&ns).expect("Namespace empty");
        assert_eq!(values.get("proj_name"), Some(&AttrValue::Text("Seward Hwy MP 5-10".into())));
        assert!(values.extra().contains_key("shape__length"));
    }

    #[tokio::test]
    async fn test_seward_rename_end_to_end() {
        let service = setup_service();
        let mut page = open_page(&service, "?project=%7B6C1E-SEWARD%7D").await;
        assert_eq!(page.phase(), Phase::Viewing);

        let identification = sections::find_section(IDENTIFICATION).expect("Missing section");
        page.edit(identification, "proj_name", "Seward Hwy MP 5-12");
        page.submit(&service, LAYER, identification).await;

        assert_eq!(page.phase(), Phase::Viewing);
        assert_eq!(stored_text(&page, "proj_name"), Some(AttrValue::Text("Seward Hwy MP 5-12".into())));
        assert_eq!(service.stored(101, "proj_name"), Some(json!("Seward Hwy MP 5-12")));

        let status = page.session().status().expect("No status");
        assert_eq!(status.kind, StatusKind::Success);
        assert_eq!(status.section, Some(IDENTIFICATION));

        let payload = service.last_payload.borrow().clone().expect("No payload sent");
        let mut expected: Vec<String> = identification.fields.iter().map(|f| f.name.to_string()).collect();
        expected.push("objectid".to_string());
        expected.sort();
        assert_eq!(payload.keys(), expected);
    }

    #[tokio::test]
    async fn test_rejected_update_leaves_record_untouched() {
        let service = setup_service();
        let mut page = open_page(&service, "project={6C1E-SEWARD}").await;
        service.script_update(json!({
            "updateResults": [{
                "objectId": 101,
                "success": false,
                "error": { "code": 400, "description": "Invalid field" }
            }]
        }));

        let identification = sections::find_section(IDENTIFICATION).expect("Missing section");
        page.edit(identification, "proj_name", "Seward Hwy MP 5-12");
        page.submit(&service, LAYER, identification).await;

        let status = page.session().status().expect("No status");
        assert_eq!(status.kind, StatusKind::Failure);
        assert!(status.message.contains("Invalid field"));
        assert_eq!(stored_text(&page, "proj_name"), Some(AttrValue::Text("Seward Hwy MP 5-10".into())));

        // the edit survives for a retry
        let fields = page.render_section(identification);
        let name = fields.iter().find(|f| f.descriptor.name == "proj_name").expect("Missing field");
        assert!(name.edited);
        assert_eq!(name.value.as_input_string(), "Seward Hwy MP 5-12");
    }

    #[tokio::test]
    async fn test_aashtoware_values_coerced_on_render() {
        let service = setup_service();
        let page = open_page(&service, "guid={6C1E-SEWARD}").await;
        let aashtoware = sections::find_section(AASHTOWARE).expect("Missing section");

        let fields = page.render_section(aashtoware);
        let value = |name: &str| {
            fields
                .iter()
                .find(|f| f.descriptor.name == name)
                .map(|f| f.value.as_input_string())
                .expect("Missing field")
        };
        assert_eq!(value("tenadd"), "2024-05-17");
        assert_eq!(value("awarded_amount"), "0");
        assert_eq!(value("fund_type"), "FHWA");
        assert_eq!(value("award_date"), "");
    }

    #[tokio::test]
    async fn test_saving_one_field_preserves_stored_values() {
        let service = setup_service();
        let mut page = open_page(&service, "guid={6C1E-SEWARD}").await;
        let identification = sections::find_section(IDENTIFICATION).expect("Missing section");
        let funding = sections::find_section(FUNDING_PRACTICE).expect("Missing section");
        let timeline = sections::find_section(TIMELINE).expect("Missing section");
        let aashtoware = sections::find_section(AASHTOWARE).expect("Missing section");

        page.edit(identification, "phase", "Construction");
        page.submit(&service, LAYER, identification).await;
        page.edit(funding, "proj_prac", "Highways");
        page.submit(&service, LAYER, funding).await;
        page.edit(timeline, "anticipated_end", "Fall 2027");
        page.submit(&service, LAYER, timeline).await;
        page.edit(aashtoware, "contractor", "Granite Construction");
        page.submit(&service, LAYER, aashtoware).await;

        assert_eq!(service.stored(101, "phase"), Some(json!("Construction")));
        assert_eq!(service.stored(101, "construction_year"), Some(json!("CY2026")));
        assert_eq!(service.stored(101, "fund_type"), Some(json!("FHWA")));
        assert_eq!(service.stored(101, "anticipated_start"), Some(json!("Spring 2026")));
        assert_eq!(service.stored(101, "awarded_amount"), Some(json!("TBD")));
        assert_eq!(service.stored(101, "tenadd"), Some(json!(1715904000000i64)));
        assert_eq!(stored_text(&page, "construction_year"), Some(AttrValue::Text("CY2026".into())));
        assert_eq!(page.phase(), Phase::Viewing);
    }

    #[tokio::test]
    async fn test_geometry_stored_with_record() {
        let service = setup_service();
        service.set_geometry(101, json!({
            "paths": [[[-149.44, 60.10], [-149.41, 60.16]]],
            "spatialReference": { "wkid": 4326 }
        }));
        let mut page = open_page(&service, "guid={6C1E-SEWARD}").await;

        let summary = page.geometry_summary().expect("No geometry");
        assert_eq!(summary.kind, GeometryKind::Polyline);
        assert_eq!(summary.vertices, 2);

        page.select(ProjectChoice::Placeholder);
        assert!(page.geometry_summary().is_none());
    }

    #[tokio::test]
    async fn test_sections_submit_independently() {
        let service = setup_service();
        let mut page = open_page(&service, "project={6C1E-SEWARD}").await;
        let identification = sections::find_section(IDENTIFICATION).expect("Missing section");
        let description = sections::find_section(DESCRIPTIONS).expect("Missing section");

        page.edit(identification, "iris", "Z999");
        page.edit(description, "proj_desc", "Resurfacing and guardrail");
        page.submit(&service, LAYER, description).await;

        assert!(page.session().is_editing(IDENTIFICATION));
        assert!(!page.session().is_editing(DESCRIPTIONS));
        assert_eq!(service.stored(101, "iris"), Some(json!("Z531030000")));
        assert_eq!(page.phase(), Phase::Editing(IDENTIFICATION));
    }

    #[tokio::test]
    async fn test_review_version_and_unknown_project() {
        let service = setup_service();
        let page = open_page(&service, "guid=%7BMISSING%7D&version=review").await;

        assert_eq!(page.session().display_mode(), DisplayMode::Review);
        assert_eq!(page.session().display_mode().return_label(), "RETURN TO REVIEW LIST");
        assert_eq!(page.phase(), Phase::NoProject);
        assert!(page.selected_project().is_none());
        assert_eq!(page.session().status().map(|s| s.kind), Some(StatusKind::Warning));
    }

    #[tokio::test]
    async fn test_auth_failure_blocks_page() {
        let mut service = setup_service();
        service.reject_credentials = true;
        let page = open_page(&service, "project={6C1E-SEWARD}").await;

        assert!(page.blocking_error().is_some());
        assert!(!page.tabs_visible());
        assert_eq!(service.query_calls.get(), 0);
    }

    #[tokio::test]
    async fn test_placeholder_after_load_hides_tabs() {
        let service = setup_service();
        let mut page = open_page(&service, "project={9A2F-GLENN}").await;
        assert!(page.tabs_visible());

        page.select(ProjectChoice::from_option_value(""));
        assert!(!page.tabs_visible());
        assert!(page.session().record(page.namespace()).is_none());
    }

    #[tokio::test]
    async fn test_binder_submit_without_controller() {
        let service = setup_service();
        let config = setup_config();
        let loader = RecordLoader::for_projects(&config);
        let mut session = SessionContext::new(DisplayMode::Edit);
        let ns = crate::domain::Namespace::project();
        loader
            .load(&service, &ProjectId::new("{9A2F-GLENN}"), &mut session, ns.clone())
            .await
            .expect("Load failed");

        let identification = sections::find_section(IDENTIFICATION).expect("Missing section");
        binder::capture(identification, &ns, &mut session, "stip", "AK-123");
        let result = binder::on_submit(&service, LAYER, identification, &ns, &mut session, "objectid").await;

        assert!(result.success);
        assert_eq!(service.stored(102, "stip"), Some(json!("AK-123")));
        assert!(!session.is_editing(IDENTIFICATION));
    }
}

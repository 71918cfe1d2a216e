mod test_utils;

#[cfg(test)]
mod tests {
    use std::env;
    use std::sync::Arc;

    use mockito::Matcher;
    use serde_json::{Value, json};
    use serial_test::serial;

    use async_trait::async_trait;

    use appointy::core::{AppConfig, Capability, Permission, Resource};
    use appointy::scheduling::{
        AppointyClient, AvailabilityQuery, BookingLinkRequest, EmployeeCache, EmployeeIdentity,
        Lookup, RosterSource,
    };
    use appointy::tools::{AppointyApi, toolkit};

    use crate::test_utils::{BUSINESS_ID, mock_roster, test_client, test_config};

    const IMPROVED_AVAILABILITY_PATH: &str =
        "/api/v1/appointment/availability/improved-services-employees";

    #[tokio::test]
    async fn it_resolves_staff_for_a_service() {
        let mut server = mockito::Server::new_async().await;
        let (availability, nodes) = mock_roster(&mut server, 1).await;

        // base64({"101":true,"102":false,"103":true})
        let staff = server
            .mock("POST", IMPROVED_AVAILABILITY_PATH)
            .match_body(Matcher::PartialJson(json!({
                "parent": BUSINESS_ID,
                "duration": "1800s",
                "serviceIds": ["svc-42"],
                "consumerId": "consumer-1"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"employeeIds": "eyIxMDEiOnRydWUsIjEwMiI6ZmFsc2UsIjEwMyI6dHJ1ZX0="}"#)
            .expect(2)
            .create_async()
            .await;

        let client = test_client(&server.url());
        for _ in 0..2 {
            let lookup = client.get_staff_info("svc-42", "1800s").await.unwrap();
            assert_eq!(
                lookup,
                Lookup::Resolved {
                    items: vec![String::from("Ada Lovelace"), String::from("Grace Hopper")]
                }
            );
        }

        // The roster is only fetched once for the life of the client
        staff.assert_async().await;
        availability.assert_async().await;
        nodes.assert_async().await;
    }

    #[tokio::test]
    async fn it_refetches_roster_after_invalidation() {
        let mut server = mockito::Server::new_async().await;
        let (availability, nodes) = mock_roster(&mut server, 2).await;

        let client = test_client(&server.url());
        assert_eq!(
            client.resolve_employee_id("Grace Hopper").await.unwrap(),
            Some(String::from("103"))
        );
        client.invalidate_employee_cache().await;
        assert_eq!(
            client.resolve_employee_id("Alan Turing").await.unwrap(),
            Some(String::from("102"))
        );
        assert_eq!(client.resolve_employee_id("Nobody").await.unwrap(), None);

        availability.assert_async().await;
        nodes.assert_async().await;
    }

    struct StaticRoster;

    #[async_trait]
    impl RosterSource for StaticRoster {
        async fn load_roster(&self) -> appointy::core::Result<Vec<EmployeeIdentity>> {
            Ok(vec![
                EmployeeIdentity::new("101", "Ada Lovelace"),
                EmployeeIdentity::new("103", "Grace Hopper"),
            ])
        }
    }

    #[tokio::test]
    async fn it_resolves_staff_from_an_injected_roster() {
        let mut server = mockito::Server::new_async().await;
        let graphql = server
            .mock("POST", "/graphql")
            .expect(0)
            .create_async()
            .await;
        // base64({"101":true,"102":false,"103":true})
        let _staff = server
            .mock("POST", IMPROVED_AVAILABILITY_PATH)
            .with_status(200)
            .with_body(r#"{"employeeIds": "eyIxMDEiOnRydWUsIjEwMiI6ZmFsc2UsIjEwMyI6dHJ1ZX0="}"#)
            .create_async()
            .await;

        let client = AppointyClient::with_employee_cache(
            &test_config(&server.url()),
            EmployeeCache::new(StaticRoster),
        )
        .unwrap();
        assert!(client.employees().is_empty().await);

        let lookup = client.get_staff_info("svc-42", "1800s").await.unwrap();
        assert_eq!(lookup.into_items(), vec!["Ada Lovelace", "Grace Hopper"]);
        assert_eq!(client.employees().len().await, 2);
        graphql.assert_async().await;
    }

    #[tokio::test]
    async fn it_labels_staff_missing_from_roster() {
        let mut server = mockito::Server::new_async().await;
        let _roster = mock_roster(&mut server, 1).await;

        // base64({"101":true,"999":true})
        let _staff = server
            .mock("POST", IMPROVED_AVAILABILITY_PATH)
            .with_status(200)
            .with_body(r#"{"employeeIds": "eyIxMDEiOnRydWUsIjk5OSI6dHJ1ZX0="}"#)
            .create_async()
            .await;

        let lookup = test_client(&server.url())
            .get_staff_info("svc-42", "1800s")
            .await
            .unwrap();
        assert_eq!(
            lookup.into_items(),
            vec![String::from("Ada Lovelace"), String::from("Unknown (999)")]
        );
    }

    #[tokio::test]
    async fn it_lists_available_slots() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"id": "CalendarPageQuery"})))
            .with_status(200)
            .with_body(
                r#"{"data": {"calendarPage": {"slots": [
                    {"slotType": "Available", "timeSlot": {"start": "09:00", "end": "09:30"}},
                    {"slotType": "Blocked", "timeSlot": {"start": "09:30", "end": "10:00"}}
                ]}}}"#,
            )
            .create_async()
            .await;

        let query = AvailabilityQuery {
            service_ids: ["svc-42".to_string()].into(),
            start: String::from("2024-01-01"),
            end: String::from("2024-01-01"),
            ..Default::default()
        };
        let lookup = test_client(&server.url())
            .get_available_slots(&query)
            .await
            .unwrap();
        assert_eq!(lookup.into_items(), vec![String::from("09:00 - 09:30")]);
    }

    #[tokio::test]
    async fn it_requires_a_booking_link_without_calling_backend() {
        let mut server = mockito::Server::new_async().await;
        let any = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let mut config = test_config(&server.url());
        config.booking_link = None;
        let client = AppointyClient::new(&config).unwrap();
        let err = client
            .generate_booking_link(&BookingLinkRequest {
                date: String::from("2024-01-01"),
                time: String::from("09:00"),
                service_id: String::from("svc-42"),
                employee_id: String::from("101"),
            })
            .unwrap_err();
        assert!(err.is_configuration());
        any.assert_async().await;
    }

    #[tokio::test]
    async fn it_only_exposes_granted_tools() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/services:all")
            .match_query(Matcher::UrlEncoded("parent".into(), BUSINESS_ID.into()))
            .with_status(200)
            .with_body(r#"{"services": [{"id": "svc-42", "title": "Haircut", "duration": ["1800s"]}]}"#)
            .create_async()
            .await;

        let mut config = test_config(&server.url());
        config.actions = "services:read".parse().unwrap();
        let api = Arc::new(AppointyApi::new(test_client(&server.url())));
        let tools = toolkit(api, &config.actions);

        let names: Vec<String> = tools.iter().map(|t| t.function_name()).collect();
        assert_eq!(names, vec!["list_services", "get_service_info"]);
        assert!(
            config
                .actions
                .allows(&Permission::new(Resource::Services, Capability::Read))
        );

        let out: Value = serde_json::from_str(&tools[0].call("{}").await.unwrap()).unwrap();
        assert_eq!(out[0]["title"], "Haircut");
    }

    #[test]
    #[serial]
    fn it_loads_config_from_env() {
        unsafe {
            env::set_var("APPOINTY_API_KEY", "secret");
            env::set_var("APPOINTY_BUSINESS_ID", BUSINESS_ID);
            env::set_var("APPOINTY_ACTIONS", "appointments:read, booking:create");
        }
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.context.business_scope().unwrap().group(), "g1");
        assert!(
            config
                .actions
                .allows(&Permission::new(Resource::Booking, Capability::Create))
        );
        assert!(
            !config
                .actions
                .allows(&Permission::new(Resource::Appointments, Capability::Create))
        );

        unsafe {
            env::remove_var("APPOINTY_API_KEY");
            env::remove_var("APPOINTY_BUSINESS_ID");
            env::remove_var("APPOINTY_ACTIONS");
        }
        assert!(AppConfig::from_env().unwrap_err().is_configuration());
    }
}

use milstat::data::CountryTable;
use milstat::server::routes::route_request;

fn table() -> CountryTable {
    CountryTable::builtin().expect("builtin table should load")
}

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("response should be valid json")
}

#[test]
fn health_endpoint_returns_ok_json() {
    let response = route_request(&table(), "GET", "/api/health", "");
    assert_eq!(response.status_code, 200);
    assert_eq!(response.content_type, "application/json");
    assert!(response.body.contains("\"status\": \"ok\""));
    assert_eq!(json(&response.body)["countries"], 8);
}

#[test]
fn countries_endpoint_lists_table_order() {
    let response = route_request(&table(), "GET", "/api/countries", "");
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    let names: Vec<&str> = payload["countries"]
        .as_array()
        .expect("countries should be an array")
        .iter()
        .filter_map(|entry| entry["name"].as_str())
        .collect();
    assert_eq!(names.first(), Some(&"United States"));
    assert_eq!(names.len(), 8);
    assert_eq!(payload["dataVersion"], "2023.1");
}

#[test]
fn country_endpoint_decodes_names() {
    let response = route_request(&table(), "GET", "/api/countries/South%20Korea", "");
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    assert_eq!(payload["name"], "South Korea");
    assert!(payload.get("submarines").is_none());

    let missing = route_request(&table(), "GET", "/api/countries/Atlantis", "");
    assert_eq!(missing.status_code, 404);
    assert_eq!(json(&missing.body)["status"], "error");
}

#[test]
fn view_endpoint_returns_rows_in_selection_order() {
    let response = route_request(
        &table(),
        "GET",
        "/api/views/personnel?countries=United+States,India",
        "",
    );
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    assert_eq!(payload["category"], "personnel");
    let rows = payload["rows"].as_array().expect("rows should be an array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "United States");
    assert_eq!(rows[0]["perCapita"], "4061.48");
    assert_eq!(rows[1]["name"], "India");
}

#[test]
fn overview_truncation_is_reported() {
    let response = route_request(
        &table(),
        "GET",
        "/api/views/overview?countries=China,Russia,India,France",
        "",
    );
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    assert_eq!(payload["rows"].as_array().map(Vec::len), Some(3));
    let notes = payload["notes"].as_array().expect("notes should be an array");
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["policy"], "truncated");
    assert_eq!(notes[0]["dropped"][0], "France");
}

#[test]
fn history_view_honors_ascending_order() {
    let response = route_request(
        &table(),
        "GET",
        "/api/views/history-budget?countries=United+States&countries=Japan&order=ascending",
        "",
    );
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    let years: Vec<i64> = payload["rows"]
        .as_array()
        .expect("rows should be an array")
        .iter()
        .filter_map(|row| row["year"].as_i64())
        .collect();
    assert_eq!(years, vec![2016, 2017, 2018, 2019, 2020, 2021, 2022]);
}

#[test]
fn view_endpoint_rejects_unknown_category_and_country() {
    let bad_category = route_request(&table(), "GET", "/api/views/logistics?countries=China", "");
    assert_eq!(bad_category.status_code, 400);

    let bad_country = route_request(&table(), "GET", "/api/views/budget?countries=Narnia", "");
    assert_eq!(bad_country.status_code, 404);
    assert!(bad_country.body.contains("Narnia"));

    let duplicate = route_request(&table(), "GET", "/api/views/budget?countries=China,China", "");
    assert_eq!(duplicate.status_code, 400);
}

#[test]
fn projections_endpoint_returns_four_years() {
    let response = route_request(&table(), "GET", "/api/projections", "");
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    let rows = payload["rows"].as_array().expect("rows should be an array");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[2]["year"], 2030);
    assert_eq!(rows[2]["ChinaBudget"].as_f64(), Some(736.0));
}

#[test]
fn randomized_equipment_echoes_seed_and_reproduces() {
    let target = "/api/equipment?countries=China&mode=randomized&seed=42";
    let first = route_request(&table(), "GET", target, "");
    let second = route_request(&table(), "GET", target, "");
    assert_eq!(first.status_code, 200);
    assert_eq!(first.body, second.body);

    let payload = json(&first.body);
    assert_eq!(payload["seed"], 42);
    assert_eq!(payload["estimates"].as_array().map(Vec::len), Some(6));
}

#[test]
fn equipment_endpoint_rejects_unknown_mode() {
    let response = route_request(&table(), "GET", "/api/equipment?countries=China&mode=chaos", "");
    assert_eq!(response.status_code, 400);
}

#[test]
fn rankings_endpoint_ranks_tanks() {
    let response = route_request(&table(), "GET", "/api/rankings?category=tanks", "");
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    let ranking = payload["ranking"].as_array().expect("ranking should be an array");
    assert_eq!(ranking[0]["country"], "Russia");
    assert_eq!(ranking[0]["rank"], 1);

    let missing = route_request(&table(), "GET", "/api/rankings", "");
    assert_eq!(missing.status_code, 400);
}

#[test]
fn equipment_history_endpoint_requires_country() {
    let ok = route_request(
        &table(),
        "GET",
        "/api/equipment/history?country=United%20States&category=ships",
        "",
    );
    assert_eq!(ok.status_code, 200);
    assert_eq!(json(&ok.body)["series"].as_array().map(Vec::len), Some(5));

    let missing = route_request(&table(), "GET", "/api/equipment/history?category=ships", "");
    assert_eq!(missing.status_code, 400);
}

#[test]
fn refresh_then_export_carries_stamp() {
    let refresh = route_request(&table(), "POST", "/api/refresh", "");
    assert_eq!(refresh.status_code, 200);
    assert!(json(&refresh.body)["lastUpdated"].as_str().is_some());

    let body = r#"{"countries":["China","Japan"],"viewMode":"compare","category":"nuclear"}"#;
    let export = route_request(&table(), "POST", "/api/export", body);
    assert_eq!(export.status_code, 200);
    let payload = json(&export.body);
    assert_eq!(payload["category"], "nuclear");
    assert_eq!(payload["viewMode"], "compare");
    assert!(payload["lastRefreshed"].as_str().is_some());
    assert_eq!(payload["view"]["rows"].as_array().map(Vec::len), Some(2));
}

#[test]
fn export_rejects_malformed_body() {
    let response = route_request(&table(), "POST", "/api/export", "{not json");
    assert_eq!(response.status_code, 400);
    assert!(response.body.contains("Invalid request body"));
}

#[test]
fn unknown_route_returns_not_found() {
    let response = route_request(&table(), "GET", "/api/launch-codes", "");
    assert_eq!(response.status_code, 404);
    assert!(response.body.contains("Route not found"));
}

#[test]
fn index_page_is_html() {
    let response = route_request(&table(), "GET", "/", "");
    assert_eq!(response.status_code, 200);
    assert!(response.content_type.starts_with("text/html"));
}

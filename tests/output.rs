//! Delivery tests: stdout text, output files and JSON snapshots

use chrono::{DateTime, Local, TimeZone};
use cthru_cli::api::{
    ClientConfig, CthruClient, DatasetFilters, FilterSpec, PayrollFilters, ResultSet,
    SpendingFilters, build_params, constants,
};
use cthru_cli::auth::Credentials;
use cthru_cli::commands::query::run_command;
use cthru_cli::datasets;
use cthru_cli::output::{
    Delivery, DeliveryReport, OutputFormat, OutputOptions, QueryLinks, deliver, render,
    snapshot_filename,
};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn fetched_at() -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
}

fn payroll_rows() -> ResultSet {
    ResultSet::from_json(json!([
        {"name_first": "JANE", "name_last": "DOE", "pay_total_actual": "150000.00", "year": "2025"},
        {"name_first": "JOHN", "name_last": "ROE", "pay_total_actual": "120000.00", "year": "2025"}
    ]))
    .unwrap()
}

fn payroll_spec() -> FilterSpec {
    FilterSpec::payroll(PayrollFilters {
        year: Some(2025),
        department: Some("State Police".to_string()),
        ..Default::default()
    })
}

/// Run `deliver` for `result` and return the printed text
fn deliver_to_string(
    result: &ResultSet,
    spec: &FilterSpec,
    options: &OutputOptions,
    snapshot_dir: &std::path::Path,
) -> (String, DeliveryReport) {
    colored::control::set_override(false);

    let dataset = spec.dataset();
    let params = build_params(spec);
    let rendered = render(result, options.format, dataset.default_columns);
    let links = QueryLinks::new(constants::DEFAULT_BASE_URL, dataset, &params);

    let mut out = Vec::new();
    let report = deliver(
        &mut out,
        &Delivery {
            result,
            rendered: &rendered,
            spec,
            options,
            links: &links,
            snapshot_dir,
            fetched_at: fetched_at(),
        },
    )
    .unwrap();

    (String::from_utf8(out).unwrap(), report)
}

#[test]
fn test_snapshot_contents() {
    let dir = tempfile::tempdir().unwrap();
    let options = OutputOptions {
        save_snapshot: true,
        ..Default::default()
    };

    let (text, report) = deliver_to_string(&payroll_rows(), &payroll_spec(), &options, dir.path());

    let path = report.snapshot_path.unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "payroll_fy2025_State_Police_20250102_030405.json"
    );
    assert!(text.starts_with(&format!("JSON saved to {}\n", path.display())));

    let snapshot: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(snapshot["record_count"], 2);
    assert_eq!(snapshot["data"].as_array().unwrap().len(), 2);
    assert_eq!(snapshot["data"][0]["name_last"], "DOE");
    assert_eq!(
        snapshot["portal_url"],
        "https://cthru.data.socrata.com/d/9ttk-7vz6"
    );
    let api_url = snapshot["api_url"].as_str().unwrap();
    assert!(api_url.starts_with("https://cthru.data.socrata.com/resource/9ttk-7vz6.json?%24where="));
    assert!(!api_url.contains("%24limit"));

    let timestamp = snapshot["query_timestamp"].as_str().unwrap();
    assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
    assert!(timestamp.starts_with("2025-01-02T03:04:05"));
}

#[test]
fn test_output_file_suppresses_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("payroll.csv");
    let options = OutputOptions {
        format: OutputFormat::Csv,
        output_path: Some(output_path.clone()),
        ..Default::default()
    };

    let (text, report) = deliver_to_string(&payroll_rows(), &payroll_spec(), &options, dir.path());

    assert_eq!(
        text,
        format!("Results saved to {} (2 records)\n", output_path.display())
    );
    assert_eq!(report.output_path.as_deref(), Some(output_path.as_path()));
    assert!(report.snapshot_path.is_none());

    let written = std::fs::read_to_string(&output_path).unwrap();
    assert!(written.starts_with("name_first,name_last,pay_total_actual,year\nJANE,DOE,"));
    assert!(!written.contains("records ---"));
}

#[test]
fn test_stdout_rendering_ends_with_count() {
    let dir = tempfile::tempdir().unwrap();
    let (text, _) = deliver_to_string(
        &payroll_rows(),
        &payroll_spec(),
        &OutputOptions::default(),
        dir.path(),
    );

    assert!(text.starts_with("name_first | name_last"));
    assert!(text.ends_with("\n\n--- 2 records ---\n"));
}

#[test]
fn test_empty_result_policy() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("never.json");
    let options = OutputOptions {
        format: OutputFormat::Json,
        output_path: Some(output_path.clone()),
        show_url: true,
        save_snapshot: true,
    };
    let spec = FilterSpec::spending(SpendingFilters {
        vendor: Some("NOBODY".to_string()),
        ..Default::default()
    });

    let (text, report) = deliver_to_string(&ResultSet::default(), &spec, &options, dir.path());

    let snapshot_path = report.snapshot_path.unwrap();
    let snapshot: Value =
        serde_json::from_str(&std::fs::read_to_string(&snapshot_path).unwrap()).unwrap();
    assert_eq!(snapshot["record_count"], 0);
    assert_eq!(snapshot["data"], json!([]));

    assert!(!output_path.exists());
    assert!(report.output_path.is_none());

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[1], "No results found.");
    assert!(!text.contains("records ---"));
    assert!(text.contains("View in browser: https://cthru.data.socrata.com/resource/pegc-naaa.json"));
}

#[test]
fn test_snapshot_filename_for_revenue_search() {
    let spec = FilterSpec::new(DatasetFilters::Revenue).with_search("motor fuel/excise");
    assert_eq!(
        snapshot_filename(&spec, &fetched_at()),
        "revenue_motor_fuel_excise_20250102_030405.json"
    );
}

#[tokio::test]
async fn test_run_command_end_to_end() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let n = socket.read(&mut buf).await.unwrap();
        let body = r#"[{"vendor":"W. B. MASON CO INC","department":"TRIAL COURT","amount":"18.00","date":"2024-01-05T00:00:00.000","budget_fiscal_year":"2024"}]"#;
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        String::from_utf8_lossy(&buf[..n]).to_string()
    });

    colored::control::set_override(false);
    let client = CthruClient::new(
        ClientConfig {
            base_url: format!("http://{}", addr),
            ..Default::default()
        },
        &Credentials::default(),
    )
    .unwrap();

    let spec = FilterSpec::spending(SpendingFilters {
        vendor: Some("W. B MASON".to_string()),
        year: Some("2024".to_string()),
        ..Default::default()
    });
    let options = OutputOptions {
        show_url: true,
        ..Default::default()
    };
    let dir = tempfile::tempdir().unwrap();

    let mut out = Vec::new();
    let report = run_command(&mut out, &client, &spec, &options, dir.path())
        .await
        .unwrap();
    assert_eq!(report, DeliveryReport::default());

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("vendor             | department  | amount | date"));
    assert!(text.contains("--- 1 records ---"));
    assert!(text.contains(&format!(
        "               Portal: http://{}/d/{}",
        addr,
        datasets::find("spending").unwrap().id
    )));

    let request = server.await.unwrap();
    assert!(request.contains(
        "%24where=budget_fiscal_year%20%3D%20%272024%27%20AND%20upper%28vendor%29%20like%20upper%28%27%25W.%20B%20MASON%25%27%29"
    ));
}

use anyhow::Result;
use caminhar_client::app::render::OutputFormat;
use caminhar_client::core::SessionStore;
use caminhar_client::domain::filter::{DateWindow, RecordFilter};
use caminhar_client::domain::forms::RecordForm;
use caminhar_client::{ApiClient, App, CaminharError, MemorySessionStore, Session};
use chrono::NaiveDate;
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

async fn logged_in_app(server: &MockServer) -> App<MemorySessionStore> {
    let client = ApiClient::new(&server.base_url(), Duration::from_secs(5)).unwrap();
    let store = MemorySessionStore::new();
    store.save(&Session::new("tok")).await.unwrap();
    App::new(client, store, OutputFormat::Json).with_today(today())
}

#[tokio::test]
async fn test_list_records_within_last_week() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/registro-consultas")
            .header("Authorization", "Bearer tok");
        then.status(200).json_body(json!([
            {"id": 1, "consulta": "Retorno", "sintomas": "Tosse", "diagnostico": "Gripe",
             "exames": "", "dataRegistro": "2024-06-10"},
            {"id": 2, "consulta": "Consulta Neurológica", "sintomas": "Cefaleia",
             "diagnostico": "Enxaqueca", "exames": "Ressonância", "dataRegistro": "2024-06-05"},
            {"id": 3, "consulta": "Retorno", "sintomas": "Febre", "diagnostico": "Dengue",
             "exames": "Hemograma", "dataRegistro": "2024-04-01"}
        ]));
    });

    let app = logged_in_app(&server).await;
    let filter = RecordFilter {
        search: String::new(),
        window: DateWindow::LastWeek,
    };
    let output = app.list_records(&filter).await?;
    let listed: Vec<serde_json::Value> = serde_json::from_str(&output)?;
    let ids: Vec<i64> = listed.iter().filter_map(|r| r["id"].as_i64()).collect();
    assert_eq!(ids, vec![1, 2]);

    let filter = RecordFilter {
        search: "dengue".to_string(),
        window: DateWindow::All,
    };
    let output = app.list_records(&filter).await?;
    let listed: Vec<serde_json::Value> = serde_json::from_str(&output)?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], 3);
    Ok(())
}

#[tokio::test]
async fn test_create_record_defaults_date_to_today() -> Result<()> {
    let server = MockServer::start();
    let create_mock = server.mock(|when, then| {
        when.method(POST).path("/registro-consultas").json_body(json!({
            "consulta": "Retorno",
            "sintomas": "Tosse",
            "diagnostico": "Gripe",
            "exames": "Raio-X",
            "dataRegistro": "2024-06-10"
        }));
        then.status(200).json_body(json!({
            "id": 9, "consulta": "Retorno", "sintomas": "Tosse", "diagnostico": "Gripe",
            "exames": "Raio-X", "dataRegistro": "2024-06-10"
        }));
    });

    let app = logged_in_app(&server).await;
    app.create_record(RecordForm {
        visit_type: "Retorno".to_string(),
        symptoms: "Tosse".to_string(),
        diagnosis: "Gripe".to_string(),
        exams: "Raio-X".to_string(),
        recorded_on: None,
    })
    .await?;

    create_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_update_record_keeps_existing_fields() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/registro-consultas/4");
        then.status(200).json_body(json!({
            "id": 4, "consulta": "Retorno", "sintomas": "Tosse", "diagnostico": "Gripe",
            "exames": "Raio-X", "dataRegistro": "2024-05-01"
        }));
    });
    let update_mock = server.mock(|when, then| {
        when.method(PUT).path("/registro-consultas/4").json_body(json!({
            "consulta": "Retorno",
            "sintomas": "Tosse",
            "diagnostico": "Pneumonia",
            "exames": "Raio-X",
            "dataRegistro": "2024-05-01"
        }));
        then.status(200).json_body(json!({
            "id": 4, "consulta": "Retorno", "sintomas": "Tosse", "diagnostico": "Pneumonia",
            "exames": "Raio-X", "dataRegistro": "2024-05-01"
        }));
    });

    let app = logged_in_app(&server).await;
    let mut form = app.record_form(4).await?;
    form.diagnosis = "Pneumonia".to_string();
    app.update_record(4, form).await?;

    update_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_dashboard_stats() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/dashboard/stats")
            .header("Authorization", "Bearer tok");
        then.status(200)
            .json_body(json!({"totalPacientes": 42, "prontuariosHoje": 3, "novosRegistros": 17}));
    });

    let app = logged_in_app(&server).await;
    let output = app.stats().await?;
    let stats: serde_json::Value = serde_json::from_str(&output)?;
    assert_eq!(stats["totalPacientes"], 42);
    assert_eq!(stats["novosRegistros"], 17);
    Ok(())
}

#[tokio::test]
async fn test_missing_session_fails_without_request() -> Result<()> {
    let server = MockServer::start();
    let stats_mock = server.mock(|when, then| {
        when.method(GET).path("/dashboard/stats");
        then.status(200).json_body(json!({}));
    });

    let client = ApiClient::new(&server.base_url(), Duration::from_secs(5))?;
    let app = App::new(client, MemorySessionStore::new(), OutputFormat::Table);
    let err = app.stats().await.unwrap_err();

    assert!(matches!(err, CaminharError::NotAuthenticated));
    assert_eq!(stats_mock.hits(), 0);
    assert!(app.store().load().await?.is_none());
    Ok(())
}

use crate::core::session::Session;
use crate::core::ConfigProvider;
use crate::domain::model::{
    ConsultationRecord, Credentials, DashboardStats, Patient, PatientPayload, RecordPayload,
    Registration, TokenResponse,
};
use crate::utils::error::{CaminharError, Result};
use crate::utils::validation::validate_url;
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const PATIENTS: &str = "/pacientes";
const RECORDS: &str = "/registro-consultas";

/// Caminhar REST API 客戶端；每個操作只發出一個請求，不重試
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        validate_url("api.base_url", base_url)?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.base_url(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, session: Option<&Session>) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!("➡️  {} {}", method, url);

        let request = self.client.request(method, url);
        match session {
            Some(session) => request.header(header::AUTHORIZATION, session.bearer()),
            None => request,
        }
    }

    // ---- 認證 ----

    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let response = self
            .request(Method::POST, "/auth/login", None)
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            tracing::warn!("Login rejected for '{}' (HTTP {})", credentials.login, status);
            return Err(CaminharError::LoginRejected {
                status: status.as_u16(),
            });
        }

        let token: TokenResponse = Self::ensure_success(response).await?.json().await?;
        tracing::info!("🔑 Logged in as '{}'", credentials.login);
        Ok(Session::new(token.token))
    }

    /// 伺服器回傳純文字訊息
    pub async fn register(&self, registration: &Registration) -> Result<String> {
        let response = self
            .request(Method::POST, "/auth/register", None)
            .json(registration)
            .send()
            .await?;

        let message = Self::ensure_success(response).await?.text().await?;
        tracing::info!("👤 Registered user '{}' ({:?})", registration.login, registration.role);
        Ok(message)
    }

    // ---- 儀表板 ----

    pub async fn dashboard_stats(&self, session: &Session) -> Result<DashboardStats> {
        self.fetch(Method::GET, "/dashboard/stats", session).await
    }

    // ---- 病患 ----

    /// 後端沒有 `GET /pacientes/{id}`，單筆查詢也走這個列表
    pub async fn list_patients(&self, session: &Session) -> Result<Vec<Patient>> {
        let patients: Vec<Option<Patient>> = self.fetch(Method::GET, PATIENTS, session).await?;
        let total = patients.len();
        let patients = keep_listed(patients, |p| p.id);
        tracing::debug!("Loaded {} patients ({} discarded)", patients.len(), total - patients.len());
        Ok(patients)
    }

    pub async fn create_patient(&self, session: &Session, payload: &PatientPayload) -> Result<Patient> {
        let patient: Patient = self.send(Method::POST, PATIENTS, session, payload).await?;
        tracing::info!("✅ Patient {} created", patient.id);
        Ok(patient)
    }

    pub async fn update_patient(
        &self,
        session: &Session,
        id: i64,
        payload: &PatientPayload,
    ) -> Result<Patient> {
        let patient: Patient = self
            .send(Method::PUT, &format!("{}/{}", PATIENTS, id), session, payload)
            .await?;
        tracing::info!("✅ Patient {} updated", id);
        Ok(patient)
    }

    pub async fn delete_patient(&self, session: &Session, id: i64) -> Result<()> {
        self.delete(&format!("{}/{}", PATIENTS, id), session).await?;
        tracing::info!("🗑️  Patient {} deleted", id);
        Ok(())
    }

    // ---- 就診紀錄 ----

    pub async fn list_records(&self, session: &Session) -> Result<Vec<ConsultationRecord>> {
        let records: Vec<Option<ConsultationRecord>> =
            self.fetch(Method::GET, RECORDS, session).await?;
        Ok(keep_listed(records, |r| r.id))
    }

    pub async fn get_record(&self, session: &Session, id: i64) -> Result<ConsultationRecord> {
        self.fetch(Method::GET, &format!("{}/{}", RECORDS, id), session)
            .await
    }

    pub async fn create_record(
        &self,
        session: &Session,
        payload: &RecordPayload,
    ) -> Result<ConsultationRecord> {
        let record: ConsultationRecord = self.send(Method::POST, RECORDS, session, payload).await?;
        tracing::info!("✅ Record {} created", record.id);
        Ok(record)
    }

    pub async fn update_record(
        &self,
        session: &Session,
        id: i64,
        payload: &RecordPayload,
    ) -> Result<ConsultationRecord> {
        let record: ConsultationRecord = self
            .send(Method::PUT, &format!("{}/{}", RECORDS, id), session, payload)
            .await?;
        tracing::info!("✅ Record {} updated", id);
        Ok(record)
    }

    pub async fn delete_record(&self, session: &Session, id: i64) -> Result<()> {
        self.delete(&format!("{}/{}", RECORDS, id), session).await?;
        tracing::info!("🗑️  Record {} deleted", id);
        Ok(())
    }

    // ---- 共用 ----

    async fn fetch<T: DeserializeOwned>(&self, method: Method, path: &str, session: &Session) -> Result<T> {
        let response = self.request(method, path, Some(session)).send().await?;
        Self::read_json(response).await
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        session: &Session,
        body: &B,
    ) -> Result<T> {
        let response = self
            .request(method, path, Some(session))
            .json(body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn delete(&self, path: &str, session: &Session) -> Result<()> {
        let response = self.request(Method::DELETE, path, Some(session)).send().await?;
        Self::ensure_authorized(response).await?;
        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::ensure_authorized(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn ensure_authorized(response: Response) -> Result<Response> {
        let status = response.status();
        tracing::debug!("⬅️  HTTP {}", status);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(CaminharError::Unauthorized {
                status: status.as_u16(),
            });
        }
        Self::ensure_success(response).await
    }

    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!("❌ API error: HTTP {} - {}", status, body);
        Err(CaminharError::ApiError {
            status: status.as_u16(),
            body,
        })
    }
}

// 列表中的 null 與 id <= 0 的項目直接略過
fn keep_listed<T>(items: Vec<Option<T>>, id: impl Fn(&T) -> i64) -> Vec<T> {
    items
        .into_iter()
        .flatten()
        .filter(|item| id(item) > 0)
        .collect()
}

use crate::app::render::{render_list, render_one, OutputFormat};
use crate::core::client::ApiClient;
use crate::core::session::Session;
use crate::core::SessionStore;
use crate::domain::cpf;
use crate::domain::filter::{PatientFilter, RecordFilter};
use crate::domain::forms::{LoginForm, PatientForm, RecordForm, RegisterForm};
use crate::domain::mask;
use crate::domain::model::Patient;
use crate::utils::error::{CaminharError, Result};
use chrono::{Local, NaiveDate};

/// 每個操作對應一個使用者動作：驗證表單、呼叫 API、產生輸出文字
pub struct App<S: SessionStore> {
    client: ApiClient,
    store: S,
    format: OutputFormat,
    today: NaiveDate,
}

impl<S: SessionStore> App<S> {
    pub fn new(client: ApiClient, store: S, format: OutputFormat) -> Self {
        Self {
            client,
            store,
            format,
            today: Local::now().date_naive(),
        }
    }

    /// 固定「今天」，供年齡與日期篩選使用
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn session(&self) -> Result<Session> {
        self.store
            .load()
            .await?
            .ok_or(CaminharError::NotAuthenticated)
    }

    // 伺服器拒絕 token 時清除本地 session
    async fn guard<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if e.invalidates_session() {
                tracing::warn!("🔒 Session rejected by server, clearing stored token");
                self.store.clear().await?;
            }
        }
        result
    }

    pub async fn login(&self, form: LoginForm) -> Result<String> {
        let credentials = form.into_credentials()?;
        let session = self.client.login(&credentials).await?;
        self.store.save(&session).await?;
        Ok(format!("✅ Sessão iniciada como {}", credentials.login))
    }

    pub async fn logout(&self) -> Result<String> {
        self.store.clear().await?;
        Ok("👋 Sessão encerrada".to_string())
    }

    pub async fn register(&self, form: RegisterForm) -> Result<String> {
        let registration = form.into_registration()?;
        let message = self.client.register(&registration).await?;
        if message.trim().is_empty() {
            Ok(format!("✅ Usuário {} criado com sucesso", registration.login))
        } else {
            Ok(format!("✅ {}", message.trim()))
        }
    }

    pub async fn stats(&self) -> Result<String> {
        let session = self.session().await?;
        let stats = self.guard(self.client.dashboard_stats(&session).await).await?;
        render_one(&stats, self.format, self.today)
    }

    // ---- 病患 ----

    pub async fn list_patients(&self, filter: &PatientFilter) -> Result<String> {
        let session = self.session().await?;
        let patients = self.guard(self.client.list_patients(&session).await).await?;
        let shown = filter.apply(&patients, self.today);
        tracing::debug!("Showing {} of {} patients", shown.len(), patients.len());
        render_list(&shown, self.format, self.today)
    }

    // 從列表中取出指定病患
    async fn find_patient(&self, id: i64) -> Result<Patient> {
        let session = self.session().await?;
        let patients = self.guard(self.client.list_patients(&session).await).await?;
        patients
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(CaminharError::NotFound {
                resource: "Paciente",
                id,
            })
    }

    pub async fn show_patient(&self, id: i64) -> Result<String> {
        let patient = self.find_patient(id).await?;
        render_one(&patient, self.format, self.today)
    }

    /// 取得現有病患並轉成可編輯的表單
    pub async fn patient_form(&self, id: i64) -> Result<PatientForm> {
        let patient = self.find_patient(id).await?;
        Ok(PatientForm::from_patient(&patient))
    }

    pub async fn create_patient(&self, form: PatientForm) -> Result<String> {
        let payload = form.to_payload_on(self.today)?;
        let session = self.session().await?;
        let patient = self
            .guard(self.client.create_patient(&session, &payload).await)
            .await?;
        render_one(&patient, self.format, self.today)
    }

    /// CEP 未填時送出空字串
    pub async fn update_patient(&self, id: i64, form: PatientForm) -> Result<String> {
        let payload = form.to_update_payload_on(self.today)?;
        let session = self.session().await?;
        let patient = self
            .guard(self.client.update_patient(&session, id, &payload).await)
            .await?;
        render_one(&patient, self.format, self.today)
    }

    pub async fn delete_patient(&self, id: i64) -> Result<String> {
        let session = self.session().await?;
        self.guard(self.client.delete_patient(&session, id).await)
            .await?;
        Ok(format!("🗑️  Paciente {} excluído", id))
    }

    // ---- 就診紀錄 ----

    pub async fn list_records(&self, filter: &RecordFilter) -> Result<String> {
        let session = self.session().await?;
        let records = self.guard(self.client.list_records(&session).await).await?;
        let shown = filter.apply(&records, self.today);
        render_list(&shown, self.format, self.today)
    }

    pub async fn show_record(&self, id: i64) -> Result<String> {
        let session = self.session().await?;
        let record = self.guard(self.client.get_record(&session, id).await).await?;
        render_one(&record, self.format, self.today)
    }

    pub async fn record_form(&self, id: i64) -> Result<RecordForm> {
        let session = self.session().await?;
        let record = self.guard(self.client.get_record(&session, id).await).await?;
        Ok(RecordForm::from_record(&record))
    }

    pub async fn create_record(&self, form: RecordForm) -> Result<String> {
        let payload = form.to_payload_on(self.today)?;
        let session = self.session().await?;
        let record = self
            .guard(self.client.create_record(&session, &payload).await)
            .await?;
        render_one(&record, self.format, self.today)
    }

    pub async fn update_record(&self, id: i64, form: RecordForm) -> Result<String> {
        let payload = form.to_payload_on(self.today)?;
        let session = self.session().await?;
        let record = self
            .guard(self.client.update_record(&session, id, &payload).await)
            .await?;
        render_one(&record, self.format, self.today)
    }

    pub async fn delete_record(&self, id: i64) -> Result<String> {
        let session = self.session().await?;
        self.guard(self.client.delete_record(&session, id).await)
            .await?;
        Ok(format!("🗑️  Registro {} excluído", id))
    }
}

/// 離線 CPF 檢查
pub fn validate_cpf(value: &str) -> (bool, String) {
    match cpf::check(value) {
        Ok(valid) => (true, format!("✅ CPF válido: {}", valid)),
        Err(e) => {
            tracing::debug!("CPF '{}' rejected: {}", value, e);
            (false, "❌ CPF inválido".to_string())
        }
    }
}

pub fn format_cpf(value: &str) -> String {
    mask::format_cpf(value)
}

#[cfg(feature = "cli")]
mod dispatch {
    use super::*;
    use crate::config::cli::{Command, CpfCommand, PatientCommand, RecordCommand};
    use crate::domain::forms::FieldErrors;

    impl<S: SessionStore> App<S> {
        /// `password` 已由呼叫端解析 (參數、環境變數或標準輸入)
        pub async fn dispatch(&self, command: Command, password: Option<String>) -> Result<String> {
            match command {
                Command::Login(args) => {
                    self.login(LoginForm {
                        login: args.login,
                        password: password.unwrap_or_default(),
                    })
                    .await
                }
                Command::Logout => self.logout().await,
                Command::Register(args) => {
                    let password = password.unwrap_or_default();
                    self.register(RegisterForm {
                        login: args.login,
                        confirm_password: args.confirm_password.unwrap_or_else(|| password.clone()),
                        password,
                        role: args.role,
                    })
                    .await
                }
                Command::Stats => self.stats().await,
                Command::Patients { action } => self.dispatch_patients(action).await,
                Command::Records { action } => self.dispatch_records(action).await,
                Command::Cpf { action } => match action {
                    CpfCommand::Validate { value } => {
                        let (valid, message) = validate_cpf(&value);
                        if valid {
                            Ok(message)
                        } else {
                            let mut errors = FieldErrors::new();
                            errors.insert("cpf", "CPF inválido");
                            Err(CaminharError::ValidationError(errors))
                        }
                    }
                    CpfCommand::Format { value } => Ok(format_cpf(&value)),
                },
            }
        }

        async fn dispatch_patients(&self, action: PatientCommand) -> Result<String> {
            match action {
                PatientCommand::List(args) => {
                    let filter = PatientFilter {
                        search: args.search,
                        deceased: args.deceased,
                        age: args.age,
                    };
                    self.list_patients(&filter).await
                }
                PatientCommand::Show { id } => self.show_patient(id).await,
                PatientCommand::Create(fields) => {
                    self.create_patient(fields.apply(PatientForm::default())).await
                }
                PatientCommand::Update { id, fields } => {
                    let current = self.patient_form(id).await?;
                    self.update_patient(id, fields.apply(current)).await
                }
                PatientCommand::Delete { id } => self.delete_patient(id).await,
            }
        }

        async fn dispatch_records(&self, action: RecordCommand) -> Result<String> {
            match action {
                RecordCommand::List(args) => {
                    let filter = RecordFilter {
                        search: args.search,
                        window: args.window,
                    };
                    self.list_records(&filter).await
                }
                RecordCommand::Show { id } => self.show_record(id).await,
                RecordCommand::Create(fields) => {
                    self.create_record(fields.apply(RecordForm::default())).await
                }
                RecordCommand::Update { id, fields } => {
                    let current = self.record_form(id).await?;
                    self.update_record(id, fields.apply(current)).await
                }
                RecordCommand::Delete { id } => self.delete_record(id).await,
            }
        }
    }
}

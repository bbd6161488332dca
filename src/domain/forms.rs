//! 表單驗證：送出前在客戶端檢查欄位，成功時轉成 API 請求內容。

use crate::domain::cpf;
use crate::domain::model::{
    ConsultationRecord, Credentials, Patient, PatientPayload, RecordPayload, Registration, Role,
};
use crate::utils::error::{CaminharError, Result};
use crate::utils::validation::Validate;
use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;

/// 欄位名稱 → 錯誤訊息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 後寫入的訊息覆蓋同欄位先前的訊息
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CaminharError::ValidationError(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

fn require(errors: &mut FieldErrors, field: &'static str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field, message);
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatientForm {
    pub name: String,
    pub cpf: String,
    pub birth_date: Option<NaiveDate>,
    pub phone: String,
    pub cep: String,
    pub address: String,
    pub observations: String,
    pub deceased: bool,
}

impl PatientForm {
    /// 以現有資料預填表單 (編輯模式)
    pub fn from_patient(patient: &Patient) -> Self {
        Self {
            name: patient.name.clone(),
            cpf: patient.cpf.clone(),
            birth_date: patient.birth_date,
            phone: patient.phone.clone(),
            cep: patient.cep.clone(),
            address: patient.address.clone(),
            observations: patient.observations.clone(),
            deceased: patient.deceased,
        }
    }

    pub fn validate_on(&self, today: NaiveDate) -> FieldErrors {
        self.check_fields(today, true)
    }

    /// 編輯時 CEP 可留空：列表回應不含 CEP，無從預填
    pub fn validate_update_on(&self, today: NaiveDate) -> FieldErrors {
        self.check_fields(today, false)
    }

    fn check_fields(&self, today: NaiveDate, cep_required: bool) -> FieldErrors {
        let mut errors = FieldErrors::new();

        require(&mut errors, "name", &self.name, "Nome é obrigatório");
        require(&mut errors, "cpf", &self.cpf, "CPF é obrigatório");
        require(&mut errors, "phone", &self.phone, "Telefone é obrigatório");
        if cep_required {
            require(&mut errors, "cep", &self.cep, "CEP é obrigatório");
        }

        match self.birth_date {
            None => errors.insert("birth_date", "Data de nascimento é obrigatória"),
            Some(birth) if birth > today => {
                errors.insert("birth_date", "Data de nascimento não pode ser futura")
            }
            Some(_) => {}
        }

        if !self.cpf.trim().is_empty() {
            match cpf::check(&self.cpf) {
                Ok(_) => {}
                Err(cpf::CpfError::InvalidFormat(_)) => {
                    errors.insert("cpf", "CPF deve ter 11 dígitos")
                }
                Err(cpf::CpfError::InvalidChecksum) => errors.insert("cpf", "CPF inválido"),
            }
        }

        errors
    }

    pub fn to_payload_on(&self, today: NaiveDate) -> Result<PatientPayload> {
        self.validate_on(today).into_result()?;
        self.build_payload()
    }

    pub fn to_update_payload_on(&self, today: NaiveDate) -> Result<PatientPayload> {
        self.validate_update_on(today).into_result()?;
        self.build_payload()
    }

    fn build_payload(&self) -> Result<PatientPayload> {
        let cpf = cpf::Cpf::parse(&self.cpf).map_err(|_| invalid_field("cpf", "CPF inválido"))?;
        let birth_date = self
            .birth_date
            .ok_or_else(|| invalid_field("birth_date", "Data de nascimento é obrigatória"))?;

        Ok(PatientPayload {
            name: self.name.trim().to_string(),
            cpf: cpf.digits().to_string(),
            birth_date,
            phone: self.phone.trim().to_string(),
            cep: self.cep.trim().to_string(),
            address: self.address.trim().to_string(),
            observations: self.observations.trim().to_string(),
            deceased: self.deceased,
        })
    }

    pub fn to_payload(&self) -> Result<PatientPayload> {
        self.to_payload_on(Local::now().date_naive())
    }
}

impl Validate for PatientForm {
    fn validate(&self) -> Result<()> {
        self.validate_on(Local::now().date_naive()).into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordForm {
    pub visit_type: String,
    pub symptoms: String,
    pub diagnosis: String,
    pub exams: String,
    pub recorded_on: Option<NaiveDate>,
}

impl RecordForm {
    pub fn from_record(record: &ConsultationRecord) -> Self {
        Self {
            visit_type: record.visit_type.clone(),
            symptoms: record.symptoms.clone(),
            diagnosis: record.diagnosis.clone(),
            exams: record.exams.clone(),
            recorded_on: record.recorded_on,
        }
    }

    pub fn validate_fields(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "visit_type", &self.visit_type, "Tipo de consulta é obrigatório");
        require(&mut errors, "symptoms", &self.symptoms, "Sintomas são obrigatórios");
        require(&mut errors, "diagnosis", &self.diagnosis, "Diagnóstico é obrigatório");
        errors
    }

    /// 未指定日期時以 `today` 為紀錄日期
    pub fn to_payload_on(&self, today: NaiveDate) -> Result<RecordPayload> {
        self.validate_fields().into_result()?;

        Ok(RecordPayload {
            visit_type: self.visit_type.trim().to_string(),
            symptoms: self.symptoms.trim().to_string(),
            diagnosis: self.diagnosis.trim().to_string(),
            exams: self.exams.trim().to_string(),
            recorded_on: self.recorded_on.unwrap_or(today),
        })
    }

    pub fn to_payload(&self) -> Result<RecordPayload> {
        self.to_payload_on(Local::now().date_naive())
    }
}

impl Validate for RecordForm {
    fn validate(&self) -> Result<()> {
        self.validate_fields().into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub login: String,
    pub password: String,
}

impl LoginForm {
    pub fn into_credentials(self) -> Result<Credentials> {
        self.validate()?;
        Ok(Credentials {
            login: self.login,
            password: self.password,
        })
    }
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.login.is_empty() {
            errors.insert("login", "Login é obrigatório");
        }
        if self.password.is_empty() {
            errors.insert("password", "Senha é obrigatória");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub login: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
}

impl RegisterForm {
    pub fn into_registration(self) -> Result<Registration> {
        self.validate()?;
        Ok(Registration {
            login: self.login.trim().to_string(),
            password: self.password,
            role: self.role,
        })
    }
}

impl Validate for RegisterForm {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "login", &self.login, "Login é obrigatório");
        require(&mut errors, "password", &self.password, "Senha é obrigatória");
        if self.password != self.confirm_password {
            errors.insert("confirm_password", "As senhas não coincidem");
        }
        errors.into_result()
    }
}

fn invalid_field(field: &'static str, message: &str) -> CaminharError {
    let mut errors = FieldErrors::new();
    errors.insert(field, message);
    CaminharError::ValidationError(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn valid_patient() -> PatientForm {
        PatientForm {
            name: "  Maria Souza ".to_string(),
            cpf: "529.982.247-25".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1985, 3, 20),
            phone: "(11) 98765-4321".to_string(),
            cep: "01310-100".to_string(),
            address: "Rua A, 10".to_string(),
            observations: String::new(),
            deceased: false,
        }
    }

    fn validation_errors(result: Result<impl std::fmt::Debug>) -> FieldErrors {
        match result {
            Err(CaminharError::ValidationError(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_patient_produces_canonical_payload() {
        let payload = valid_patient().to_payload_on(today()).unwrap();
        assert_eq!(payload.name, "Maria Souza");
        assert_eq!(payload.cpf, "52998224725");
        assert_eq!(payload.birth_date, NaiveDate::from_ymd_opt(1985, 3, 20).unwrap());
    }

    #[test]
    fn test_empty_patient_reports_every_required_field() {
        let errors = PatientForm::default().validate_on(today());
        assert_eq!(errors.get("name"), Some("Nome é obrigatório"));
        assert_eq!(errors.get("cpf"), Some("CPF é obrigatório"));
        assert_eq!(errors.get("birth_date"), Some("Data de nascimento é obrigatória"));
        assert_eq!(errors.get("phone"), Some("Telefone é obrigatório"));
        assert_eq!(errors.get("cep"), Some("CEP é obrigatório"));
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_patient_cpf_messages() {
        let mut form = valid_patient();
        form.cpf = "123.456".to_string();
        let errors = validation_errors(form.to_payload_on(today()));
        assert_eq!(errors.get("cpf"), Some("CPF deve ter 11 dígitos"));

        form.cpf = "529.982.247-24".to_string();
        let errors = validation_errors(form.to_payload_on(today()));
        assert_eq!(errors.get("cpf"), Some("CPF inválido"));

        form.cpf = "111.111.111-11".to_string();
        let errors = validation_errors(form.to_payload_on(today()));
        assert_eq!(errors.get("cpf"), Some("CPF inválido"));
    }

    #[test]
    fn test_update_allows_blank_cep() {
        let form = PatientForm {
            cep: String::new(),
            ..valid_patient()
        };
        let errors = validation_errors(form.to_payload_on(today()));
        assert_eq!(errors.get("cep"), Some("CEP é obrigatório"));

        let payload = form.to_update_payload_on(today()).unwrap();
        assert_eq!(payload.cep, "");
        assert_eq!(payload.cpf, "52998224725");

        // 其他必填欄位在編輯時仍須檢查
        let blank_phone = PatientForm {
            phone: " ".to_string(),
            ..form
        };
        let errors = blank_phone.validate_update_on(today());
        assert_eq!(errors.get("phone"), Some("Telefone é obrigatório"));
        assert!(errors.get("cep").is_none());
    }

    #[test]
    fn test_future_birth_date_rejected() {
        let mut form = valid_patient();
        form.birth_date = NaiveDate::from_ymd_opt(2024, 5, 11);
        let errors = form.validate_on(today());
        assert_eq!(errors.get("birth_date"), Some("Data de nascimento não pode ser futura"));

        form.birth_date = Some(today());
        assert!(form.validate_on(today()).is_empty());
    }

    #[test]
    fn test_record_defaults_date_to_today() {
        let form = RecordForm {
            visit_type: "Consulta Neurológica".to_string(),
            symptoms: "Cefaleia".to_string(),
            diagnosis: "Enxaqueca".to_string(),
            exams: "Ressonância".to_string(),
            recorded_on: None,
        };
        let payload = form.to_payload_on(today()).unwrap();
        assert_eq!(payload.recorded_on, today());
    }

    #[test]
    fn test_record_required_fields() {
        let errors = validation_errors(RecordForm::default().to_payload_on(today()));
        assert_eq!(errors.get("visit_type"), Some("Tipo de consulta é obrigatório"));
        assert_eq!(errors.get("symptoms"), Some("Sintomas são obrigatórios"));
        assert_eq!(errors.get("diagnosis"), Some("Diagnóstico é obrigatório"));
        assert!(errors.get("exams").is_none());
    }

    #[test]
    fn test_login_form_requires_both_fields() {
        let errors = validation_errors(LoginForm::default().into_credentials());
        assert_eq!(errors.get("login"), Some("Login é obrigatório"));
        assert_eq!(errors.get("password"), Some("Senha é obrigatória"));
    }

    #[test]
    fn test_register_form_password_confirmation() {
        let form = RegisterForm {
            login: "ana".to_string(),
            password: "abc".to_string(),
            confirm_password: "abd".to_string(),
            role: Role::User,
        };
        let errors = validation_errors(form.clone().into_registration());
        assert_eq!(errors.get("confirm_password"), Some("As senhas não coincidem"));

        let ok = RegisterForm {
            confirm_password: "abc".to_string(),
            ..form
        };
        let registration = ok.into_registration().unwrap();
        assert_eq!(registration.role, Role::User);
    }

    #[test]
    fn test_field_errors_display() {
        let mut errors = FieldErrors::new();
        errors.insert("cpf", "CPF inválido");
        errors.insert("cep", "CEP é obrigatório");
        assert_eq!(errors.to_string(), "cep: CEP é obrigatório; cpf: CPF inválido");
    }
}

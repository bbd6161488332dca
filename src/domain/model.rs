use crate::domain::{cpf, mask};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

// 密碼不得出現在日誌中
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Registration {
    pub login: String,
    pub password: String,
    pub role: Role,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("login", &self.login)
            .field("password", &"***")
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(rename = "totalPacientes")]
    pub total_patients: u64,
    #[serde(rename = "prontuariosHoje")]
    pub records_today: u64,
    #[serde(rename = "novosRegistros")]
    pub new_records: u64,
}

/// `GET /pacientes` 回傳的病患資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "nome", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cpf: String,
    #[serde(rename = "dataNascimento", default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cep: String,
    #[serde(rename = "telefone", default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(rename = "endereco", default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(rename = "observacoes", default, deserialize_with = "null_as_default")]
    pub observations: String,
    #[serde(rename = "obito", default, deserialize_with = "null_as_default")]
    pub deceased: bool,
}

impl Patient {
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.birth_date.map(|birth| mask::age_on(birth, today))
    }

    /// 有效 CPF 以標點格式顯示，否則原樣
    pub fn display_cpf(&self) -> String {
        match cpf::Cpf::parse(&self.cpf) {
            Ok(valid) => valid.to_string(),
            Err(_) => self.cpf.clone(),
        }
    }
}

/// `POST/PUT /pacientes` 的請求內容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientPayload {
    #[serde(rename = "nomePas")]
    pub name: String,
    pub cpf: String,
    #[serde(rename = "dataNascimento")]
    pub birth_date: NaiveDate,
    #[serde(rename = "telefone")]
    pub phone: String,
    pub cep: String,
    #[serde(rename = "endereco")]
    pub address: String,
    #[serde(rename = "observacoes")]
    pub observations: String,
    #[serde(rename = "obito")]
    pub deceased: bool,
}

/// 就診紀錄 (prontuário)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultationRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "consulta", default, deserialize_with = "null_as_default")]
    pub visit_type: String,
    #[serde(rename = "sintomas", default, deserialize_with = "null_as_default")]
    pub symptoms: String,
    #[serde(rename = "diagnostico", default, deserialize_with = "null_as_default")]
    pub diagnosis: String,
    #[serde(rename = "exames", default, deserialize_with = "null_as_default")]
    pub exams: String,
    #[serde(rename = "dataRegistro", default)]
    pub recorded_on: Option<NaiveDate>,
}

impl ConsultationRecord {
    pub fn exam_list(&self) -> Vec<String> {
        mask::split_exams(&self.exams)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPayload {
    #[serde(rename = "consulta")]
    pub visit_type: String,
    #[serde(rename = "sintomas")]
    pub symptoms: String,
    #[serde(rename = "diagnostico")]
    pub diagnosis: String,
    #[serde(rename = "exames")]
    pub exams: String,
    #[serde(rename = "dataRegistro")]
    pub recorded_on: NaiveDate,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

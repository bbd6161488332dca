use crate::domain::forms::FieldErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaminharError {
    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation failed: {0}")]
    ValidationError(FieldErrors),

    #[error("Session rejected by server (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("Login rejected by server (HTTP {status})")]
    LoginRejected { status: u16 },

    #[error("No active session")]
    NotAuthenticated,

    #[error("API returned HTTP {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Authentication,
    Validation,
    Configuration,
    Storage,
    Data,
    Lookup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CaminharError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::ApiError { .. } => ErrorCategory::Network,
            Self::Unauthorized { .. } | Self::LoginRejected { .. } | Self::NotAuthenticated => {
                ErrorCategory::Authentication
            }
            Self::ValidationError(_) => ErrorCategory::Validation,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::IoError(_) => ErrorCategory::Storage,
            Self::SerializationError(_) | Self::CsvError(_) => ErrorCategory::Data,
            Self::NotFound { .. } => ErrorCategory::Lookup,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 使用者可直接修正的錯誤
            Self::ValidationError(_) | Self::NotAuthenticated | Self::NotFound { .. } => {
                ErrorSeverity::Low
            }
            Self::HttpError(_) | Self::Unauthorized { .. } | Self::LoginRejected { .. } => {
                ErrorSeverity::Medium
            }
            Self::ApiError { .. } | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorSeverity::High
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } | Self::IoError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    /// 是否應清除本地保存的 session
    pub fn invalidates_session(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::HttpError(_) => "Erro ao conectar com o servidor".to_string(),
            Self::IoError(e) => format!("Erro de arquivo: {}", e),
            Self::SerializationError(_) => "Resposta inesperada do servidor".to_string(),
            Self::CsvError(e) => format!("Erro ao gerar CSV: {}", e),
            Self::ConfigError { message } => format!("Configuração inválida: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuração inválida em {}: {}", field, reason)
            }
            Self::ValidationError(errors) => format!("Dados inválidos: {}", errors),
            Self::Unauthorized { .. } => "Sessão expirada, faça login novamente".to_string(),
            Self::LoginRejected { .. } => "Usuário ou senha incorretos".to_string(),
            Self::NotAuthenticated => "Nenhuma sessão ativa".to_string(),
            Self::ApiError { status, body } => format!("Erro HTTP: {} - {}", status, body),
            Self::NotFound { resource, id } => format!("{} {} não encontrado", resource, id),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Verifique se a API está em execução e se a URL base está correta",
            ErrorCategory::Authentication => "Execute `caminhar login` para iniciar uma nova sessão",
            ErrorCategory::Validation => "Corrija os campos indicados e tente novamente",
            ErrorCategory::Configuration => "Revise o arquivo de configuração e as opções da linha de comando",
            ErrorCategory::Storage => "Verifique as permissões do diretório da sessão",
            ErrorCategory::Data => "Verifique a compatibilidade entre o cliente e a versão da API",
            ErrorCategory::Lookup => "Confira o id com o comando `list` correspondente",
        }
    }
}

pub type Result<T> = std::result::Result<T, CaminharError>;

use crate::app::render::OutputFormat;
use crate::config::Overrides;
use crate::domain::filter::{AgeBand, DateWindow, DeceasedFilter};
use crate::domain::forms::{PatientForm, RecordForm};
use crate::domain::model::Role;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "caminhar")]
#[command(about = "Client for the Caminhar medical records API", version)]
pub struct Cli {
    #[arg(long, global = true, env = "CAMINHAR_CONFIG", help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, env = "CAMINHAR_API_URL")]
    pub base_url: Option<String>,

    #[arg(long, global = true, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, global = true, env = "CAMINHAR_SESSION_FILE")]
    pub session_file: Option<String>,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            timeout_seconds: self.timeout,
            session_path: self.session_file.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Authenticate and store the session token
    Login(LoginArgs),
    /// Forget the stored session token
    Logout,
    /// Create a new user account
    Register(RegisterArgs),
    /// Show dashboard statistics
    Stats,
    /// Manage patients
    Patients {
        #[command(subcommand)]
        action: PatientCommand,
    },
    /// Manage clinical visit records
    Records {
        #[command(subcommand)]
        action: RecordCommand,
    },
    /// CPF utilities (offline)
    Cpf {
        #[command(subcommand)]
        action: CpfCommand,
    },
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub login: String,

    /// Read from stdin when omitted
    #[arg(long, env = "CAMINHAR_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub login: String,

    #[arg(long, env = "CAMINHAR_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Defaults to the password when omitted
    #[arg(long)]
    pub confirm_password: Option<String>,

    #[arg(long, value_enum, default_value_t = Role::User)]
    pub role: Role,
}

#[derive(Debug, Subcommand)]
pub enum PatientCommand {
    List(PatientListArgs),
    Show { id: i64 },
    Create(PatientFields),
    /// Unspecified fields keep their current values
    ///
    /// The API does not list CEP, so it is sent blank unless `--cep` is given.
    Update {
        id: i64,
        #[command(flatten)]
        fields: PatientFields,
    },
    Delete { id: i64 },
}

#[derive(Debug, Args)]
pub struct PatientListArgs {
    #[arg(long, default_value = "")]
    pub search: String,

    #[arg(long, value_enum, default_value_t = DeceasedFilter::All)]
    pub deceased: DeceasedFilter,

    #[arg(long, value_enum, default_value_t = AgeBand::All)]
    pub age: AgeBand,
}

#[derive(Debug, Clone, Default, Args)]
pub struct PatientFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub cpf: Option<String>,

    /// YYYY-MM-DD
    #[arg(long)]
    pub birth_date: Option<NaiveDate>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub cep: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub observations: Option<String>,

    #[arg(long)]
    pub deceased: Option<bool>,
}

impl PatientFields {
    /// 只覆寫有指定的欄位
    pub fn apply(self, mut form: PatientForm) -> PatientForm {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(cpf) = self.cpf {
            form.cpf = cpf;
        }
        if let Some(birth_date) = self.birth_date {
            form.birth_date = Some(birth_date);
        }
        if let Some(phone) = self.phone {
            form.phone = phone;
        }
        if let Some(cep) = self.cep {
            form.cep = cep;
        }
        if let Some(address) = self.address {
            form.address = address;
        }
        if let Some(observations) = self.observations {
            form.observations = observations;
        }
        if let Some(deceased) = self.deceased {
            form.deceased = deceased;
        }
        form
    }
}

#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    List(RecordListArgs),
    Show { id: i64 },
    Create(RecordFields),
    /// Unspecified fields keep their current values
    Update {
        id: i64,
        #[command(flatten)]
        fields: RecordFields,
    },
    Delete { id: i64 },
}

#[derive(Debug, Args)]
pub struct RecordListArgs {
    #[arg(long, default_value = "")]
    pub search: String,

    #[arg(long, value_enum, default_value_t = DateWindow::All)]
    pub window: DateWindow,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RecordFields {
    #[arg(long = "type")]
    pub visit_type: Option<String>,

    #[arg(long)]
    pub symptoms: Option<String>,

    #[arg(long)]
    pub diagnosis: Option<String>,

    /// Separated by ',', ';' or newlines
    #[arg(long)]
    pub exams: Option<String>,

    /// YYYY-MM-DD, defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl RecordFields {
    pub fn apply(self, mut form: RecordForm) -> RecordForm {
        if let Some(visit_type) = self.visit_type {
            form.visit_type = visit_type;
        }
        if let Some(symptoms) = self.symptoms {
            form.symptoms = symptoms;
        }
        if let Some(diagnosis) = self.diagnosis {
            form.diagnosis = diagnosis;
        }
        if let Some(exams) = self.exams {
            form.exams = exams;
        }
        if let Some(date) = self.date {
            form.recorded_on = Some(date);
        }
        form
    }
}

#[derive(Debug, Subcommand)]
pub enum CpfCommand {
    Validate { value: String },
    Format { value: String },
}

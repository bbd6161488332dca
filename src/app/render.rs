// 將 API 資料輸出為表格、JSON 或 CSV

use crate::domain::model::{ConsultationRecord, DashboardStats, Patient};
use crate::utils::error::{CaminharError, Result};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

pub trait Tabular {
    fn headers() -> &'static [&'static str];
    fn row(&self, today: NaiveDate) -> Vec<String>;
}

impl Tabular for Patient {
    fn headers() -> &'static [&'static str] {
        &["id", "nome", "cpf", "idade", "telefone", "cep", "obito"]
    }

    fn row(&self, today: NaiveDate) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.display_cpf(),
            self.age_on(today)
                .map(|age| format!("{} anos", age))
                .unwrap_or_default(),
            self.phone.clone(),
            self.cep.clone(),
            if self.deceased { "sim" } else { "não" }.to_string(),
        ]
    }
}

impl Tabular for ConsultationRecord {
    fn headers() -> &'static [&'static str] {
        &["id", "data", "consulta", "sintomas", "diagnostico", "exames"]
    }

    fn row(&self, _today: NaiveDate) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.recorded_on.map(|d| d.to_string()).unwrap_or_default(),
            self.visit_type.clone(),
            self.symptoms.clone(),
            self.diagnosis.clone(),
            self.exam_list().join(", "),
        ]
    }
}

impl Tabular for DashboardStats {
    fn headers() -> &'static [&'static str] {
        &["total_pacientes", "prontuarios_hoje", "novos_registros"]
    }

    fn row(&self, _today: NaiveDate) -> Vec<String> {
        vec![
            self.total_patients.to_string(),
            self.records_today.to_string(),
            self.new_records.to_string(),
        ]
    }
}

pub fn render_list<T: Tabular + Serialize>(
    items: &[&T],
    format: OutputFormat,
    today: NaiveDate,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::Csv => render_csv(items, today),
        OutputFormat::Table => Ok(render_table(items, today)),
    }
}

pub fn render_one<T: Tabular + Serialize>(
    item: &T,
    format: OutputFormat,
    today: NaiveDate,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(item)?),
        _ => render_list(&[item], format, today),
    }
}

fn render_csv<T: Tabular>(items: &[&T], today: NaiveDate) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(T::headers())?;
    for item in items {
        writer.write_record(item.row(today))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CaminharError::IoError(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).trim_end().to_string())
}

fn render_table<T: Tabular>(items: &[&T], today: NaiveDate) -> String {
    let headers = T::headers();
    let rows: Vec<Vec<String>> = items.iter().map(|item| item.row(today)).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width - cell.chars().count();
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_line(headers.to_vec())];
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &rows {
        lines.push(format_line(row.iter().map(String::as_str).collect()));
    }
    if rows.is_empty() {
        lines.push("(nenhum registro encontrado)".to_string());
    }
    lines.join("\n")
}

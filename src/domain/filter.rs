use crate::domain::cpf::strip_non_digits;
use crate::domain::model::{ConsultationRecord, Patient};
use chrono::{Days, Months, NaiveDate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DeceasedFilter {
    #[default]
    All,
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum AgeBand {
    #[default]
    All,
    #[cfg_attr(feature = "cli", value(name = "0-18"))]
    Under18,
    #[cfg_attr(feature = "cli", value(name = "18-40"))]
    From18To40,
    #[cfg_attr(feature = "cli", value(name = "40-60"))]
    From40To60,
    #[cfg_attr(feature = "cli", value(name = "60+"))]
    Over60,
}

impl AgeBand {
    pub fn contains(&self, age: u32) -> bool {
        match self {
            AgeBand::All => true,
            AgeBand::Under18 => age < 18,
            AgeBand::From18To40 => (18..=40).contains(&age),
            AgeBand::From40To60 => age > 40 && age <= 60,
            AgeBand::Over60 => age > 60,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatientFilter {
    pub search: String,
    pub deceased: DeceasedFilter,
    pub age: AgeBand,
}

impl PatientFilter {
    pub fn matches(&self, patient: &Patient, today: NaiveDate) -> bool {
        self.matches_search(patient) && self.matches_deceased(patient) && self.matches_age(patient, today)
    }

    pub fn apply<'a>(&self, patients: &'a [Patient], today: NaiveDate) -> Vec<&'a Patient> {
        patients.iter().filter(|p| self.matches(p, today)).collect()
    }

    fn matches_search(&self, patient: &Patient) -> bool {
        let query = self.search.trim();
        if query.is_empty() {
            return true;
        }
        if patient.name.to_lowercase().contains(&query.to_lowercase()) || patient.cpf.contains(query) {
            return true;
        }
        // 允許以不同標點格式搜尋 CPF
        let digits = strip_non_digits(query);
        !digits.is_empty() && strip_non_digits(&patient.cpf).contains(&digits)
    }

    fn matches_deceased(&self, patient: &Patient) -> bool {
        match self.deceased {
            DeceasedFilter::All => true,
            DeceasedFilter::Yes => patient.deceased,
            DeceasedFilter::No => !patient.deceased,
        }
    }

    // 沒有出生日期的病患只出現在「全部年齡」
    fn matches_age(&self, patient: &Patient, today: NaiveDate) -> bool {
        match (self.age, patient.age_on(today)) {
            (AgeBand::All, _) => true,
            (band, Some(age)) => band.contains(age),
            (_, None) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DateWindow {
    #[default]
    All,
    Today,
    #[cfg_attr(feature = "cli", value(name = "week"))]
    LastWeek,
    #[cfg_attr(feature = "cli", value(name = "month"))]
    LastMonth,
}

impl DateWindow {
    pub fn contains(&self, date: Option<NaiveDate>, today: NaiveDate) -> bool {
        let date = match (self, date) {
            (DateWindow::All, _) => return true,
            (_, None) => return false,
            (_, Some(date)) => date,
        };

        match self {
            DateWindow::All => true,
            DateWindow::Today => date == today,
            DateWindow::LastWeek => today
                .checked_sub_days(Days::new(7))
                .is_some_and(|start| date >= start),
            DateWindow::LastMonth => today
                .checked_sub_months(Months::new(1))
                .is_some_and(|start| date >= start),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub search: String,
    pub window: DateWindow,
}

impl RecordFilter {
    pub fn matches(&self, record: &ConsultationRecord, today: NaiveDate) -> bool {
        self.matches_search(record) && self.window.contains(record.recorded_on, today)
    }

    pub fn apply<'a>(
        &self,
        records: &'a [ConsultationRecord],
        today: NaiveDate,
    ) -> Vec<&'a ConsultationRecord> {
        records.iter().filter(|r| self.matches(r, today)).collect()
    }

    fn matches_search(&self, record: &ConsultationRecord) -> bool {
        let query = self.search.trim();
        if query.is_empty() {
            return true;
        }
        let lower = query.to_lowercase();
        [&record.visit_type, &record.diagnosis, &record.symptoms]
            .iter()
            .any(|field| field.to_lowercase().contains(&lower))
            || record.id.to_string().contains(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn patient(id: i64, name: &str, cpf: &str, birth: Option<NaiveDate>, deceased: bool) -> Patient {
        Patient {
            id,
            name: name.to_string(),
            cpf: cpf.to_string(),
            birth_date: birth,
            cep: String::new(),
            phone: String::new(),
            address: String::new(),
            observations: String::new(),
            deceased,
        }
    }

    fn record(id: i64, visit_type: &str, diagnosis: &str, on: Option<NaiveDate>) -> ConsultationRecord {
        ConsultationRecord {
            id,
            visit_type: visit_type.to_string(),
            symptoms: "Febre".to_string(),
            diagnosis: diagnosis.to_string(),
            exams: String::new(),
            recorded_on: on,
        }
    }

    #[test]
    fn test_patient_search_by_name_and_cpf() {
        let today = date(2024, 1, 1);
        let patients = vec![
            patient(1, "Maria Souza", "52998224725", Some(date(1980, 1, 1)), false),
            patient(2, "João Lima", "111.444.777-35", Some(date(2010, 1, 1)), false),
        ];

        let by_name = PatientFilter { search: "maria".to_string(), ..Default::default() };
        assert_eq!(by_name.apply(&patients, today).len(), 1);

        let by_punctuated_cpf = PatientFilter { search: "529.982".to_string(), ..Default::default() };
        assert_eq!(by_punctuated_cpf.apply(&patients, today)[0].id, 1);

        let by_raw_cpf = PatientFilter { search: "111444".to_string(), ..Default::default() };
        assert_eq!(by_raw_cpf.apply(&patients, today)[0].id, 2);

        let none = PatientFilter { search: "zzz".to_string(), ..Default::default() };
        assert!(none.apply(&patients, today).is_empty());
    }

    #[test]
    fn test_age_bands_boundaries() {
        assert!(AgeBand::Under18.contains(17));
        assert!(!AgeBand::Under18.contains(18));
        assert!(AgeBand::From18To40.contains(18));
        assert!(AgeBand::From18To40.contains(40));
        assert!(!AgeBand::From40To60.contains(40));
        assert!(AgeBand::From40To60.contains(60));
        assert!(AgeBand::Over60.contains(61));
    }

    #[test]
    fn test_patient_deceased_and_missing_birth_date() {
        let today = date(2024, 1, 1);
        let patients = vec![
            patient(1, "A", "", Some(date(1950, 1, 1)), true),
            patient(2, "B", "", None, false),
        ];

        let deceased = PatientFilter { deceased: DeceasedFilter::Yes, ..Default::default() };
        assert_eq!(deceased.apply(&patients, today)[0].id, 1);

        let seniors = PatientFilter { age: AgeBand::Over60, ..Default::default() };
        assert_eq!(seniors.apply(&patients, today).len(), 1);

        let minors = PatientFilter { age: AgeBand::Under18, ..Default::default() };
        assert!(minors.apply(&patients, today).is_empty());
    }

    #[test]
    fn test_record_search_and_windows() {
        let today = date(2024, 3, 31);
        let records = vec![
            record(10, "Consulta Neurológica", "Enxaqueca", Some(today)),
            record(11, "Retorno", "Gripe", Some(date(2024, 3, 25))),
            record(12, "Retorno", "Asma", Some(date(2024, 2, 29))),
            record(13, "Retorno", "Asma", None),
        ];

        let by_text = RecordFilter { search: "ENXAQ".to_string(), ..Default::default() };
        assert_eq!(by_text.apply(&records, today)[0].id, 10);

        let by_id = RecordFilter { search: "12".to_string(), ..Default::default() };
        assert_eq!(by_id.apply(&records, today)[0].id, 12);

        let count = |window| RecordFilter { search: String::new(), window }.apply(&records, today).len();
        assert_eq!(count(DateWindow::All), 4);
        assert_eq!(count(DateWindow::Today), 1);
        assert_eq!(count(DateWindow::LastWeek), 2);
        assert_eq!(count(DateWindow::LastMonth), 3);
    }
}

//! CPF (Cadastro de Pessoas Físicas) 校驗。
//!
//! 兩個檢查碼皆以加權和 mod 11 計算，權重與 10/11 → 0 的規則為官方演算法，
//! 必須逐位元一致。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const CPF_LEN: usize = 11;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CpfError {
    #[error("CPF must have 11 digits, got {0}")]
    InvalidFormat(usize),

    #[error("CPF check digits do not match")]
    InvalidChecksum,
}

/// 已通過校驗的 CPF，只保存 11 位數字
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

/// 移除所有非數字字元
pub fn strip_non_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn is_valid(raw: &str) -> bool {
    check(raw).is_ok()
}

/// 與 [`is_valid`] 相同，但保留失敗原因供記錄使用
pub fn check(raw: &str) -> Result<Cpf, CpfError> {
    let digits: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != CPF_LEN {
        return Err(CpfError::InvalidFormat(digits.len()));
    }

    // 全部相同的數字 (00000000000 ...) 一律無效
    if digits.iter().all(|&d| d == digits[0]) {
        return Err(CpfError::InvalidChecksum);
    }

    if check_digit(&digits[..9]) != digits[9] || check_digit(&digits[..10]) != digits[10] {
        return Err(CpfError::InvalidChecksum);
    }

    Ok(Cpf(digits.iter().map(|d| char::from(b'0' + *d as u8)).collect()))
}

// prefix 長度 n 時，第 i 位 (1-indexed) 的權重為 n + 2 - i
fn check_digit(prefix: &[u32]) -> u32 {
    let top = prefix.len() as u32 + 1;
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(idx, d)| d * (top - idx as u32))
        .sum();

    match (sum * 10) % 11 {
        10 | 11 => 0,
        remainder => remainder,
    }
}

impl Cpf {
    pub fn parse(raw: &str) -> Result<Self, CpfError> {
        check(raw)
    }

    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl FromStr for Cpf {
    type Err = CpfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        check(s)
    }
}

impl TryFrom<String> for Cpf {
    type Error = CpfError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        check(&value)
    }
}

impl From<Cpf> for String {
    fn from(cpf: Cpf) -> Self {
        cpf.0
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.0;
        write!(f, "{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
    }
}

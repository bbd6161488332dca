// 輸入遮罩與顯示輔助：逐步套用格式，超過長度上限時原樣返回

use crate::domain::cpf::strip_non_digits;
use chrono::{Datelike, NaiveDate};

/// `###.###.###-##`
pub fn format_cpf(raw: &str) -> String {
    mask(raw, 11, |digits| {
        group(digits, &[(3, ""), (3, "."), (3, "."), (2, "-")])
    })
}

/// 10 位 `(##) ####-####`，11 位 `(##) #####-####`
pub fn format_phone(raw: &str) -> String {
    mask(raw, 11, |digits| {
        if digits.len() <= 2 {
            return digits.to_string();
        }
        let (area, number) = digits.split_at(2);
        let prefix_len = if digits.len() == 11 { 5 } else { 4 };
        format!("({}) {}", area, group(number, &[(prefix_len, ""), (5, "-")]))
    })
}

/// `#####-###`
pub fn format_cep(raw: &str) -> String {
    mask(raw, 8, |digits| group(digits, &[(5, ""), (3, "-")]))
}

fn mask(raw: &str, max_digits: usize, apply: impl Fn(&str) -> String) -> String {
    let digits = strip_non_digits(raw);
    if digits.len() > max_digits {
        return raw.to_string();
    }
    apply(&digits)
}

// 依序取出各段，段與段之間插入分隔符；尚未輸入的段落不輸出分隔符
fn group(digits: &str, layout: &[(usize, &str)]) -> String {
    let mut out = String::with_capacity(digits.len() + layout.len());
    let mut rest = digits;
    for (width, separator) in layout {
        if rest.is_empty() {
            break;
        }
        let take = (*width).min(rest.len());
        out.push_str(separator);
        out.push_str(&rest[..take]);
        rest = &rest[take..];
    }
    out
}

/// 以 `today` 計算的足歲；未來的出生日期回傳 0
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    if birth > today {
        return 0;
    }
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

/// 檢查項目清單：以逗號、分號或換行分隔
pub fn split_exams(text: &str) -> Vec<String> {
    text.split(|c| matches!(c, ',' | ';' | '\n'))
        .map(str::trim)
        .filter(|exam| !exam.is_empty())
        .map(str::to_string)
        .collect()
}

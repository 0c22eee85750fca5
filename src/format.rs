//! Display helpers shared by the client list and the client form.

use chrono::{DateTime, Local, NaiveDateTime};

use crate::models::{Address, Phone};

/// Longest value the CPF input accepts: `000.000.000-00`.
pub const CPF_MASK_LEN: usize = 14;

const CPF_DIGITS: usize = 11;

/// Strips everything but ASCII digits.
pub fn cpf_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Reformats raw CPF input into the grouped `000.000.000-00` form.
///
/// Applied on every keystroke. Digits past the eleventh are discarded so the
/// result never exceeds [`CPF_MASK_LEN`] characters.
pub fn format_cpf_input(value: &str) -> String {
    let digits: Vec<char> = value
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(CPF_DIGITS)
        .collect();

    let mut masked = String::with_capacity(CPF_MASK_LEN);
    for (i, digit) in digits.iter().enumerate() {
        match i {
            3 | 6 => masked.push('.'),
            9 => masked.push('-'),
            _ => {}
        }
        masked.push(*digit);
    }
    masked
}

/// Formats a stored CPF for display. Values that are not exactly eleven
/// digits are returned untouched.
pub fn format_cpf(cpf: &str) -> String {
    if cpf.len() == CPF_DIGITS && cpf.chars().all(|c| c.is_ascii_digit()) {
        format_cpf_input(cpf)
    } else {
        cpf.to_string()
    }
}

/// `(19) 99887-7665`: the last four digits are split off with a dash.
pub fn format_phone(phone: &Phone) -> String {
    let chars: Vec<char> = phone.number.chars().collect();
    if chars.len() > 4 {
        let (head, tail) = chars.split_at(chars.len() - 4);
        format!(
            "({}) {}-{}",
            phone.area_code,
            head.iter().collect::<String>(),
            tail.iter().collect::<String>()
        )
    } else {
        format!("({}) {}", phone.area_code, phone.number)
    }
}

pub fn format_phones(phones: &[Phone]) -> String {
    if phones.is_empty() {
        return "Nenhum telefone cadastrado".to_string();
    }

    phones.iter().map(format_phone).collect::<Vec<_>>().join(", ")
}

pub fn format_location(address: Option<&Address>) -> String {
    match address {
        Some(address) => format!("{}/{}", address.city, address.state),
        None => "Endereço não cadastrado".to_string(),
    }
}

/// Renders a server timestamp as `dd/mm/aaaa, HH:MM`.
///
/// Offset timestamps are shown in local time; naive ones are shown as sent.
/// Anything unparseable is returned raw.
pub fn format_timestamp(value: &str) -> String {
    const DISPLAY: &str = "%d/%m/%Y, %H:%M";

    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return datetime.with_timezone(&Local).format(DISPLAY).to_string();
    }
    if let Ok(datetime) = value.parse::<NaiveDateTime>() {
        return datetime.format(DISPLAY).to_string();
    }
    value.to_string()
}

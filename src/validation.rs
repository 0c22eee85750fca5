//! Client-side checks run before a draft is submitted.

use std::collections::BTreeMap;

use crate::format::cpf_digits;
use crate::models::{AddressField, ClientDraft, FormField};

/// Field-keyed validation messages for one draft.
///
/// Phone errors are kept per row rather than per input, since a row is only
/// ever wrong as a pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    fields: BTreeMap<FormField, String>,
    phones: BTreeMap<usize, String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.phones.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len() + self.phones.len()
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        match field {
            FormField::Phone(index, _) => {
                self.phones.insert(index, message.into());
            }
            field => {
                self.fields.insert(field, message.into());
            }
        }
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::Phone(index, _) => self.phone(index),
            field => self.fields.get(&field).map(String::as_str),
        }
    }

    pub fn phone(&self, index: usize) -> Option<&str> {
        self.phones.get(&index).map(String::as_str)
    }

    /// Drops the message for a field once the user edits it.
    pub fn clear(&mut self, field: FormField) {
        match field {
            FormField::Phone(index, _) => {
                self.phones.remove(&index);
            }
            field => {
                self.fields.remove(&field);
            }
        }
    }

    /// Keeps row errors aligned after phone row `index` is removed.
    pub fn remove_phone(&mut self, index: usize) {
        self.phones = std::mem::take(&mut self.phones)
            .into_iter()
            .filter(|(row, _)| *row != index)
            .map(|(row, message)| if row > index { (row - 1, message) } else { (row, message) })
            .collect();
    }
}

pub fn is_valid_cpf(value: &str) -> bool {
    cpf_digits(value).len() == 11
}

/// Accepts anything containing `local@domain.tld` where no part holds
/// whitespace.
pub fn is_valid_email(value: &str) -> bool {
    value.char_indices().filter(|(_, c)| *c == '@').any(|(at, _)| {
        let before = value[..at].chars().next_back();
        if !before.is_some_and(|c| !c.is_whitespace()) {
            return false;
        }

        let domain: &str = value[at + 1..]
            .split(char::is_whitespace)
            .next()
            .unwrap_or_default();
        domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
    })
}

pub fn validate(draft: &ClientDraft) -> FormErrors {
    let mut errors = FormErrors::default();

    if draft.name.trim().is_empty() {
        errors.insert(FormField::Name, "Nome é obrigatório");
    }

    let digits = cpf_digits(&draft.cpf);
    if digits.is_empty() {
        errors.insert(FormField::Cpf, "CPF é obrigatório");
    } else if !is_valid_cpf(&digits) {
        errors.insert(FormField::Cpf, "CPF deve conter 11 dígitos");
    }

    if !draft.email.is_empty() && !is_valid_email(&draft.email) {
        errors.insert(FormField::Email, "Email inválido");
    }

    for field in AddressField::ALL.into_iter().filter(|f| f.is_required()) {
        if draft.address.get(field).trim().is_empty() {
            errors.insert(
                FormField::Address(field),
                format!("{} é obrigatório", field.label()),
            );
        }
    }

    // Blank rows are dropped from the payload, half-filled ones are not.
    for (index, phone) in draft.phones.iter().enumerate() {
        if !phone.is_complete() && !phone.is_blank() {
            errors.phones.insert(index, "DDD e número são obrigatórios".to_string());
        }
    }

    errors
}

/// Maps a backend rejection such as "Email já cadastrado" back to the input
/// it concerns.
pub fn conflict_field(message: &str) -> Option<FormField> {
    let lowered = message.to_lowercase();
    if lowered.contains("email") {
        Some(FormField::Email)
    } else if lowered.contains("cpf") {
        Some(FormField::Cpf)
    } else {
        None
    }
}

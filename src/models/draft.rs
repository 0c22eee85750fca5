use crate::format::{cpf_digits, format_cpf_input};
use crate::models::{Address, Client, ClientPayload, Phone};

/// Required address fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddressField {
    State,
    City,
    Neighborhood,
    Street,
    Number,
    PostalCode,
    ExtraInfo,
}

impl AddressField {
    pub const ALL: [AddressField; 7] = [
        AddressField::State,
        AddressField::City,
        AddressField::Neighborhood,
        AddressField::Street,
        AddressField::Number,
        AddressField::PostalCode,
        AddressField::ExtraInfo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AddressField::State => "Estado",
            AddressField::City => "Cidade",
            AddressField::Neighborhood => "Bairro",
            AddressField::Street => "Rua",
            AddressField::Number => "Número",
            AddressField::PostalCode => "CEP",
            AddressField::ExtraInfo => "Informações adicionais",
        }
    }

    pub fn is_required(self) -> bool {
        self != AddressField::ExtraInfo
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PhonePart {
    AreaCode,
    Number,
}

/// Every editable input of the client form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    SocialName,
    Email,
    Cpf,
    Address(AddressField),
    Phone(usize, PhonePart),
}

impl FormField {
    pub fn label(self) -> String {
        match self {
            FormField::Name => "Nome completo *".to_string(),
            FormField::SocialName => "Nome social".to_string(),
            FormField::Email => "Email".to_string(),
            FormField::Cpf => "CPF *".to_string(),
            FormField::Address(field) if field.is_required() => format!("{} *", field.label()),
            FormField::Address(field) => field.label().to_string(),
            FormField::Phone(index, PhonePart::AreaCode) => format!("Telefone {} DDD", index + 1),
            FormField::Phone(index, PhonePart::Number) => format!("Telefone {} Número", index + 1),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressDraft {
    pub id: Option<i64>,
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
    pub number: String,
    pub postal_code: String,
    pub extra_info: String,
}

impl AddressDraft {
    pub fn get(&self, field: AddressField) -> &str {
        match field {
            AddressField::State => &self.state,
            AddressField::City => &self.city,
            AddressField::Neighborhood => &self.neighborhood,
            AddressField::Street => &self.street,
            AddressField::Number => &self.number,
            AddressField::PostalCode => &self.postal_code,
            AddressField::ExtraInfo => &self.extra_info,
        }
    }

    pub fn get_mut(&mut self, field: AddressField) -> &mut String {
        match field {
            AddressField::State => &mut self.state,
            AddressField::City => &mut self.city,
            AddressField::Neighborhood => &mut self.neighborhood,
            AddressField::Street => &mut self.street,
            AddressField::Number => &mut self.number,
            AddressField::PostalCode => &mut self.postal_code,
            AddressField::ExtraInfo => &mut self.extra_info,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhoneDraft {
    pub id: Option<i64>,
    pub area_code: String,
    pub number: String,
}

impl PhoneDraft {
    pub fn is_complete(&self) -> bool {
        !self.area_code.trim().is_empty() && !self.number.trim().is_empty()
    }

    pub fn is_blank(&self) -> bool {
        self.area_code.trim().is_empty() && self.number.trim().is_empty()
    }
}

/// The in-progress client record edited by the form.
///
/// Optional fields are kept as empty strings while editing; they only become
/// `None` when the payload is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientDraft {
    pub id: Option<i64>,
    pub name: String,
    pub social_name: String,
    pub email: String,
    pub cpf: String,
    pub address: AddressDraft,
    pub phones: Vec<PhoneDraft>,
}

impl ClientDraft {
    pub fn new() -> Self {
        Self {
            id: None,
            name: String::new(),
            social_name: String::new(),
            email: String::new(),
            cpf: String::new(),
            address: AddressDraft::default(),
            phones: vec![PhoneDraft::default()],
        }
    }

    /// Converts a fetched record into an editable draft.
    pub fn from_client(client: &Client) -> Self {
        let address = client
            .address
            .as_ref()
            .map(|address| AddressDraft {
                id: address.id,
                state: address.state.clone(),
                city: address.city.clone(),
                neighborhood: address.neighborhood.clone(),
                street: address.street.clone(),
                number: address.number.clone(),
                postal_code: address.postal_code.clone(),
                extra_info: address.extra_info.clone().unwrap_or_default(),
            })
            .unwrap_or_default();

        let mut phones: Vec<PhoneDraft> = client
            .phones
            .iter()
            .map(|phone| PhoneDraft {
                id: phone.id,
                area_code: phone.area_code.clone(),
                number: phone.number.clone(),
            })
            .collect();
        if phones.is_empty() {
            phones.push(PhoneDraft::default());
        }

        Self {
            id: Some(client.id),
            name: client.name.clone(),
            social_name: client.social_name.clone().unwrap_or_default(),
            email: client.email.clone().unwrap_or_default(),
            cpf: format_cpf_input(&client.cpf),
            address,
            phones,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::SocialName => &self.social_name,
            FormField::Email => &self.email,
            FormField::Cpf => &self.cpf,
            FormField::Address(field) => self.address.get(field),
            FormField::Phone(index, part) => match self.phones.get(index) {
                Some(phone) => match part {
                    PhonePart::AreaCode => &phone.area_code,
                    PhonePart::Number => &phone.number,
                },
                None => "",
            },
        }
    }

    pub fn get_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Name => Some(&mut self.name),
            FormField::SocialName => Some(&mut self.social_name),
            FormField::Email => Some(&mut self.email),
            FormField::Cpf => Some(&mut self.cpf),
            FormField::Address(field) => Some(self.address.get_mut(field)),
            FormField::Phone(index, part) => self.phones.get_mut(index).map(|phone| match part {
                PhonePart::AreaCode => &mut phone.area_code,
                PhonePart::Number => &mut phone.number,
            }),
        }
    }

    /// Builds the submission body: CPF reduced to digits, incomplete phones
    /// dropped and empty optional fields omitted.
    pub fn to_payload(&self) -> ClientPayload {
        ClientPayload {
            id: self.id,
            name: self.name.clone(),
            social_name: non_empty(&self.social_name),
            email: non_empty(&self.email),
            cpf: cpf_digits(&self.cpf),
            address: Address {
                id: self.address.id,
                state: self.address.state.clone(),
                city: self.address.city.clone(),
                neighborhood: self.address.neighborhood.clone(),
                street: self.address.street.clone(),
                number: self.address.number.clone(),
                postal_code: self.address.postal_code.clone(),
                extra_info: non_empty(&self.address.extra_info),
            },
            phones: self
                .phones
                .iter()
                .filter(|phone| phone.is_complete())
                .map(|phone| Phone {
                    id: phone.id,
                    area_code: phone.area_code.clone(),
                    number: phone.number.clone(),
                })
                .collect(),
        }
    }
}

impl Default for ClientDraft {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

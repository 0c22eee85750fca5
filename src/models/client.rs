use serde::{Deserialize, Deserializer, Serialize};

/// A client record as the backend returns it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Client {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "nomeSocial", default, skip_serializing_if = "Option::is_none")]
    pub social_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub cpf: String,
    #[serde(rename = "endereco", default)]
    pub address: Option<Address>,
    #[serde(rename = "telefones", default, deserialize_with = "null_as_default")]
    pub phones: Vec<Phone>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "estado", default)]
    pub state: String,
    #[serde(rename = "cidade", default)]
    pub city: String,
    #[serde(rename = "bairro", default)]
    pub neighborhood: String,
    #[serde(rename = "rua", default)]
    pub street: String,
    #[serde(rename = "numero", default)]
    pub number: String,
    #[serde(rename = "codigoPostal", default)]
    pub postal_code: String,
    #[serde(rename = "informacoesAdicionais", default, skip_serializing_if = "Option::is_none")]
    pub extra_info: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Phone {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "ddd")]
    pub area_code: String,
    #[serde(rename = "numero")]
    pub number: String,
}

/// Body sent to the create and update endpoints.
///
/// The id is only present for updates. Empty optional fields are `None` and
/// left out of the JSON entirely.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClientPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "nomeSocial", default, skip_serializing_if = "Option::is_none")]
    pub social_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub cpf: String,
    #[serde(rename = "endereco")]
    pub address: Address,
    #[serde(rename = "telefones", default)]
    pub phones: Vec<Phone>,
}

// The backend sends `"telefones": null` for clients without phones.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_reads_backend_json() {
        let json = r#"{
            "id": 7,
            "nome": "Maria Souza",
            "nomeSocial": null,
            "email": "maria@petlovers.com",
            "cpf": "12345678901",
            "endereco": {
                "id": 3,
                "estado": "SP",
                "cidade": "Campinas",
                "bairro": "Centro",
                "rua": "Rua das Flores",
                "numero": "100",
                "codigoPostal": "13010-000",
                "informacoesAdicionais": null
            },
            "telefones": [{"id": 1, "ddd": "19", "numero": "998877665"}],
            "createdAt": "2025-03-10T14:30:00",
            "updatedAt": "2025-03-11T09:00:00"
        }"#;

        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.id, 7);
        assert_eq!(client.name, "Maria Souza");
        assert!(client.social_name.is_none());
        let address = client.address.unwrap();
        assert_eq!(address.city, "Campinas");
        assert!(address.extra_info.is_none());
        assert_eq!(client.phones[0].area_code, "19");
        assert_eq!(client.created_at.as_deref(), Some("2025-03-10T14:30:00"));
    }

    #[test]
    fn null_address_and_phones_are_tolerated() {
        let json = r#"{"id": 1, "nome": "Ana", "cpf": "1", "endereco": null, "telefones": null}"#;
        let client: Client = serde_json::from_str(json).unwrap();
        assert!(client.address.is_none());
        assert!(client.phones.is_empty());

        let json = r#"{"id": 1, "nome": "Ana", "cpf": "1"}"#;
        let client: Client = serde_json::from_str(json).unwrap();
        assert!(client.phones.is_empty());
    }

    #[test]
    fn payload_omits_empty_optionals_and_id() {
        let payload = ClientPayload {
            id: None,
            name: "Ana".to_string(),
            social_name: None,
            email: None,
            cpf: "12345678901".to_string(),
            address: Address::default(),
            phones: vec![Phone {
                id: None,
                area_code: "11".to_string(),
                number: "912345678".to_string(),
            }],
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("nomeSocial").is_none());
        assert!(json.get("email").is_none());
        assert!(json["endereco"].get("informacoesAdicionais").is_none());
        assert_eq!(json["nome"], "Ana");
        assert_eq!(json["telefones"][0]["ddd"], "11");
        assert!(json["telefones"][0].get("id").is_none());
    }
}

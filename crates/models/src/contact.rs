use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::validation::{as_object, deny_unknown, optional_string, required_string, validate_email};

/// Keys owned by [`Contact`]; everything else in a stored record lands in `extra`.
pub const CONTACT_FIELDS: [&str; 4] = ["id", "name", "email", "phone"];

/// Keys a client may send in a contact body.
const BODY_FIELDS: [&str; 3] = ["name", "email", "phone"];

/// Length of generated contact identifiers.
pub const CONTACT_ID_LEN: usize = 20;

/// A contact record as stored in the contacts document.
///
/// Fields the record does not know about are kept in `extra` and written back
/// unchanged, so hand-edited documents survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(deserialize_with = "de_contact_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Identifiers are strings. Documents written by older tools may carry numbers,
/// which are read as their decimal text so lookups and mutations agree.
fn de_contact_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

impl Contact {
    pub fn new(id: impl Into<String>, input: ContactInput) -> Self {
        Self {
            id: id.into(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            extra: Map::new(),
        }
    }

    /// Shallow merge: fields present in `patch` overwrite, absent ones stay.
    pub fn merge(&mut self, patch: ContactPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        for (key, value) in patch.extra {
            // never let a free-form key shadow a typed field on serialization
            if !CONTACT_FIELDS.contains(&key.as_str()) {
                self.extra.insert(key, value);
            }
        }
    }
}

/// Validated body for creating or replacing a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ContactInput {
    /// Validate a raw JSON body: all three fields required, nothing else allowed.
    pub fn from_json(body: &Value) -> Result<Self, ModelError> {
        let obj = as_object(body)?;
        let name = required_string(obj, "name")?;
        let email = required_string(obj, "email")?;
        validate_email("email", &email)?;
        let phone = required_string(obj, "phone")?;
        deny_unknown(obj, &BODY_FIELDS)?;
        Ok(Self { name, email, phone })
    }
}

impl From<ContactInput> for ContactPatch {
    fn from(input: ContactInput) -> Self {
        Self {
            name: Some(input.name),
            email: Some(input.email),
            phone: Some(input.phone),
            extra: Map::new(),
        }
    }
}

/// Partial update applied by [`Contact::merge`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub extra: Map<String, Value>,
}

impl ContactPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.extra.is_empty()
    }

    /// Validate a raw JSON body for a partial update: at least one known field,
    /// each present field valid, unknown fields rejected.
    pub fn from_json(body: &Value) -> Result<Self, ModelError> {
        let obj = as_object(body)?;
        let name = optional_string(obj, "name")?;
        let email = optional_string(obj, "email")?;
        if let Some(email) = &email {
            validate_email("email", email)?;
        }
        let phone = optional_string(obj, "phone")?;
        deny_unknown(obj, &BODY_FIELDS)?;
        let patch = Self { name, email, phone, extra: Map::new() };
        if patch.is_empty() {
            return Err(ModelError::validation("\"value\" must have at least 1 key"));
        }
        Ok(patch)
    }
}

/// 20 lowercase hex characters taken from a v4 UUID with separators stripped.
pub fn generate_contact_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(CONTACT_ID_LEN);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ann() -> Contact {
        Contact::new(
            "a1",
            ContactInput { name: "Ann".into(), email: "ann@x.com".into(), phone: "123".into() },
        )
    }

    #[test]
    fn generated_ids_are_20_hex_chars() {
        let a = generate_contact_id();
        let b = generate_contact_id();
        assert_eq!(a.len(), CONTACT_ID_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(a, b);
    }

    #[test]
    fn numeric_ids_read_as_strings() {
        let c: Contact = serde_json::from_value(json!({
            "id": 7, "name": "N", "email": "n@x.com", "phone": "1"
        }))
        .unwrap();
        assert_eq!(c.id, "7");
    }

    #[test]
    fn extra_fields_survive_round_trip() {
        let raw = json!({"id": "a1", "name": "Ann", "email": "ann@x.com", "phone": "123", "favorite": true});
        let c: Contact = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(c.extra.get("favorite"), Some(&json!(true)));
        assert_eq!(serde_json::to_value(&c).unwrap(), raw);
    }

    #[test]
    fn missing_typed_field_fails_to_decode() {
        let res = serde_json::from_value::<Contact>(json!({"id": "a1", "name": "Ann"}));
        assert!(res.is_err());
    }

    #[test]
    fn merge_overwrites_only_present_fields() {
        let mut c = ann();
        c.merge(ContactPatch::default().phone("999"));
        assert_eq!(c.name, "Ann");
        assert_eq!(c.email, "ann@x.com");
        assert_eq!(c.phone, "999");
        assert_eq!(c.id, "a1");
    }

    #[test]
    fn merge_ignores_extra_keys_naming_typed_fields() {
        let mut c = ann();
        let mut extra = Map::new();
        extra.insert("id".into(), json!("hijack"));
        extra.insert("note".into(), json!("vip"));
        c.merge(ContactPatch { extra, ..ContactPatch::default() });
        assert_eq!(c.id, "a1");
        assert!(!c.extra.contains_key("id"));
        assert_eq!(c.extra.get("note"), Some(&json!("vip")));
    }

    #[test]
    fn input_validation_messages() {
        let err = |v: Value| ContactInput::from_json(&v).unwrap_err().to_string();
        assert_eq!(err(json!({"email": "a@b.co", "phone": "1"})), "\"name\" is required");
        assert_eq!(err(json!({"name": "A", "email": "nope", "phone": "1"})), "\"email\" must be a valid email");
        assert_eq!(
            err(json!({"name": "A", "email": "a@b.co", "phone": "1", "id": "x"})),
            "\"id\" is not allowed"
        );
        let ok = ContactInput::from_json(&json!({"name": "A", "email": "a@b.co", "phone": "1"})).unwrap();
        assert_eq!(ok.name, "A");
    }

    #[test]
    fn patch_requires_at_least_one_field() {
        assert!(ContactPatch::from_json(&json!({})).is_err());
        let p = ContactPatch::from_json(&json!({"phone": "P2"})).unwrap();
        assert_eq!(p, ContactPatch::default().phone("P2"));
        assert!(ContactPatch::from_json(&json!({"email": "bad"})).is_err());
    }
}

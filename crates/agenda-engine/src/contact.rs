//! Contact lookup and the contact-card render model.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AgendaError, Result};

/// Name shown for contacts the provider sent without one.
pub const DEFAULT_NAME: &str = "No Name";

/// A single contact record from the contacts provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default = "default_name", deserialize_with = "name_or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub organization: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub photo: String,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn name_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.filter(|n| !n.is_empty()).unwrap_or_else(default_name))
}

fn string_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// First contact whose name contains `query`, ignoring case.
///
/// An empty or all-whitespace query matches nothing.
pub fn find_contact<'a>(contacts: &'a [Contact], query: &str) -> Option<&'a Contact> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    contacts
        .iter()
        .find(|c| c.name.to_lowercase().contains(&needle))
}

/// The contacts provider's response envelope for a single-contact query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searched_for: Option<String>,
}

impl ContactResponse {
    /// # Errors
    /// `AgendaError::ContactNotFound` when the provider succeeded without a
    /// contact or answered "Contact not found"; `AgendaError::Provider` for any
    /// other failure.
    pub fn into_contact(self) -> Result<Contact> {
        let searched_for = self.searched_for.unwrap_or_default();
        match (self.success, self.contact) {
            (true, Some(contact)) => Ok(contact),
            (true, None) => Err(AgendaError::ContactNotFound(searched_for)),
            (false, _) => match self.error {
                Some(error) if error == "Contact not found" => {
                    Err(AgendaError::ContactNotFound(searched_for))
                }
                Some(error) => Err(AgendaError::Provider(error)),
                None => Err(AgendaError::Provider("Failed to load contact".to_string())),
            },
        }
    }
}

/// Text the presentation layer should place on the clipboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardPayload {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    Email,
    Phone,
    Organization,
}

impl DetailKind {
    pub fn label(self) -> &'static str {
        match self {
            DetailKind::Email => "Email",
            DetailKind::Phone => "Phone",
            DetailKind::Organization => "Organization",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetail {
    pub kind: DetailKind,
    pub label: String,
    pub value: String,
    pub copy: ClipboardPayload,
}

/// Render model for the contact page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCard {
    pub name: String,
    /// Uppercased first letter of the name, for the avatar placeholder.
    pub initial: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Email, phone and organization, in that order, when present.
    pub details: Vec<ContactDetail>,
}

impl From<&Contact> for ContactCard {
    fn from(contact: &Contact) -> Self {
        let details = [
            (DetailKind::Email, &contact.email),
            (DetailKind::Phone, &contact.phone),
            (DetailKind::Organization, &contact.organization),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(kind, value)| ContactDetail {
            kind,
            label: kind.label().to_string(),
            value: value.clone(),
            copy: ClipboardPayload {
                text: value.clone(),
            },
        })
        .collect();

        Self {
            name: contact.name.clone(),
            initial: contact
                .name
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect())
                .unwrap_or_default(),
            photo: (!contact.photo.is_empty()).then(|| contact.photo.clone()),
            details,
        }
    }
}

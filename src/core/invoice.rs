//! Invoice record and line item types
//!
//! [`InvoiceRecord`] is the persisted row shape. The `items` column is always
//! written as a native JSON array but older rows stored it as a JSON string,
//! so both are accepted on read (see [`items_column`]).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One billable line
///
/// `id` is an opaque token that must survive edit round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(rename = "unitPrice", alias = "unit_price", alias = "price", default)]
    pub unit_price: f64,
}

impl LineItem {
    /// New line item with a fresh id
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description: description.into(),
            quantity,
            unit_price,
        }
    }
}

/// Sender or recipient contact block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Party {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "optional_email"))]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

fn optional_email(value: &str) -> Result<(), validator::ValidationError> {
    use validator::ValidateEmail;

    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("email");
        err.message = Some("Enter a valid email address".into());
        Err(err)
    }
}

/// A persisted invoice row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,

    pub company_name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub company_address: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub company_email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub company_phone: Option<String>,

    pub client_name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub client_address: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub client_email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub client_phone: Option<String>,

    #[serde(with = "items_column")]
    pub items: Vec<LineItem>,

    pub subtotal: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub tax_rate: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub tax_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<f64>,
    pub total_amount: f64,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub notes: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub terms: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl InvoiceRecord {
    pub fn company(&self) -> Party {
        Party {
            name: self.company_name.clone(),
            email: self.company_email.clone().unwrap_or_default(),
            address: self.company_address.clone().unwrap_or_default(),
            phone: self.company_phone.clone().unwrap_or_default(),
        }
    }

    pub fn client(&self) -> Party {
        Party {
            name: self.client_name.clone(),
            email: self.client_email.clone().unwrap_or_default(),
            address: self.client_address.clone().unwrap_or_default(),
            phone: self.client_phone.clone().unwrap_or_default(),
        }
    }

    pub fn is_owned_by(&self, user_id: &Uuid) -> bool {
        &self.user_id == user_id
    }
}

/// Blank text columns read as `None`, the same shape the form mapper writes
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|v| !v.trim().is_empty()))
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// Read-compatible encoding for the `items` column
///
/// Writes a native array. Reads a native array or a string holding a JSON
/// array.
pub mod items_column {
    use super::LineItem;
    use crate::core::mapper::decode_items;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(items: &[LineItem], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        items.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<LineItem>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?.unwrap_or_default();
        decode_items(value).map_err(D::Error::custom)
    }
}

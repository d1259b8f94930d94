use chrono::{DateTime, Utc};
use entity::addresses;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub id: Uuid,
    #[schema(example = "Home")]
    pub label: Option<String>,
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub apartment: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2
    #[schema(example = "US")]
    pub country: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<addresses::Model> for Address {
    fn from(model: addresses::Model) -> Self {
        Self {
            id: model.id,
            label: model.label,
            full_name: model.full_name,
            phone: model.phone,
            street: model.street,
            apartment: model.apartment,
            city: model.city,
            state: model.state,
            postal_code: model.postal_code,
            country: model.country,
            is_default: model.is_default,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAddress {
    #[validate(length(max = 50))]
    pub label: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(length(min = 5, max = 20))]
    pub phone: String,
    #[validate(length(min = 1, max = 255))]
    pub street: String,
    #[validate(length(max = 100))]
    pub apartment: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(min = 2, max = 20))]
    pub postal_code: String,
    #[validate(length(equal = 2))]
    pub country: String,
    /// The first address is always made default
    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAddress {
    #[validate(length(max = 50))]
    pub label: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub full_name: Option<String>,
    #[validate(length(min = 5, max = 20))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub street: Option<String>,
    #[validate(length(max = 100))]
    pub apartment: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(min = 2, max = 20))]
    pub postal_code: Option<String>,
    #[validate(length(equal = 2))]
    pub country: Option<String>,
    pub is_default: Option<bool>,
}

impl UpdateAddress {
    /// Copy the provided fields onto a row
    pub fn apply(self, model: &mut addresses::Model) {
        if let Some(label) = self.label {
            model.label = Some(label);
        }
        if let Some(full_name) = self.full_name {
            model.full_name = full_name;
        }
        if let Some(phone) = self.phone {
            model.phone = phone;
        }
        if let Some(street) = self.street {
            model.street = street;
        }
        if let Some(apartment) = self.apartment {
            model.apartment = Some(apartment);
        }
        if let Some(city) = self.city {
            model.city = city;
        }
        if let Some(state) = self.state {
            model.state = Some(state);
        }
        if let Some(postal_code) = self.postal_code {
            model.postal_code = postal_code;
        }
        if let Some(country) = self.country {
            model.country = country.to_uppercase();
        }
        if let Some(is_default) = self.is_default {
            model.is_default = is_default;
        }
    }
}

/// Build the row for a new address
pub fn new_model(user_id: Uuid, input: CreateAddress, is_default: bool) -> addresses::Model {
    let now = Utc::now().into();
    addresses::Model {
        id: Uuid::new_v4(),
        user_id,
        label: input.label,
        full_name: input.full_name,
        phone: input.phone,
        street: input.street,
        apartment: input.apartment,
        city: input.city,
        state: input.state,
        postal_code: input.postal_code,
        country: input.country.to_uppercase(),
        is_default,
        created_at: now,
        updated_at: now,
    }
}

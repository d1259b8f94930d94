use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub label: Option<String>,
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub apartment: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Single-line form stored on orders.
    pub fn snapshot(&self) -> String {
        let mut parts = vec![self.full_name.clone(), self.phone.clone()];
        match &self.apartment {
            Some(apartment) if !apartment.is_empty() => {
                parts.push(format!("{}, {}", self.street, apartment))
            }
            _ => parts.push(self.street.clone()),
        }
        match &self.state {
            Some(state) if !state.is_empty() => {
                parts.push(format!("{}, {} {}", self.city, state, self.postal_code))
            }
            _ => parts.push(format!("{} {}", self.city, self.postal_code)),
        }
        parts.push(self.country.clone());
        parts.join(", ")
    }
}

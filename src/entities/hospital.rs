//! Hospital entity - A hospital and the doctors practicing there.
//!
//! The many-to-many link to doctors is an embedded list of doctor IDs.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A list of short strings (facility tags, doctor IDs) stored as a JSON column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StringList(pub Vec<String>);

/// Hospital database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hospitals")]
pub struct Model {
    /// Opaque document identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Hospital name
    pub name: String,
    /// Hospital type, `General` unless specified
    pub hospital_type: String,
    /// Street address
    pub address: String,
    /// Phone number
    pub phone: String,
    /// Contact e-mail
    pub email: String,
    /// Founding year or date, free-form
    pub established_at: Option<String>,
    /// Facility tags from the fixed option list
    #[sea_orm(column_type = "Json")]
    pub facilities: StringList,
    /// IDs of doctors practicing at this hospital
    #[sea_orm(column_type = "Json")]
    pub doctor_ids: StringList,
    /// When the hospital was created
    pub created_at: DateTimeUtc,
}

/// Hospitals are referenced by convention only; no foreign keys are declared.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::query::property::{PropertyRegistry, PropertyValue, Record};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub id: i64,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub email: String,
    pub registration_date: DateTime<Utc>,
    pub favorite_animal: Option<Animal>,
}

fn favorite_animal(user: &User) -> Option<&Animal> {
    user.favorite_animal.as_ref()
}

// Column expressions assume the aliases used by the database backend:
// `u` for users and `a` for animals.
lazy_static! {
    static ref ANIMAL_PROPERTIES: PropertyRegistry<Animal> = PropertyRegistry::<Animal>::new()
        .with("id", "a.id", |a: &Animal| PropertyValue::Int(a.id))
        .with("name", "a.name", |a: &Animal| PropertyValue::Text(a.name.clone()));

    static ref USER_PROPERTIES: PropertyRegistry<User> = PropertyRegistry::<User>::new()
        .with("id", "u.id", |u: &User| PropertyValue::Int(u.id))
        .with("userName", "u.user_name", |u: &User| {
            PropertyValue::Text(u.user_name.clone())
        })
        .with("email", "u.email", |u: &User| PropertyValue::Text(u.email.clone()))
        .with("registrationDate", "u.registration_date", |u: &User| {
            PropertyValue::DateTime(u.registration_date)
        })
        .nest("favoriteAnimal", &*ANIMAL_PROPERTIES, favorite_animal);
}

impl Record for Animal {
    fn registry() -> &'static PropertyRegistry<Self> {
        &ANIMAL_PROPERTIES
    }
}

impl Record for User {
    fn registry() -> &'static PropertyRegistry<Self> {
        &USER_PROPERTIES
    }
}

/// Pagination envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResult<T> {
    pub page: usize,
    pub page_size: usize,
    pub total_count: i64,
    pub data: Vec<T>,
}

//! Presence-aware field wrapper for partial updates.
//!
//! A JSON body can omit a field, send it as `null`, or send a value. Those
//! are three different requests: omitted leaves the stored value alone,
//! `null` clears a nullable column, a value overwrites it. `Option<T>` can
//! only express two of them.
//!
//! Fields must carry `#[serde(default)]` so an omitted key becomes
//! [`Patch::Missing`].

use serde::{Deserialize, Deserializer};

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Missing,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Missing
    }
}

impl<T> Patch<T> {
    /// Target value for a nullable column: `None` when absent, `Some(None)`
    /// to clear it.
    pub fn into_nullable(self) -> Option<Option<T>> {
        match self {
            Patch::Missing => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }

    /// Target value for a NOT NULL column; an explicit `null` is rejected.
    pub fn into_required(self, field: &str) -> AppResult<Option<T>> {
        match self {
            Patch::Missing => Ok(None),
            Patch::Null => Err(AppError::validation(format!("{} cannot be null", field))),
            Patch::Value(v) => Ok(Some(v)),
        }
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

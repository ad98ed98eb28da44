//! Staged edits over a fetched entity.
//!
//! A [`StagedEdit`] keeps the last snapshot received from the API next to a
//! sparse overlay of values the user picked but has not committed. The
//! overlay is diffed against the snapshot field by field, so a commit only
//! ever sends what actually changed.
//!
//! Values are compared as JSON, which keeps `null` and `false` apart: a
//! tri-state override set back to "inherit" is a real change.

use std::{collections::BTreeMap, marker::PhantomData};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::error::{MiniAppError, Result};

static NULL: Value = Value::Null;

/// Which fields of an entity a page may stage.
pub trait EditSchema {
    /// Entity name used in error messages.
    const ENTITY: &'static str;
    const FIELDS: &'static [&'static str];

    /// Rejects values the entity can never hold.
    fn validate(_snapshot: &Map<String, Value>, _field: &str, _value: &Value) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct TransactionEdit;

impl EditSchema for TransactionEdit {
    const ENTITY: &'static str = "transaction";
    const FIELDS: &'static [&'static str] = &[
        "account_id",
        "subcategory_id",
        "linked_transaction_hash",
        "override_reimbursable",
        "description",
    ];

    fn validate(snapshot: &Map<String, Value>, field: &str, value: &Value) -> Result<()> {
        if field == "linked_transaction_hash"
            && !value.is_null()
            && snapshot.get("unique_hash") == Some(value)
        {
            return Err(MiniAppError::SelfLink);
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct AccountEdit;

impl EditSchema for AccountEdit {
    const ENTITY: &'static str = "account";
    const FIELDS: &'static [&'static str] = &["name", "account_type", "purpose"];
}

#[derive(Debug)]
pub struct SubcategoryEdit;

impl EditSchema for SubcategoryEdit {
    const ENTITY: &'static str = "subcategory";
    const FIELDS: &'static [&'static str] = &["is_reimbursable", "exclude_from_budget"];
}

#[derive(Debug)]
pub struct StagedEdit<S> {
    original: Map<String, Value>,
    staged: BTreeMap<&'static str, Value>,
    schema: PhantomData<S>,
}

impl<S> Clone for StagedEdit<S> {
    fn clone(&self) -> Self {
        Self {
            original: self.original.clone(),
            staged: self.staged.clone(),
            schema: PhantomData,
        }
    }
}

impl<S: EditSchema> StagedEdit<S> {
    /// Snapshots `entity`, which must serialize to a JSON object.
    pub fn new<E: Serialize>(entity: &E) -> Result<Self> {
        match serde_json::to_value(entity)? {
            Value::Object(original) => Ok(Self::from_snapshot(original)),
            other => Err(MiniAppError::validation(format!(
                "{} snapshot is not an object: {other}",
                S::ENTITY
            ))),
        }
    }

    pub fn from_snapshot(original: Map<String, Value>) -> Self {
        Self {
            original,
            staged: BTreeMap::new(),
            schema: PhantomData,
        }
    }

    fn field_key(field: &str) -> Result<&'static str> {
        S::FIELDS
            .iter()
            .copied()
            .find(|known| *known == field)
            .ok_or_else(|| MiniAppError::UnknownField {
                entity: S::ENTITY,
                field: field.to_string(),
            })
    }

    /// Records a tentative value. Staging the original value back clears the
    /// field from the overlay.
    pub fn stage<V: Serialize>(&mut self, field: &str, value: V) -> Result<()> {
        let key = Self::field_key(field)?;
        let value = serde_json::to_value(value)?;
        S::validate(&self.original, key, &value)?;

        if self.original.get(key).unwrap_or(&NULL) == &value {
            self.staged.remove(key);
        } else {
            self.staged.insert(key, value);
        }
        Ok(())
    }

    pub fn unstage(&mut self, field: &str) {
        self.staged.retain(|key, _| *key != field);
    }

    /// The overlay value for `field`, if the user touched it.
    pub fn staged(&self, field: &str) -> Option<&Value> {
        self.staged.get(field)
    }

    /// Puts `field` back to a previously observed overlay state.
    pub fn restore(&mut self, field: &str, previous: Option<Value>) -> Result<()> {
        match previous {
            Some(value) => self.stage(field, value),
            None => {
                self.unstage(field);
                Ok(())
            }
        }
    }

    /// Staged value if any, otherwise the original one.
    pub fn current(&self, field: &str) -> &Value {
        self.staged
            .get(field)
            .or_else(|| self.original.get(field))
            .unwrap_or(&NULL)
    }

    /// [`current`](Self::current) decoded into `T`; `None` when absent or of
    /// another shape.
    pub fn current_as<T: DeserializeOwned>(&self, field: &str) -> Option<T> {
        serde_json::from_value(self.current(field).clone()).ok()
    }

    /// Fields whose staged value differs from the snapshot.
    pub fn diff(&self) -> Map<String, Value> {
        self.staged
            .iter()
            .filter(|(key, value)| self.original.get(**key).unwrap_or(&NULL) != *value)
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        !self.diff().is_empty()
    }

    /// Folds the overlay into the snapshot after the server accepted it.
    pub fn commit_succeeded(&mut self) {
        for (key, value) in std::mem::take(&mut self.staged) {
            self.original.insert(key.to_string(), value);
        }
    }

    /// Drops every staged value; the snapshot is untouched.
    pub fn discard(&mut self) {
        self.staged.clear();
    }

    pub fn original(&self) -> &Map<String, Value> {
        &self.original
    }
}

//! Nested-type resolution by wire key.
//!
//! Each model declares, in [`Model::NESTED`], which of its wire keys hold
//! other models. There is no global registry: a model only knows the nested
//! types it references itself.

use std::any::{Any, TypeId};
use std::fmt;

use serde_json::Value;

use crate::error::DecodeError;
use crate::model::{decode, Model};

/// A type-erased decoded model.
pub(crate) type AnyModel = Box<dyn Any + Send>;

/// A type tag for a [`Model`]: its name plus a function that decodes a
/// payload into it.
///
/// Two tags are equal only when they describe the same Rust type; sharing a
/// [`Model::NAME`] is not enough.
#[derive(Clone, Copy)]
pub struct ModelType {
    name: &'static str,
    type_id: fn() -> TypeId,
    decode: fn(&Value) -> Result<AnyModel, DecodeError>,
}

impl ModelType {
    /// The tag for model `M`. Usable in `const` tables.
    pub const fn of<M: Model>() -> Self {
        Self {
            name: M::NAME,
            type_id: TypeId::of::<M>,
            decode: decode_erased::<M>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `true` if this tag describes model `M`.
    pub fn is<M: Model>(&self) -> bool {
        (self.type_id)() == TypeId::of::<M>()
    }

    pub(crate) fn decode(&self, payload: &Value) -> Result<AnyModel, DecodeError> {
        (self.decode)(payload)
    }
}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelType").field(&self.name).finish()
    }
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        (self.type_id)() == (other.type_id)()
    }
}

impl Eq for ModelType {}

fn decode_erased<M: Model>(payload: &Value) -> Result<AnyModel, DecodeError> {
    decode::<M>(payload).map(|model| Box::new(model) as AnyModel)
}

/// Look `key` up in a nested-type table.
///
/// `None` means "no override": the field is kept as opaque JSON.
pub fn resolve(table: &[(&'static str, ModelType)], key: &str) -> Option<ModelType> {
    table
        .iter()
        .find(|(wire, _)| *wire == key)
        .map(|(_, model_type)| *model_type)
}

/// The concrete type model `M` declares for its nested field `key`.
pub fn resolve_type<M: Model>(key: &str) -> Option<ModelType> {
    resolve(M::NESTED, key)
}

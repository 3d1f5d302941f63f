//! The [`Model`] contract and the generic decode routine.
//!
//! A model is described by static tables rather than hand-written parsing
//! code:
//!
//! - [`Model::FIELDS`] maps each wire key to an attribute id, a
//!   [`FieldKind`], and a required flag.
//! - [`Model::NESTED`] maps wire keys of nested objects to their
//!   [`ModelType`].
//! - [`Model::CONNECTION_TARGETS`] records the expected target type of each
//!   connection key.
//!
//! [`decode`] walks those tables once, producing a [`Fields`] bag and a
//! [`ConnectionMap`], and hands both to [`Model::from_fields`], which moves
//! the values into the model's typed fields.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::connection::{build_connections, ConnectionMap};
use crate::enums::WireEnum;
use crate::error::DecodeError;
use crate::resolve::{resolve_type, AnyModel, ModelType};
use crate::value::{self, FieldKind};

/// Wire key of the metadata block that carries a model's connections.
pub const METADATA_KEY: &str = "metadata";

// ---------------------------------------------------------------------------
// Field table
// ---------------------------------------------------------------------------

/// One row of a model's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec<A: 'static> {
    /// The key as it appears in the payload, e.g. `"created_time"`.
    pub key: &'static str,
    /// The attribute this key populates.
    pub attr: A,
    pub kind: FieldKind,
    /// A required field that is missing or uncoercible fails the decode.
    pub required: bool,
}

impl<A: 'static> FieldSpec<A> {
    pub const fn required(key: &'static str, attr: A, kind: FieldKind) -> Self {
        Self {
            key,
            attr,
            kind,
            required: true,
        }
    }

    pub const fn optional(key: &'static str, attr: A, kind: FieldKind) -> Self {
        Self {
            key,
            attr,
            kind,
            required: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// A typed record decoded from an API payload.
pub trait Model: Sized + Send + 'static {
    /// Short lowercase name used in errors and logs, e.g. `"folder"`.
    /// Should be unique within an API; type identity does not depend on it.
    const NAME: &'static str;

    /// Attribute identifiers, usually a fieldless enum.
    type Attr: Copy + Eq + Hash + Debug + Send + 'static;

    /// The closed set of connection names this model understands.
    type ConnectionKey: WireEnum;

    /// Wire key → attribute table.
    const FIELDS: &'static [FieldSpec<Self::Attr>];

    /// Wire key → nested model type table.
    const NESTED: &'static [(&'static str, ModelType)] = &[];

    /// Expected target type per connection key. Keys not listed have no
    /// declared target.
    const CONNECTION_TARGETS: &'static [(Self::ConnectionKey, ModelType)] = &[];

    /// Build the model from decoded attributes and connections.
    fn from_fields(
        fields: Fields<Self::Attr>,
        connections: ConnectionMap<Self::ConnectionKey>,
    ) -> Result<Self, DecodeError>;

    fn connections(&self) -> &ConnectionMap<Self::ConnectionKey>;
}

/// Decode a raw payload into model `M`.
///
/// Keys missing from `M::FIELDS` are ignored. JSON `null` counts as absent.
pub fn decode<M: Model>(payload: &Value) -> Result<M, DecodeError> {
    let object = payload
        .as_object()
        .ok_or(DecodeError::NotAnObject { model: M::NAME })?;

    let mut fields = Fields::new(M::NAME, M::FIELDS);

    for spec in M::FIELDS {
        let raw = match object.get(spec.key) {
            None | Some(Value::Null) => None,
            Some(raw) => Some(raw),
        };
        let Some(raw) = raw else {
            if spec.required {
                return Err(DecodeError::MissingRequiredField {
                    model: M::NAME,
                    key: spec.key,
                });
            }
            continue;
        };

        match map_field::<M>(spec, raw)? {
            Some(value) => fields.insert(spec.attr, value),
            None if spec.required => {
                return Err(DecodeError::InvalidField {
                    model: M::NAME,
                    key: spec.key,
                    expected: spec.kind.describe(),
                });
            }
            None => debug!(
                "{}: ignoring {:?}, not {}",
                M::NAME,
                spec.key,
                spec.kind.describe()
            ),
        }
    }

    let connections = object
        .get(METADATA_KEY)
        .map(build_connections::<M>)
        .unwrap_or_default();

    M::from_fields(fields, connections)
}

/// The connections of a decoded model.
pub fn connections<M: Model>(model: &M) -> &ConnectionMap<M::ConnectionKey> {
    model.connections()
}

// Coerce one present value. `Ok(None)` means absent; `Err` is reserved for
// required nested fields whose own decode failed.
fn map_field<M: Model>(
    spec: &FieldSpec<M::Attr>,
    raw: &Value,
) -> Result<Option<FieldValue>, DecodeError> {
    let value = match spec.kind {
        FieldKind::String => value::coerce_string(raw).map(FieldValue::String),
        FieldKind::Integer => value::coerce_i64(raw).map(FieldValue::Integer),
        FieldKind::Number => value::coerce_f64(raw).map(FieldValue::Number),
        FieldKind::Bool => value::coerce_bool(raw).map(FieldValue::Bool),
        FieldKind::Timestamp => value::coerce_timestamp(raw).map(FieldValue::Timestamp),
        FieldKind::StringList => value::coerce_string_list(raw).map(FieldValue::StringList),
        FieldKind::Json => Some(FieldValue::Json(raw.clone())),
        FieldKind::Model => match resolve_type::<M>(spec.key) {
            None => Some(FieldValue::Json(raw.clone())),
            Some(model_type) => match model_type.decode(raw) {
                Ok(model) => Some(FieldValue::Model(model)),
                Err(e) => return nested_failure::<M>(spec, e),
            },
        },
        FieldKind::ModelList => match resolve_type::<M>(spec.key) {
            None => Some(FieldValue::Json(raw.clone())),
            Some(model_type) => {
                let Some(items) = raw.as_array() else {
                    return Ok(None);
                };
                let decoded: Result<Vec<_>, _> =
                    items.iter().map(|item| model_type.decode(item)).collect();
                match decoded {
                    Ok(models) => Some(FieldValue::ModelList(models)),
                    Err(e) => return nested_failure::<M>(spec, e),
                }
            }
        },
    };
    Ok(value)
}

fn nested_failure<M: Model>(
    spec: &FieldSpec<M::Attr>,
    error: DecodeError,
) -> Result<Option<FieldValue>, DecodeError> {
    if spec.required {
        return Err(DecodeError::NestedDecodeFailure {
            model: M::NAME,
            key: spec.key,
            source: Box::new(error),
        });
    }
    warn!("{}: nested field {:?} dropped: {error}", M::NAME, spec.key);
    Ok(None)
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

pub(crate) enum FieldValue {
    String(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    StringList(Vec<String>),
    Model(AnyModel),
    ModelList(Vec<AnyModel>),
    Json(Value),
}

/// The decoded attributes of one payload, keyed by attribute id.
///
/// Each accessor moves the value out; asking for the wrong type, or for an
/// attribute that was absent, yields `None`.
pub struct Fields<A: 'static> {
    model: &'static str,
    specs: &'static [FieldSpec<A>],
    values: HashMap<A, FieldValue>,
}

impl<A: Copy + Eq + Hash + 'static> Fields<A> {
    fn new(model: &'static str, specs: &'static [FieldSpec<A>]) -> Self {
        Self {
            model,
            specs,
            values: HashMap::with_capacity(specs.len()),
        }
    }

    fn insert(&mut self, attr: A, value: FieldValue) {
        self.values.insert(attr, value);
    }

    /// `true` if the attribute was present and coerced.
    pub fn contains(&self, attr: A) -> bool {
        self.values.contains_key(&attr)
    }

    pub fn string(&mut self, attr: A) -> Option<String> {
        match self.values.remove(&attr) {
            Some(FieldValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn integer(&mut self, attr: A) -> Option<i64> {
        match self.values.remove(&attr) {
            Some(FieldValue::Integer(i)) => Some(i),
            _ => None,
        }
    }

    pub fn number(&mut self, attr: A) -> Option<f64> {
        match self.values.remove(&attr) {
            Some(FieldValue::Number(n)) => Some(n),
            _ => None,
        }
    }

    pub fn boolean(&mut self, attr: A) -> Option<bool> {
        match self.values.remove(&attr) {
            Some(FieldValue::Bool(b)) => Some(b),
            _ => None,
        }
    }

    pub fn timestamp(&mut self, attr: A) -> Option<DateTime<Utc>> {
        match self.values.remove(&attr) {
            Some(FieldValue::Timestamp(t)) => Some(t),
            _ => None,
        }
    }

    pub fn strings(&mut self, attr: A) -> Option<Vec<String>> {
        match self.values.remove(&attr) {
            Some(FieldValue::StringList(items)) => Some(items),
            _ => None,
        }
    }

    /// The nested model stored under `attr`, if it decoded as `M`.
    pub fn model<M: Model>(&mut self, attr: A) -> Option<M> {
        match self.values.remove(&attr) {
            Some(FieldValue::Model(any)) => any.downcast::<M>().ok().map(|m| *m),
            _ => None,
        }
    }

    pub fn models<M: Model>(&mut self, attr: A) -> Option<Vec<M>> {
        match self.values.remove(&attr) {
            Some(FieldValue::ModelList(items)) => items
                .into_iter()
                .map(|any| any.downcast::<M>().ok().map(|m| *m))
                .collect(),
            _ => None,
        }
    }

    /// The raw JSON stored under `attr`, for opaque fields.
    pub fn json(&mut self, attr: A) -> Option<Value> {
        match self.values.remove(&attr) {
            Some(FieldValue::Json(v)) => Some(v),
            _ => None,
        }
    }

    /// A string attribute coerced through enum `E`.
    pub fn enumeration<E: WireEnum>(&mut self, attr: A) -> Option<E> {
        self.string(attr).and_then(|raw| E::coerce(&raw))
    }

    pub fn require_string(&mut self, attr: A) -> Result<String, DecodeError> {
        self.string(attr).ok_or_else(|| self.missing(attr))
    }

    pub fn require_timestamp(&mut self, attr: A) -> Result<DateTime<Utc>, DecodeError> {
        self.timestamp(attr).ok_or_else(|| self.missing(attr))
    }

    fn missing(&self, attr: A) -> DecodeError {
        let key = self
            .specs
            .iter()
            .find(|spec| spec.attr == attr)
            .map(|spec| spec.key)
            .unwrap_or("<undeclared>");
        DecodeError::MissingRequiredField {
            model: self.model,
            key,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

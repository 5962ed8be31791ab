//! Argument sources and the resolver that projects them onto a parameter list.
//!
//! A source is either a keyed mapping (`HashMap`/`BTreeMap` with string keys)
//! or a struct registered with [`record!`](crate::record), which declares its
//! fields and their tags once at compile time.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use crate::naming::Naming;
use crate::value::Value;
use crate::{Error, Result};

/// Something placeholder values can be looked up in by name.
pub trait ArgumentSource {
    /// Returns the value for the placeholder `name`, or `None` if this source
    /// has no such parameter.
    fn lookup(&self, name: &str, naming: &Naming) -> Option<Value>;
}

impl<T> ArgumentSource for &T
where
    T: ArgumentSource + ?Sized,
{
    fn lookup(&self, name: &str, naming: &Naming) -> Option<Value> {
        (**self).lookup(name, naming)
    }
}

impl<K, V, S> ArgumentSource for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: Clone + Into<Value>,
    S: BuildHasher,
{
    fn lookup(&self, name: &str, _naming: &Naming) -> Option<Value> {
        self.get(name).cloned().map(Into::into)
    }
}

impl<K, V> ArgumentSource for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: Clone + Into<Value>,
{
    fn lookup(&self, name: &str, _naming: &Naming) -> Option<Value> {
        self.get(name).cloned().map(Into::into)
    }
}

/// Static declaration of one struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: &'static str,
    /// `(tag key, tag value)` pairs, e.g. `("db", "user_id")`.
    pub tags: &'static [(&'static str, &'static str)],
}

impl FieldDecl {
    pub const fn new(name: &'static str, tags: &'static [(&'static str, &'static str)]) -> Self {
        Self { name, tags }
    }

    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

/// A struct whose fields can be bound by name.
///
/// Implement it with [`record!`](crate::record) rather than by hand.
pub trait Record {
    fn fields(&self) -> &'static [FieldDecl];

    /// Value of the field declared as `field`.
    fn field_value(&self, field: &str) -> Option<Value>;
}

/// Finds the field answering to `name` and returns its value.
///
/// A field tagged under the naming's tag key answers only to its tag. Tags
/// are checked first across all fields; untagged fields then answer to their
/// mapped declared name. The first match wins.
pub fn lookup_record<R>(record: &R, name: &str, naming: &Naming) -> Option<Value>
where
    R: Record + ?Sized,
{
    let fields = record.fields();
    let tag_key = naming.tag_key();
    let field = fields
        .iter()
        .find(|field| field.tag(tag_key) == Some(name))
        .or_else(|| {
            fields
                .iter()
                .filter(|field| field.tag(tag_key).is_none())
                .find(|field| naming.map_name(field.name) == name)
        })?;
    record.field_value(field.name)
}

/// Resolves every name in `names` against `source`, in order.
///
/// Repeated names produce repeated values. A name the source cannot answer
/// fails with [`Error::UnknownParameter`].
pub fn resolve<S>(names: &[String], source: &S, naming: &Naming) -> Result<Vec<Value>>
where
    S: ArgumentSource + ?Sized,
{
    names
        .iter()
        .map(|name| {
            source
                .lookup(name, naming)
                .ok_or_else(|| Error::UnknownParameter(name.clone()))
        })
        .collect()
}

/// Registers a struct as a [`Record`] and an [`ArgumentSource`].
///
/// Each field may carry tags in parentheses; field types must be `Clone` and
/// convert into [`Value`].
///
/// ```
/// use sqlx_named_params::{record, Api};
///
/// struct User {
///     id: String,
///     full_name: String,
///     age: i32,
/// }
///
/// record!(User {
///     id(db = "user_id"),
///     full_name,
///     age,
/// });
///
/// let user = User { id: "bob".into(), full_name: "Bob".into(), age: 42 };
/// let bound = Api::new().named_query_params(
///     "UPDATE users SET full_name = :full_name WHERE user_id = :user_id",
///     &user,
/// )?;
/// assert_eq!(bound.values().len(), 2);
/// # Ok::<(), sqlx_named_params::Error>(())
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ty { $( $field:ident $( ( $( $key:ident = $tag:literal ),* $(,)? ) )? ),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn fields(&self) -> &'static [$crate::FieldDecl] {
                const FIELDS: &[$crate::FieldDecl] = &[
                    $(
                        $crate::FieldDecl::new(
                            stringify!($field),
                            &[ $( $( (stringify!($key), $tag) ),* )? ],
                        ),
                    )*
                ];
                FIELDS
            }

            fn field_value(&self, field: &str) -> ::std::option::Option<$crate::Value> {
                match field {
                    $(
                        stringify!($field) => ::std::option::Option::Some(
                            $crate::Value::from(::std::clone::Clone::clone(&self.$field)),
                        ),
                    )*
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl $crate::ArgumentSource for $ty {
            fn lookup(
                &self,
                name: &str,
                naming: &$crate::Naming,
            ) -> ::std::option::Option<$crate::Value> {
                $crate::args::lookup_record(self, name, naming)
            }
        }
    };
}

/// Builds a keyed-mapping argument source.
///
/// ```
/// use sqlx_named_params::{params, Value};
///
/// let args = params! { id: 42, name: "bob" };
/// assert_eq!(args["id"], Value::Int(42));
/// ```
#[macro_export]
macro_rules! params {
    ($( $name:ident : $value:expr ),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut params = ::std::collections::HashMap::<::std::string::String, $crate::Value>::new();
        $(
            params.insert(
                ::std::string::String::from(stringify!($name)),
                $crate::Value::from($value),
            );
        )*
        params
    }};
}

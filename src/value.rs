/// Column type of a [`Value`].
///
/// NULLs keep it so drivers can bind a NULL of the right type; PostgreSQL
/// will not assign a `text` NULL to an `integer` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Text,
    Bytes,
}

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null(ValueKind),
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null(_))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null(kind) => *kind,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::Bytes(_) => ValueKind::Bytes,
        }
    }
}

/// A Rust type that always converts to the same [`ValueKind`].
///
/// `Option<T>` converts into [`Value`] for every `T: TypedValue`, with `None`
/// becoming `Value::Null(T::KIND)`.
pub trait TypedValue: Into<Value> {
    const KIND: ValueKind;
}

macro_rules! impl_value {
    ($kind:ident: $($ty:ty => |$v:ident| $convert:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    Value::$kind($convert)
                }
            }

            impl TypedValue for $ty {
                const KIND: ValueKind = ValueKind::$kind;
            }
        )*
    };
}

impl_value!(Int:
    i8 => |v| i64::from(v),
    i16 => |v| i64::from(v),
    i32 => |v| i64::from(v),
    i64 => |v| v,
    u8 => |v| i64::from(v),
    u16 => |v| i64::from(v),
    u32 => |v| i64::from(v),
);
impl_value!(Bool: bool => |v| v);
impl_value!(Float: f32 => |v| f64::from(v), f64 => |v| v);
impl_value!(Text:
    String => |v| v,
    &str => |v| v.to_owned(),
    &String => |v| v.clone(),
);
impl_value!(Bytes: Vec<u8> => |v| v, &[u8] => |v| v.to_vec());

impl<T> From<Option<T>> for Value
where
    T: TypedValue,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null(T::KIND), Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Value::from(7u8), Value::Int(7));
        assert_eq!(Value::from(-3i32), Value::Int(-3));
        assert_eq!(Value::from(1.5f32), Value::Float(1.5));
        assert_eq!(Value::from("bob"), Value::Text("bob".into()));
        assert_eq!(Value::from(vec![1u8, 2]), Value::Bytes(vec![1, 2]));
    }

    #[test]
    fn test_option_conversion() {
        assert!(Value::from(None::<i64>).is_null());
        assert_eq!(Value::from(Some(true)), Value::Bool(true));
    }

    #[test]
    fn test_null_keeps_kind() {
        assert_eq!(Value::from(None::<i32>), Value::Null(ValueKind::Int));
        assert_eq!(Value::from(None::<bool>), Value::Null(ValueKind::Bool));
        assert_eq!(Value::from(None::<f64>), Value::Null(ValueKind::Float));
        assert_eq!(Value::from(None::<&str>), Value::Null(ValueKind::Text));
        assert_eq!(Value::from(None::<Vec<u8>>), Value::Null(ValueKind::Bytes));
        assert_eq!(Value::from(None::<u16>).kind(), Value::from(5u16).kind());
    }
}

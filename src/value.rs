use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An opaque, non-textual stream element (a mention, an image, a URL object
/// supplied by the caller, ...). Payloads are matched by runtime type tag
/// rather than by string content.
pub trait PayloadKind: Any + fmt::Debug + Send + Sync {
    /// A stable type tag used by [`crate::pattern::Pattern::type_check`] and
    /// by the `filter_out` policy on [`crate::collection::DataCollection`].
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
}

/// A reference-counted, type-erased payload.
#[derive(Clone, Debug)]
pub struct Payload(Arc<dyn PayloadKind>);

impl Payload {
    pub fn new<T: PayloadKind>(inner: T) -> Self {
        Payload(Arc::new(inner))
    }

    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    pub fn downcast_ref<T: PayloadKind>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// One element of the input stream: either a plain text word or an opaque
/// payload carried alongside it.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Text(String),
    Payload(Payload),
}

impl Token {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Token::Text(s) => Some(s.as_str()),
            Token::Payload(_) => None,
        }
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token::Text(s.to_string())
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Token::Text(s)
    }
}

impl From<Payload> for Token {
    fn from(p: Payload) -> Self {
        Token::Payload(p)
    }
}

/// The typed result of matching one or more tokens against a
/// [`crate::pattern::Pattern`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Payload(Payload),
    List(Vec<Value>),
    Dict(IndexMap<String, Value>),
    Empty,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_payload(&self) -> Option<&Payload> {
        match self {
            Value::Payload(p) => Some(p),
            _ => None,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::Str(_) => ValueKind::Str,
            Value::Payload(_) => ValueKind::Payload,
            Value::List(_) => ValueKind::List,
            Value::Dict(_) => ValueKind::Dict,
            Value::Empty => ValueKind::Empty,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Payload(p) => write!(f, "<{}>", p.type_name()),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Dict(_) => write!(f, "<dict>"),
            Value::Empty => write!(f, "<empty>"),
        }
    }
}

/// The runtime discriminant of a [`Value`], used by `query_with`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Float,
    Bool,
    Str,
    Payload,
    List,
    Dict,
    Empty,
}

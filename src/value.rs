//! Type-erased generated values.
//!
//! A `GeneratedValue` carries the raw value produced by a generator together
//! with the capabilities needed to render and release it. The raw value lives
//! in a tagged `Payload`; typed accessors check the tag before handing out a
//! view.

use crate::primitive::Primitive;
use half::f16;
use std::any::Any;
use std::fmt;

/// Renders a raw value of the given length.
pub type ShowFn = fn(&Payload, usize) -> String;

/// Releases a raw value.
pub type DisposeFn = fn(Payload);

/// Raw storage behind a `GeneratedValue`.
#[derive(Debug)]
pub enum Payload {
    Long(i64),
    Int(i32),
    Double(f64),
    Float(f32),
    Half(f16),
    Boolean(bool),
    Char(char),
    LongArray(Vec<i64>),
    IntArray(Vec<i32>),
    DoubleArray(Vec<f64>),
    FloatArray(Vec<f32>),
    HalfArray(Vec<f16>),
    BooleanArray(Vec<bool>),
    CharArray(Vec<char>),
    String(String),
    /// Caller-defined value; pair it with its own `ShowFn`.
    Custom(Box<dyn Any>),
}

impl Payload {
    /// Short name of the stored type, used in mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Long(_) => "long",
            Payload::Int(_) => "int",
            Payload::Double(_) => "double",
            Payload::Float(_) => "float",
            Payload::Half(_) => "half",
            Payload::Boolean(_) => "boolean",
            Payload::Char(_) => "char",
            Payload::LongArray(_) => "long array",
            Payload::IntArray(_) => "int array",
            Payload::DoubleArray(_) => "double array",
            Payload::FloatArray(_) => "float array",
            Payload::HalfArray(_) => "half array",
            Payload::BooleanArray(_) => "boolean array",
            Payload::CharArray(_) => "char array",
            Payload::String(_) => "string",
            Payload::Custom(_) => "custom",
        }
    }
}

/// Errors raised by typed access to a `GeneratedValue`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The stored tag does not match the requested type
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// The raw value has already been released
    Released,
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueError::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            ValueError::Released => write!(f, "Generated value was already released"),
        }
    }
}

impl std::error::Error for ValueError {}

/// A self-describing, self-releasing value produced by a generator.
///
/// The disposal capability runs exactly once: either through an explicit
/// [`GeneratedValue::dispose`] or when the value is dropped.
pub struct GeneratedValue {
    raw: Option<Payload>,
    length: usize,
    show: ShowFn,
    dispose: DisposeFn,
}

impl GeneratedValue {
    pub fn new(raw: Payload, length: usize, show: ShowFn, dispose: DisposeFn) -> Self {
        Self {
            raw: Some(raw),
            length,
            show,
            dispose,
        }
    }

    pub fn scalar<T: Primitive>(value: T) -> Self {
        Self::new(value.into_payload(), 1, show_scalar::<T>, release)
    }

    pub fn array<T: Primitive>(values: Vec<T>) -> Self {
        let length = values.len();
        Self::new(T::into_array_payload(values), length, show_array::<T>, release)
    }

    pub fn string(value: String) -> Self {
        let length = value.chars().count();
        Self::new(Payload::String(value), length, show_string, release)
    }

    /// Wrap a caller-defined value with its own rendering.
    pub fn custom<T: Any>(value: T, show: ShowFn) -> Self {
        Self::new(Payload::Custom(Box::new(value)), 1, show, release)
    }

    /// Wrap an array of caller-defined elements, rendered as `[a, b]`.
    pub fn custom_array<T: Any + fmt::Display>(values: Vec<T>) -> Self {
        let length = values.len();
        Self::new(Payload::Custom(Box::new(values)), length, show_custom_array::<T>, release)
    }

    /// Replace the disposal capability.
    pub fn with_dispose(mut self, dispose: DisposeFn) -> Self {
        self.dispose = dispose;
        self
    }

    /// Element count for arrays and strings, 1 for scalars.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn raw(&self) -> Option<&Payload> {
        self.raw.as_ref()
    }

    /// Text form of the value, produced by its own show capability.
    pub fn show(&self) -> String {
        match &self.raw {
            Some(raw) => (self.show)(raw, self.length),
            None => String::new(),
        }
    }

    /// Release the raw value now.
    pub fn dispose(self) {
        drop(self)
    }

    pub fn try_get<T: Primitive>(&self) -> Result<T, ValueError> {
        let raw = self.raw.as_ref().ok_or(ValueError::Released)?;
        T::view(raw).ok_or(ValueError::TypeMismatch {
            expected: T::NAME,
            found: raw.kind(),
        })
    }

    /// Typed scalar view.
    ///
    /// # Panics
    ///
    /// Panics when the value does not hold a `T`.
    pub fn get<T: Primitive>(&self) -> T {
        match self.try_get() {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_get_array<T: Primitive>(&self) -> Result<&[T], ValueError> {
        let raw = self.raw.as_ref().ok_or(ValueError::Released)?;
        T::view_array(raw).ok_or(ValueError::TypeMismatch {
            expected: T::ARRAY_NAME,
            found: raw.kind(),
        })
    }

    /// Typed array view.
    ///
    /// # Panics
    ///
    /// Panics when the value does not hold an array of `T`.
    pub fn get_array<T: Primitive>(&self) -> &[T] {
        match self.try_get_array() {
            Ok(values) => values,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_get_str(&self) -> Result<&str, ValueError> {
        match self.raw.as_ref() {
            Some(Payload::String(value)) => Ok(value),
            Some(other) => Err(ValueError::TypeMismatch {
                expected: "string",
                found: other.kind(),
            }),
            None => Err(ValueError::Released),
        }
    }

    /// # Panics
    ///
    /// Panics when the value does not hold a string.
    pub fn get_str(&self) -> &str {
        match self.try_get_str() {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_get_custom<T: Any>(&self) -> Result<&T, ValueError> {
        let raw = self.raw.as_ref().ok_or(ValueError::Released)?;
        let mismatch = ValueError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            found: raw.kind(),
        };
        match raw {
            Payload::Custom(value) => value.downcast_ref::<T>().ok_or(mismatch),
            _ => Err(mismatch),
        }
    }

    /// # Panics
    ///
    /// Panics when the value does not hold a custom `T`.
    pub fn get_custom<T: Any>(&self) -> &T {
        match self.try_get_custom() {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }
}

impl Drop for GeneratedValue {
    fn drop(&mut self) {
        if let Some(raw) = self.raw.take() {
            (self.dispose)(raw);
        }
    }
}

impl fmt::Debug for GeneratedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedValue")
            .field("raw", &self.raw)
            .field("length", &self.length)
            .finish()
    }
}

impl fmt::Display for GeneratedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.show())
    }
}

/// Default disposal: drop the backing storage.
pub fn release(raw: Payload) {
    log::trace!("Releasing {} value", raw.kind());
    drop(raw)
}

fn show_scalar<T: Primitive>(raw: &Payload, _length: usize) -> String {
    T::view(raw).map(|value| value.show()).unwrap_or_default()
}

fn show_array<T: Primitive>(raw: &Payload, _length: usize) -> String {
    let items: Vec<String> = T::view_array(raw)
        .unwrap_or_default()
        .iter()
        .map(|item| item.show())
        .collect();
    format!("[{}]", items.join(", "))
}

fn show_custom_array<T: Any + fmt::Display>(raw: &Payload, _length: usize) -> String {
    let items: Vec<String> = match raw {
        Payload::Custom(value) => value
            .downcast_ref::<Vec<T>>()
            .map(|values| values.iter().map(|item| item.to_string()).collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    format!("[{}]", items.join(", "))
}

/// Longest string rendering, in characters.
pub const STRING_SHOW_LIMIT: usize = 99;

fn show_string(raw: &Payload, _length: usize) -> String {
    match raw {
        Payload::String(value) => bounded(value.clone(), STRING_SHOW_LIMIT),
        _ => String::new(),
    }
}

/// Cut `text` down to at most `limit` characters.
pub(crate) fn bounded(text: String, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static RELEASED: AtomicUsize = AtomicUsize::new(0);

    fn counting_release(raw: Payload) {
        RELEASED.fetch_add(1, Ordering::SeqCst);
        drop(raw)
    }

    #[test]
    fn test_scalar_access() {
        let value = GeneratedValue::scalar(42i32);
        assert_eq!(value.len(), 1);
        assert_eq!(value.get::<i32>(), 42);
        assert_eq!(value.show(), "42");
    }

    #[test]
    fn test_type_mismatch_is_reported() {
        let value = GeneratedValue::scalar(1.5f64);
        assert_eq!(
            value.try_get::<i32>(),
            Err(ValueError::TypeMismatch {
                expected: "int",
                found: "double"
            })
        );
        assert!(value.try_get_str().is_err());
        assert!(value.try_get_array::<f64>().is_err());
    }

    #[test]
    #[should_panic(expected = "Type mismatch")]
    fn test_get_panics_on_wrong_tag() {
        let value = GeneratedValue::scalar(true);
        let _ = value.get::<i64>();
    }

    #[test]
    fn test_array_rendering() {
        let value = GeneratedValue::array(vec![1i64, -2, 3]);
        assert_eq!(value.len(), 3);
        assert_eq!(value.get_array::<i64>(), &[1, -2, 3]);
        assert_eq!(value.show(), "[1, -2, 3]");

        let empty = GeneratedValue::array(Vec::<bool>::new());
        assert!(empty.is_empty());
        assert_eq!(empty.show(), "[]");
    }

    #[test]
    fn test_string_rendering_is_bounded() {
        let long: String = std::iter::repeat('x').take(250).collect();
        let value = GeneratedValue::string(long);
        assert_eq!(value.len(), 250);
        assert_eq!(value.show().chars().count(), STRING_SHOW_LIMIT);
    }

    #[test]
    fn test_custom_value() {
        #[derive(Debug, PartialEq)]
        struct Point(i32, i32);

        fn show_point(raw: &Payload, _length: usize) -> String {
            match raw {
                Payload::Custom(value) => value
                    .downcast_ref::<Point>()
                    .map(|p| format!("({}, {})", p.0, p.1))
                    .unwrap_or_default(),
                _ => String::new(),
            }
        }

        let value = GeneratedValue::custom(Point(1, 2), show_point);
        assert_eq!(value.get_custom::<Point>(), &Point(1, 2));
        assert_eq!(value.show(), "(1, 2)");
        assert!(value.try_get_custom::<String>().is_err());
    }

    #[test]
    fn test_custom_array_rendering() {
        let value = GeneratedValue::custom_array(vec!["ab".to_string(), "c".to_string()]);
        assert_eq!(value.len(), 2);
        assert_eq!(value.get_custom::<Vec<String>>().len(), 2);
        assert_eq!(value.show(), "[ab, c]");
    }

    #[test]
    fn test_dispose_runs_exactly_once() {
        let before = RELEASED.load(Ordering::SeqCst);

        let explicit = GeneratedValue::scalar(1i32).with_dispose(counting_release);
        explicit.dispose();
        assert_eq!(RELEASED.load(Ordering::SeqCst), before + 1);

        {
            let _dropped = GeneratedValue::string("abc".into()).with_dispose(counting_release);
        }
        assert_eq!(RELEASED.load(Ordering::SeqCst), before + 2);
    }

    #[test]
    fn test_bounded_respects_char_boundaries() {
        assert_eq!(bounded("héllo".to_string(), 2), "hé");
        assert_eq!(bounded("ab".to_string(), 5), "ab");
    }
}

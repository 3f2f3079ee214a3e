use fieldbridge_types::Value;
use std::fmt;
use std::sync::Arc;

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A predicate over one field of a record.
///
/// The predicate receives the field's current value; a field the record
/// does not have is presented as [`Value::Null`].
#[derive(Clone)]
pub struct ValidationRule {
    field_name: String,
    message: String,
    predicate: Predicate,
}

impl ValidationRule {
    pub fn new(
        field_name: impl Into<String>,
        message: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            message: message.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Shorthand: the field must be present and, for strings, bytes and
    /// lists, non-empty.
    pub fn required(field_name: &str) -> Self {
        Self::new(field_name, "is required", |value| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            Value::Bytes(b) => !b.is_empty(),
            Value::List(items) => !items.is_empty(),
            _ => true,
        })
    }

    /// Shorthand: a string field holds at least `min` characters.
    pub fn min_len(field_name: &str, min: usize) -> Self {
        Self::new(
            field_name,
            format!("must be at least {min} characters"),
            move |value| match value {
                Value::String(s) => s.chars().count() >= min,
                _ => true,
            },
        )
    }

    /// Shorthand: a string field holds at most `max` characters.
    pub fn max_len(field_name: &str, max: usize) -> Self {
        Self::new(
            field_name,
            format!("must be at most {max} characters"),
            move |value| match value {
                Value::String(s) => s.chars().count() <= max,
                _ => true,
            },
        )
    }

    /// Shorthand: a numeric field lies within `min..=max`. Absent values pass.
    pub fn range(field_name: &str, min: f64, max: f64) -> Self {
        Self::new(
            field_name,
            format!("must be between {min} and {max}"),
            move |value| match as_f64(value) {
                Some(n) => n >= min && n <= max,
                None => true,
            },
        )
    }

    /// Shorthand: a string field matches `pattern`. Absent values pass.
    pub fn pattern(field_name: &str, pattern: &str) -> Result<Self, regex_lite::Error> {
        let regex = regex_lite::Regex::new(pattern)?;
        Ok(Self::new(
            field_name,
            format!("must match {pattern}"),
            move |value| match value {
                Value::String(s) => regex.is_match(s),
                _ => true,
            },
        ))
    }

    /// Shorthand: a string field equals one of `options`.
    pub fn one_of(field_name: &str, options: Vec<String>) -> Self {
        let message = format!("must be one of [{}]", options.join(", "));
        Self::new(field_name, message, move |value| match value {
            Value::String(s) => options.iter().any(|option| option == s),
            _ => true,
        })
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Evaluates the predicate.
    pub fn check(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("field_name", &self.field_name)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match *value {
        Value::I32(v) => Some(f64::from(v)),
        Value::I64(v) => Some(v as f64),
        Value::U32(v) => Some(f64::from(v)),
        Value::U64(v) => Some(v as f64),
        Value::F32(v) => Some(f64::from(v)),
        Value::F64(v) => Some(v),
        _ => None,
    }
}

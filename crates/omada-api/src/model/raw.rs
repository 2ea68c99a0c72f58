// Controller payloads kept next to the typed views decoded from them

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A view that remembers the JSON the controller sent for it.
///
/// Typed fields are normalized (flags become booleans, missing values take
/// defaults); `raw_data` is the entity exactly as received, including
/// fields the view does not model.
pub trait RawData {
    fn raw_data(&self) -> &Value;
}

pub(crate) trait KeepRaw {
    fn keep_raw(&mut self, raw: Value);
}

/// Decode `raw` into `T` and keep a copy of it on the view.
pub(crate) fn with_raw<T>(raw: &Value) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned + KeepRaw,
{
    let mut view = T::deserialize(raw)?;
    view.keep_raw(raw.clone());
    Ok(view)
}

/// Field deserializer for a nested view.
pub(crate) fn one<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + KeepRaw,
{
    with_raw(&Value::deserialize(deserializer)?).map_err(D::Error::custom)
}

/// Field deserializer for a list of nested views; null reads as empty.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + KeepRaw,
{
    Option::<Vec<Value>>::deserialize(deserializer)?
        .unwrap_or_default()
        .iter()
        .map(|raw| with_raw(raw).map_err(D::Error::custom))
        .collect()
}

/// Implement [`RawData`] and `KeepRaw` for views with a `raw: Value` field.
macro_rules! keeps_raw {
    ($($view:ty),+ $(,)?) => {$(
        impl $crate::model::RawData for $view {
            fn raw_data(&self) -> &::serde_json::Value {
                &self.raw
            }
        }

        impl $crate::model::raw::KeepRaw for $view {
            fn keep_raw(&mut self, raw: ::serde_json::Value) {
                self.raw = raw;
            }
        }
    )+};
}

pub(crate) use keeps_raw;

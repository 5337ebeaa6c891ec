//! JSON objects through the envelope codec.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    PassBox,
    crypto::Backend,
    error::{Error, Result},
    format::{Envelope, Format},
};

impl<B: Backend> PassBox<B> {
    /// Serializes `value` as compact JSON and encrypts it.
    ///
    /// Only JSON objects and arrays are accepted; scalars and `null` are
    /// rejected as a validation failure.
    pub fn encrypt_object<T: Serialize + ?Sized>(
        &self,
        value: &T,
        password: &str,
        format: Format,
    ) -> Result<Envelope> {
        let json = serde_json::to_value(value)
            .map_err(|e| Error::Validation(format!("value is not serializable: {e}")))?;

        if !matches!(json, Value::Object(_) | Value::Array(_)) {
            return Err(Error::validation("First argument must be an object"));
        }

        let text = serde_json::to_string(&json)
            .map_err(|e| Error::Validation(format!("value is not serializable: {e}")))?;

        self.encrypt(&text, password, format)
    }

    /// Decrypts and parses an envelope made by [`encrypt_object`](Self::encrypt_object).
    ///
    /// # Errors
    ///
    /// Everything [`decrypt`](Self::decrypt) returns, plus [`Error::Format`]
    /// when the authenticated text does not parse as `T`.
    pub fn decrypt_object<T: DeserializeOwned>(
        &self,
        envelope: &Envelope,
        password: &str,
    ) -> Result<T> {
        let text = self.decrypt(envelope, password)?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::debug!(error = %e, "decrypted payload did not parse");
            Error::Format(format!("a serialized object: {e}"))
        })
    }
}

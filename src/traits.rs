//! Serialization and deserialization of parameter sets and keys.

use crate::Error;


/// Stable byte encodings. Every implementor's output is deterministic: two
/// equal values serialize to identical bytes across runs and versions.
pub trait SerDes: Sized {
    /// Serialize into the type's wire format.
    ///
    /// # Examples
    /// ```rust
    /// use mceliece::traits::SerDes;
    /// use mceliece::ParameterSet;
    ///
    /// let params = ParameterSet::fm11t40();
    /// let bytes = params.to_bytes();
    /// let back = ParameterSet::try_from_bytes(&bytes)?;
    /// assert_eq!(params, back);
    /// # Ok::<(), mceliece::Error>(())
    /// ```
    fn to_bytes(&self) -> Vec<u8>;

    /// Parse and validate the wire format.
    ///
    /// # Errors
    /// Returns an error on truncated input, trailing garbage, or any field
    /// that fails validation.
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, Error>;
}

//! Deterministic byte keys for filter elements
//!
//! The membership filter only sees bytes; the correction cache keys on the
//! element itself. Equal elements must encode to identical bytes.

use std::convert::Infallible;

use serde::Serialize;

/// Deterministic conversion of an element into its filter key.
pub trait KeyEncoding {
    type Error: std::error::Error + Send + Sync + 'static;

    fn encode_key(&self) -> Result<Vec<u8>, Self::Error>;
}

impl<T: KeyEncoding + ?Sized> KeyEncoding for &T {
    type Error = T::Error;

    fn encode_key(&self) -> Result<Vec<u8>, Self::Error> {
        (**self).encode_key()
    }
}

/// Integers encode as fixed-width big-endian.
macro_rules! impl_int_key {
    ($($t:ty),*) => {
        $(
            impl KeyEncoding for $t {
                type Error = Infallible;

                fn encode_key(&self) -> Result<Vec<u8>, Self::Error> {
                    Ok(self.to_be_bytes().to_vec())
                }
            }
        )*
    };
}

impl_int_key!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

// Widened so keys do not depend on the target's pointer width
impl KeyEncoding for usize {
    type Error = Infallible;

    fn encode_key(&self) -> Result<Vec<u8>, Self::Error> {
        Ok((*self as u64).to_be_bytes().to_vec())
    }
}

impl KeyEncoding for isize {
    type Error = Infallible;

    fn encode_key(&self) -> Result<Vec<u8>, Self::Error> {
        Ok((*self as i64).to_be_bytes().to_vec())
    }
}

impl KeyEncoding for str {
    type Error = Infallible;

    fn encode_key(&self) -> Result<Vec<u8>, Self::Error> {
        Ok(self.as_bytes().to_vec())
    }
}

impl KeyEncoding for String {
    type Error = Infallible;

    fn encode_key(&self) -> Result<Vec<u8>, Self::Error> {
        Ok(self.as_bytes().to_vec())
    }
}

impl KeyEncoding for [u8] {
    type Error = Infallible;

    fn encode_key(&self) -> Result<Vec<u8>, Self::Error> {
        Ok(self.to_vec())
    }
}

impl KeyEncoding for Vec<u8> {
    type Error = Infallible;

    fn encode_key(&self) -> Result<Vec<u8>, Self::Error> {
        Ok(self.clone())
    }
}

impl<const N: usize> KeyEncoding for [u8; N] {
    type Error = Infallible;

    fn encode_key(&self) -> Result<Vec<u8>, Self::Error> {
        Ok(self.to_vec())
    }
}

/// Encodes any serde type with bincode.
///
/// Only deterministic for types whose serialization is; avoid hash-ordered
/// collections such as `HashMap`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BincodeKey<T>(pub T);

impl<T: Serialize> KeyEncoding for BincodeKey<T> {
    type Error = bincode::Error;

    fn encode_key(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(&self.0)
    }
}

//! The pointer+length record text crosses the boundary in.

use alloc::borrow::Cow;
use alloc::string::String;
use core::ffi::c_int;
use core::marker::PhantomData;
use core::{fmt, ptr, slice, str};

use thiserror::Error;

// -----------------------------------------------------------------------------
// TextError

/// A [`BridgeString`] that does not describe valid text.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TextError {
    #[error("text length {0} is negative")]
    NegativeLength(c_int),

    #[error("text of length {0} has a null data pointer")]
    NullData(c_int),

    #[error("text of {0} bytes does not fit a `c_int` length")]
    TooLong(usize),

    #[error("text is not valid UTF-8: {0}")]
    InvalidUtf8(str::Utf8Error),
}

// -----------------------------------------------------------------------------
// BridgeString

/// Text as exchanged with native code: a data pointer and a byte count.
///
/// The record owns no buffer. The bytes belong to whichever side produced
/// them, and `'a` ties the record to them when that side is Rust.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct BridgeString<'a> {
    ptr: *const u8,
    size: c_int,
    _marker: PhantomData<&'a [u8]>,
}

impl<'a> BridgeString<'a> {
    /// The empty text.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            ptr: ptr::null(),
            size: 0,
            _marker: PhantomData,
        }
    }

    /// Rebuilds a record received from native code.
    ///
    /// # Safety
    ///
    /// When `ptr` is non-null and `size` positive, `ptr` points to `size`
    /// initialized bytes that stay unchanged for `'a`.
    #[inline]
    pub const unsafe fn from_raw_parts(ptr: *const u8, size: c_int) -> Self {
        Self {
            ptr,
            size,
            _marker: PhantomData,
        }
    }

    /// The data pointer, possibly null.
    #[inline]
    pub const fn as_ptr(&self) -> *const u8 {
        self.ptr
    }

    /// The length as recorded, in bytes.
    #[inline]
    pub const fn size(&self) -> c_int {
        self.size
    }

    /// The recorded bytes.
    pub fn as_bytes(&self) -> Result<&'a [u8], TextError> {
        let len = usize::try_from(self.size).map_err(|_| TextError::NegativeLength(self.size))?;
        if len == 0 {
            return Ok(&[]);
        }
        if self.ptr.is_null() {
            return Err(TextError::NullData(self.size));
        }
        // SAFETY: guaranteed by whoever built the record.
        Ok(unsafe { slice::from_raw_parts(self.ptr, len) })
    }

    /// The recorded bytes as UTF-8.
    pub fn to_str(&self) -> Result<&'a str, TextError> {
        str::from_utf8(self.as_bytes()?).map_err(TextError::InvalidUtf8)
    }

    /// The recorded bytes, replacing invalid UTF-8 sequences.
    pub fn to_string_lossy(&self) -> Result<Cow<'a, str>, TextError> {
        Ok(String::from_utf8_lossy(self.as_bytes()?))
    }
}

impl Default for BridgeString<'_> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> TryFrom<&'a str> for BridgeString<'a> {
    type Error = TextError;

    fn try_from(text: &'a str) -> Result<Self, Self::Error> {
        let size = c_int::try_from(text.len()).map_err(|_| TextError::TooLong(text.len()))?;
        Ok(Self {
            ptr: text.as_ptr(),
            size,
            _marker: PhantomData,
        })
    }
}

impl TryFrom<BridgeString<'_>> for String {
    type Error = TextError;

    fn try_from(text: BridgeString<'_>) -> Result<Self, Self::Error> {
        text.to_str().map(String::from)
    }
}

impl fmt::Debug for BridgeString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_str() {
            Ok(text) => fmt::Debug::fmt(text, f),
            Err(_) => f
                .debug_struct("BridgeString")
                .field("ptr", &self.ptr)
                .field("size", &self.size)
                .finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::ptr;

    use super::{BridgeString, TextError};

    #[test]
    fn borrows_rust_text() {
        let owned = String::from("grüße");
        let text = BridgeString::try_from(owned.as_str()).unwrap();

        assert_eq!(text.as_ptr(), owned.as_ptr());
        assert_eq!(text.size(), 7);
        assert_eq!(text.to_str(), Ok("grüße"));
        assert_eq!(String::try_from(text).unwrap(), owned);
    }

    #[test]
    fn empty_text() {
        let empty = BridgeString::default();
        assert_eq!(empty.as_bytes(), Ok(&[][..]));
        assert_eq!(empty.to_str(), Ok(""));

        // A null pointer with zero length is still the empty text.
        let null = unsafe { BridgeString::from_raw_parts(ptr::null(), 0) };
        assert_eq!(null.to_str(), Ok(""));
    }

    #[test]
    fn malformed_records() {
        let negative = unsafe { BridgeString::from_raw_parts(b"abc".as_ptr(), -1) };
        assert_eq!(negative.as_bytes(), Err(TextError::NegativeLength(-1)));

        let dangling = unsafe { BridgeString::from_raw_parts(ptr::null(), 3) };
        assert_eq!(dangling.to_str(), Err(TextError::NullData(3)));

        let bytes = [0x66, 0xff, 0x6f];
        let invalid = unsafe { BridgeString::from_raw_parts(bytes.as_ptr(), 3) };
        assert!(matches!(invalid.to_str(), Err(TextError::InvalidUtf8(_))));
        assert_eq!(invalid.to_string_lossy().unwrap(), "f\u{fffd}o");
    }
}

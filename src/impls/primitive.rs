//! Leaf encodings.
//!
//! - strings and chars: raw UTF-8
//! - booleans: one byte, `'1'` or `'0'`
//! - integers: big-endian at their declared width (`isize`/`usize` as 64-bit)
//! - floats: big-endian IEEE-754 bit pattern at their declared width
//!
//! Width is part of the encoding, so `43i32` and `43i64` hash differently.

use std::marker::PhantomData;

use crate::error::DeepHashError;
use crate::visitor::{DeepHash, Visitor};

impl DeepHash for str {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.write(path, self.as_bytes())
    }

    fn key_label(&self) -> String {
        self.to_string()
    }
}

impl DeepHash for String {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        self.as_str().deep_hash(visitor, path)
    }

    fn key_label(&self) -> String {
        self.clone()
    }
}

impl DeepHash for char {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        let mut buf = [0u8; 4];
        visitor.write(path, self.encode_utf8(&mut buf).as_bytes())
    }

    fn key_label(&self) -> String {
        self.to_string()
    }
}

impl DeepHash for bool {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.write(path, if *self { b"1" } else { b"0" })
    }

    fn key_label(&self) -> String {
        self.to_string()
    }
}

macro_rules! impl_deep_hash_for_int {
    ($($ty:ty),*) => {
        $(
            impl DeepHash for $ty {
                fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
                    visitor.write(path, &self.to_be_bytes())
                }

                fn key_label(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_deep_hash_for_int!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

impl DeepHash for usize {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.write(path, &(*self as u64).to_be_bytes())
    }

    fn key_label(&self) -> String {
        self.to_string()
    }
}

impl DeepHash for isize {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.write(path, &(*self as i64).to_be_bytes())
    }

    fn key_label(&self) -> String {
        self.to_string()
    }
}

impl DeepHash for f32 {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.write(path, &self.to_bits().to_be_bytes())
    }

    fn key_label(&self) -> String {
        self.to_string()
    }
}

impl DeepHash for f64 {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.write(path, &self.to_bits().to_be_bytes())
    }

    fn key_label(&self) -> String {
        self.to_string()
    }
}

impl DeepHash for () {
    fn deep_hash(&self, _visitor: &mut Visitor<'_>, _path: &str) -> Result<(), DeepHashError> {
        Ok(())
    }

    fn key_label(&self) -> String {
        "()".to_string()
    }
}

impl<T: ?Sized> DeepHash for PhantomData<T> {
    fn deep_hash(&self, _visitor: &mut Visitor<'_>, _path: &str) -> Result<(), DeepHashError> {
        Ok(())
    }
}

//! References, shared pointers, cells and tagged unions.
//!
//! All of these are transparent: the target is traversed at the same path,
//! so `T`, `&T`, `Box<T>`, `Rc<T>` and `Some(T)` hash identically. An unset
//! indirection (`None`, a dead `Weak`, a cell that cannot be borrowed) is an
//! absent value and contributes nothing.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::rc::{self, Rc};
use std::sync::{self, Arc, Mutex, RwLock, TryLockError};

use tracing::warn;

use crate::error::DeepHashError;
use crate::visitor::{DeepHash, Visitor};

impl<T: DeepHash + ?Sized> DeepHash for &T {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.visit(*self, path)
    }

    fn key_label(&self) -> String {
        (**self).key_label()
    }
}

impl<T: DeepHash + ?Sized> DeepHash for &mut T {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.visit(&**self, path)
    }

    fn key_label(&self) -> String {
        (**self).key_label()
    }
}

impl<T: DeepHash + ?Sized> DeepHash for Box<T> {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.visit(&**self, path)
    }

    fn key_label(&self) -> String {
        (**self).key_label()
    }
}

impl<B> DeepHash for Cow<'_, B>
where
    B: DeepHash + ToOwned + ?Sized,
{
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.visit(&**self, path)
    }

    fn key_label(&self) -> String {
        (**self).key_label()
    }
}

impl<T: DeepHash + ?Sized> DeepHash for Rc<T> {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.shared::<Self, T>(&**self, path)
    }

    fn key_label(&self) -> String {
        (**self).key_label()
    }
}

impl<T: DeepHash + ?Sized> DeepHash for Arc<T> {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.shared::<Self, T>(&**self, path)
    }

    fn key_label(&self) -> String {
        (**self).key_label()
    }
}

impl<T: DeepHash + ?Sized> DeepHash for rc::Weak<T> {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        match self.upgrade() {
            Some(strong) => visitor.visit(&strong, path),
            None => Ok(()),
        }
    }
}

impl<T: DeepHash + ?Sized> DeepHash for sync::Weak<T> {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        match self.upgrade() {
            Some(strong) => visitor.visit(&strong, path),
            None => Ok(()),
        }
    }
}

impl<T: DeepHash> DeepHash for Option<T> {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        match self {
            Some(value) => visitor.visit(value, path),
            None => Ok(()),
        }
    }

    fn key_label(&self) -> String {
        match self {
            Some(value) => format!("Some({:?})", value.key_label()),
            None => "None".to_string(),
        }
    }
}

impl<T: DeepHash, E: DeepHash> DeepHash for Result<T, E> {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        match self {
            Ok(value) => visitor.visit(value, path),
            Err(err) => visitor.visit(err, path),
        }
    }

    fn key_label(&self) -> String {
        match self {
            Ok(value) => format!("Ok({:?})", value.key_label()),
            Err(err) => format!("Err({:?})", err.key_label()),
        }
    }
}

impl<T: DeepHash + Copy> DeepHash for Cell<T> {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.visit(&self.get(), path)
    }
}

impl<T: DeepHash + ?Sized> DeepHash for RefCell<T> {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        match self.try_borrow() {
            Ok(inner) => visitor.visit(&*inner, path),
            Err(_) => {
                warn!(path = path, "skipping mutably borrowed RefCell");
                Ok(())
            }
        }
    }
}

impl<T: DeepHash + ?Sized> DeepHash for Mutex<T> {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        match self.try_lock() {
            Ok(inner) => visitor.visit(&*inner, path),
            Err(TryLockError::Poisoned(poisoned)) => visitor.visit(&*poisoned.into_inner(), path),
            Err(TryLockError::WouldBlock) => {
                warn!(path = path, "skipping locked Mutex");
                Ok(())
            }
        }
    }
}

impl<T: DeepHash + ?Sized> DeepHash for RwLock<T> {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        match self.try_read() {
            Ok(inner) => visitor.visit(&*inner, path),
            Err(TryLockError::Poisoned(poisoned)) => visitor.visit(&*poisoned.into_inner(), path),
            Err(TryLockError::WouldBlock) => {
                warn!(path = path, "skipping write-locked RwLock");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{canonical_bytes, hash};

    #[test]
    fn test_indirection_is_transparent() {
        let value = 42u32;
        let expected = hash(&value);

        assert_eq!(hash(&&value), expected);
        assert_eq!(hash(&Box::new(value)), expected);
        assert_eq!(hash(&Rc::new(value)), expected);
        assert_eq!(hash(&Arc::new(value)), expected);
        assert_eq!(hash(&Some(value)), expected);
        assert_eq!(hash(&Some(Box::new(Rc::new(value)))), expected);
        assert_eq!(hash(&RefCell::new(value)), expected);
        assert_eq!(hash(&Cell::new(value)), expected);
        assert_eq!(hash(&Mutex::new(value)), expected);
        assert_eq!(hash(&RwLock::new(value)), expected);
        assert_eq!(hash(&Cow::<str>::Borrowed("x")), hash("x"));
    }

    #[test]
    fn test_unset_references_are_absent() {
        assert!(canonical_bytes(&None::<u32>).is_empty());

        let weak = {
            let strong = Rc::new(1u8);
            Rc::downgrade(&strong)
        };
        assert!(canonical_bytes(&weak).is_empty());

        let strong = Arc::new(2u8);
        assert_eq!(canonical_bytes(&Arc::downgrade(&strong)), vec![2]);
    }

    #[test]
    fn test_borrowed_cell_is_skipped() {
        let cell = RefCell::new(5u8);
        let _held = cell.borrow_mut();
        assert!(canonical_bytes(&cell).is_empty());
    }

    #[test]
    fn test_held_locks_are_skipped() {
        let mutex = Mutex::new(5u8);
        let guard = mutex.lock().unwrap();
        assert!(canonical_bytes(&mutex).is_empty());
        drop(guard);
        assert_eq!(canonical_bytes(&mutex), vec![5]);

        let rw = RwLock::new(6u8);
        let writer = rw.write().unwrap();
        assert!(canonical_bytes(&rw).is_empty());
        drop(writer);
        let _reader = rw.read().unwrap();
        assert_eq!(canonical_bytes(&rw), vec![6]);
    }

    #[test]
    fn test_poisoned_lock_is_still_read() {
        let mutex = Arc::new(Mutex::new(8u8));
        let poisoner = Arc::clone(&mutex);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(mutex.is_poisoned());
        assert_eq!(canonical_bytes(&mutex), vec![8]);
    }

    #[test]
    fn test_option_and_result_key_labels() {
        assert_eq!(None::<&str>.key_label(), "None");
        assert_eq!(Some("nil").key_label(), r#"Some("nil")"#);
        assert_ne!(Some("None").key_label(), None::<&str>.key_label());
        assert_eq!(Ok::<u8, u8>(5).key_label(), r#"Ok("5")"#);
        assert_ne!(Ok::<u8, u8>(5).key_label(), Err::<u8, u8>(5).key_label());
    }

    #[test]
    fn test_result_is_transparent() {
        let ok: Result<u8, String> = Ok(3);
        assert_eq!(canonical_bytes(&ok), vec![3]);
        let err: Result<u8, String> = Err("boom".to_string());
        assert_eq!(canonical_bytes(&err), b"boom");
    }
}

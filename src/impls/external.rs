//! Leaf encodings for third-party types, behind their cargo features.

#[cfg(feature = "uuid")]
mod uuid_impl {
    use uuid::Uuid;

    use crate::error::DeepHashError;
    use crate::visitor::{DeepHash, Visitor};

    /// The 16 raw bytes, in RFC 4122 order.
    impl DeepHash for Uuid {
        fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
            visitor.write(path, self.as_bytes())
        }

        fn key_label(&self) -> String {
            self.to_string()
        }
    }

}

#[cfg(feature = "chrono")]
mod chrono_impl {
    use chrono::{DateTime, TimeZone};

    use crate::error::DeepHashError;
    use crate::visitor::{DeepHash, Visitor};

    /// One fragment: big-endian `i64` Unix seconds then `u32` sub-second nanos.
    ///
    /// The offset is not included; the same instant in two zones hashes equal.
    impl<Tz: TimeZone> DeepHash for DateTime<Tz> {
        fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
            let mut buf = [0u8; 12];
            buf[..8].copy_from_slice(&self.timestamp().to_be_bytes());
            buf[8..].copy_from_slice(&self.timestamp_subsec_nanos().to_be_bytes());
            visitor.write(path, &buf)
        }

        fn key_label(&self) -> String {
            self.naive_utc().to_string()
        }
    }

    #[cfg(test)]
    mod tests {
        use chrono::{FixedOffset, TimeZone, Utc};

        use crate::hash;

        #[test]
        fn test_same_instant_any_zone() {
            let utc = Utc.timestamp_opt(1_700_000_000, 5).unwrap();
            let offset = utc.with_timezone(&FixedOffset::east_opt(3600).unwrap());
            assert_eq!(hash(&utc), hash(&offset));
            assert_ne!(hash(&utc), hash(&Utc.timestamp_opt(1_700_000_000, 6).unwrap()));
        }
    }
}

//! Tuples are records with positional fields: `path.0`, `path.1`, ...

use crate::error::DeepHashError;
use crate::visitor::{DeepHash, Visitor};

macro_rules! impl_deep_hash_for_tuple {
    ($(($($name:ident $idx:tt),+)),+ $(,)?) => {
        $(
            impl<$($name: DeepHash),+> DeepHash for ($($name,)+) {
                fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
                    visitor.record(self, path, |visitor| {
                        $( visitor.field(path, stringify!($idx), &self.$idx)?; )+
                        Ok(())
                    })
                }

                fn key_label(&self) -> String {
                    let parts: Vec<String> = vec![$(format!("{:?}", self.$idx.key_label())),+];
                    format!("({})", parts.join(", "))
                }
            }
        )+
    };
}

impl_deep_hash_for_tuple!(
    (A 0),
    (A 0, B 1),
    (A 0, B 1, C 2),
    (A 0, B 1, C 2, D 3),
    (A 0, B 1, C 2, D 3, E 4),
    (A 0, B 1, C 2, D 3, E 4, F 5),
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6),
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7),
);

//! Declarative implementations of [`DeepHash`](crate::DeepHash) for user types.
//!
//! Only the fields listed in [`deep_hash_record!`] take part in hashing and
//! diffing; leaving a field out keeps it private to the digest.

/// Implement [`DeepHash`](crate::DeepHash) for a struct.
///
/// Fields are traversed in the order listed, each labelled `path.field`.
/// The record is guarded on its address so self-referential graphs
/// terminate. Generic parameters are bounded by `DeepHash`.
///
/// ```rust
/// use deephash::{deep_hash_record, diff};
///
/// struct User {
///     name: String,
///     age: u8,
///     session_token: String,
/// }
///
/// deep_hash_record!(User { name, age });
///
/// let a = User { name: "dave".into(), age: 30, session_token: "a".into() };
/// let b = User { name: "dave".into(), age: 31, session_token: "b".into() };
/// assert_eq!(diff("user", &a, &b).unwrap(), vec!["user.age is not equal"]);
/// ```
#[macro_export]
macro_rules! deep_hash_record {
    ($name:ident $(< $($gen:ident),+ $(,)? >)? { $($field:tt),* $(,)? }) => {
        impl $(< $($gen: $crate::DeepHash),+ >)? $crate::DeepHash for $name $(< $($gen),+ >)? {
            fn deep_hash(
                &self,
                visitor: &mut $crate::Visitor<'_>,
                path: &str,
            ) -> ::std::result::Result<(), $crate::DeepHashError> {
                visitor.record(self, path, |visitor| {
                    $( visitor.field(path, stringify!($field), &self.$field)?; )*
                    Ok(())
                })
            }

            fn key_label(&self) -> ::std::string::String {
                let parts: ::std::vec::Vec<::std::string::String> = ::std::vec![
                    $( format!("{}:{:?}", stringify!($field), $crate::DeepHash::key_label(&self.$field)) ),*
                ];
                format!("{}{{{}}}", stringify!($name), parts.join(" "))
            }
        }
    };
}

/// Implement [`DeepHash`](crate::DeepHash) for a single-field tuple struct.
///
/// The wrapper is transparent: `Name(x)` hashes and diffs exactly like `x`,
/// at the same path.
///
/// ```rust
/// use deephash::{deep_hash_newtype, diff, hash};
///
/// struct Name(String);
/// deep_hash_newtype!(Name);
///
/// assert_eq!(hash(&Name("1".into())), hash("1"));
/// assert_eq!(
///     diff("xyz", &Name("1".into()), &Name("2".into())).unwrap(),
///     vec!["xyz is not equal"]
/// );
/// ```
#[macro_export]
macro_rules! deep_hash_newtype {
    ($name:ident $(< $($gen:ident),+ $(,)? >)?) => {
        impl $(< $($gen: $crate::DeepHash),+ >)? $crate::DeepHash for $name $(< $($gen),+ >)? {
            fn deep_hash(
                &self,
                visitor: &mut $crate::Visitor<'_>,
                path: &str,
            ) -> ::std::result::Result<(), $crate::DeepHashError> {
                visitor.visit(&self.0, path)
            }

            fn key_label(&self) -> ::std::string::String {
                $crate::DeepHash::key_label(&self.0)
            }
        }
    };
}

/// Implement [`DeepHash`](crate::DeepHash) for an enum.
///
/// Unit variants hash as their name, like a string. Single-payload variants
/// are tagged unions: the payload is traversed at the same path and the tag
/// itself is not hashed. Wrap struct-like payloads in a record.
///
/// Variants carrying the same payload type are therefore indistinguishable:
/// `A(1)` and `B(1)` hash equal and diff empty, and a unit variant `Fast`
/// hashes like the string `"Fast"`.
///
/// ```rust
/// use deephash::{deep_hash_enum, hash};
///
/// enum Setting {
///     Off,
///     Level(u8),
///     Label(String),
/// }
///
/// deep_hash_enum!(Setting { Off, Level(level), Label(label) });
///
/// assert_eq!(hash(&Setting::Off), hash("Off"));
/// assert_eq!(hash(&Setting::Level(3)), hash(&3u8));
/// assert_ne!(hash(&Setting::Label("x".into())), hash(&Setting::Off));
/// ```
#[macro_export]
macro_rules! deep_hash_enum {
    (@arm $visitor:ident, $path:ident, $variant:ident) => {
        $visitor.write($path, stringify!($variant).as_bytes())
    };
    (@arm $visitor:ident, $path:ident, $variant:ident, $inner:ident) => {
        $visitor.visit($inner, $path)
    };
    (@label $variant:ident) => {
        ::std::string::String::from(stringify!($variant))
    };
    (@label $variant:ident, $inner:ident) => {
        $crate::DeepHash::key_label($inner)
    };
    ($name:ident { $($variant:ident $(($inner:ident))?),* $(,)? }) => {
        impl $crate::DeepHash for $name {
            fn deep_hash(
                &self,
                visitor: &mut $crate::Visitor<'_>,
                path: &str,
            ) -> ::std::result::Result<(), $crate::DeepHashError> {
                match self {
                    $( Self::$variant $(($inner))? => {
                        $crate::deep_hash_enum!(@arm visitor, path, $variant $(, $inner)?)
                    } )*
                }
            }

            fn key_label(&self) -> ::std::string::String {
                match self {
                    $( Self::$variant $(($inner))? => {
                        $crate::deep_hash_enum!(@label $variant $(, $inner)?)
                    } )*
                }
            }
        }
    };
}

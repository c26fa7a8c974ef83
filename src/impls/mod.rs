//! [`DeepHash`](crate::DeepHash) implementations for standard and third-party types.

mod collections;
mod external;
mod json;
mod pointer;
mod primitive;
mod tuple;

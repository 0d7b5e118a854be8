//! Deep structural equality and diff reports over [`Reflect`] values.

pub mod diff;
pub mod equal;
pub mod options;
pub mod reflect;

pub use diff::diff;
pub use equal::equal;
pub use options::CmpOption;
pub use cmpmatch_derive::Reflect;
pub use reflect::{AsAny, Entry, Field, Kind, Nil, Reflect};

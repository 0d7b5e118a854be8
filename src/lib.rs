//! Fluent test assertions with a deep-equality `CompareTo` matcher.
//!
//! ```
//! use cmpmatch::{compare_to, expect};
//!
//! expect!(vec![1, 2]).to(compare_to!(vec![1, 2]));
//! expect!(5).not().to(compare_to!(5.0));
//! ```
//!
//! Structs take part once they derive [`Reflect`](cmp::Reflect):
//!
//! ```
//! use cmpmatch::cmp::{CmpOption, Reflect};
//! use cmpmatch::{compare_to, expect};
//!
//! #[derive(Debug, Reflect)]
//! struct Account {
//!   pub owner: String,
//!   pin: u16,
//! }
//!
//! expect!(Account { owner: "ann".into(), pin: 1 }).to(compare_to!(
//!   Account { owner: "ann".into(), pin: 2 },
//!   CmpOption::ignore_unexported::<Account>()
//! ));
//! ```

extern crate self as cmpmatch;

pub mod cmp;
pub mod testutil;

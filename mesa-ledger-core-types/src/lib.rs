#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![cfg_attr(feature = "fail-on-warnings", deny(clippy::all))]

pub mod account;
pub mod balance;
pub mod document;
pub mod entry;
mod id;
pub mod period;
pub mod primitives;

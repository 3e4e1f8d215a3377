// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

pub mod collation;
pub mod error;
pub mod row;
pub mod types;
pub mod util;
pub mod value;

pub use collation::{Coercibility, Collation};
pub use error::{EvalError, Warning};
pub use row::Row;
pub use types::{Conversion, Type, TypeKind};
pub use value::{Blob, Date, DateTime, Decimal, Text, Time, Value};

pub type Result<T> = std::result::Result<T, EvalError>;

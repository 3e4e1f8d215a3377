// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! Scalar expression evaluation: the typed expression tree, the session
//! context it runs against, and the SQL function catalog.

pub mod context;
pub mod expr;
pub mod func;
pub mod session;

pub use context::SessionContext;
pub use expr::{BoundColumn, ExprRef, Literal, ScalarExpr};
pub use func::registry::FunctionRegistry;

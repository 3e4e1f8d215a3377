// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

//! Pure, session-free engines backing the scalar function library:
//! calendar and interval arithmetic, numeric formatting, the regex
//! sub-engine, and small codecs.

pub mod calendar;
pub mod encode;
pub mod format;
pub mod regexp;

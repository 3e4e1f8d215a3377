// SPDX-License-Identifier: MIT
// Copyright (c) 2025 myexpr

pub mod base64;
pub mod hex;

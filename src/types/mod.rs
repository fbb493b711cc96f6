// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types shared across terravue.
//!
//! - Cache metadata (timestamps, clocks)

pub mod cache;

// Note: Public types are re-exported from lib.rs, not here

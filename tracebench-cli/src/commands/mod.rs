// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

pub mod drive;
pub mod report;
pub mod run;
pub mod validate;

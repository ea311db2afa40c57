// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod alerts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod format;
pub mod impact;
pub mod models;
pub mod period;
pub mod status;
pub mod utils;
pub mod validation;

// ABOUTME: Configuration module for the AlterFit server
// ABOUTME: Re-exports the environment-driven ServerConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

/// Environment-variable driven server configuration
pub mod environment;

pub use environment::ServerConfig;

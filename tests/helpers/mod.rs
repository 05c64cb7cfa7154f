// ABOUTME: Helper modules shared by integration tests
// ABOUTME: Currently hosts the axum request/response test harness
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit
#![allow(dead_code)]

pub mod axum_test;

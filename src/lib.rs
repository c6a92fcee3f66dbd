// SPDX-License-Identifier: Apache-2.0
pub mod client;
pub mod config;
pub mod email;
pub mod error;
pub mod logging;
pub mod relay;
pub mod send_submission;
pub mod submission;
pub mod validation;

#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
//! # RustedMathForm
//!
//! A bilingual (Arabic-first) school math toolkit. Loosely typed notation such as `2x^2+3x-5`
//! is normalized into canonical expressions, which can then be used for arithmetic, equation
//! solving (linear, quadratic, higher-degree polynomial and numeric), function sampling and
//! analysis, digitization of hand-drawn curves, charts and narrated explanations.
//!
//! ```
//! use RustedMathForm::session::state::{handle, Request, SessionState};
//! let (state, response) = handle(
//!     SessionState::default(),
//!     Request::Solve { equation: "x^2 - 5x + 6 = 0".to_string() },
//! );
//! assert_eq!(response.banner.text(), "الحل: [2, 3]");
//! assert_eq!(state.history.len(), 1);
//! ```
pub mod Utils;
pub mod error;
pub mod numerical;
pub mod session;
pub mod symbolic;

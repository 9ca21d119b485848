// ==============================================================================
// lib.rs - VEP Output Validator Library
// ==============================================================================
// Description: Library interface for VEP annotation output validation modules
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

pub mod parsers;
pub mod locator;
pub mod models;
pub mod validator;
pub mod processor;
pub mod output;

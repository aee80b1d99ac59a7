//! Edge case tests for koda-text

//! Edge case tests for koda-bin

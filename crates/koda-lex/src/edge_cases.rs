//! Edge case tests for koda-lex

//! Edge case tests for ferritec-sem
